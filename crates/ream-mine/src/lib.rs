//! Consensus mining over ingested model graphs.
//!
//! Takes the graphs produced by ingestion and distills them into a single
//! reference graph per run (or per viewpoint):
//!
//! - [`mcc`]: aggregation of distinct nodes/edges across graphs plus the
//!   greedy cost-driven consensus engine.
//! - [`refpa`]: cluster-based pruning of the mined graph down to common
//!   nodes and best-attested clusters.
//! - [`pipeline`]: the orchestration surface callers use, model-wide and
//!   per-viewpoint, plain and refined.

pub mod cost;
pub mod error;
pub mod mcc;
pub mod pipeline;
pub mod refpa;

pub use cost::{edge_cost, CostParams};
pub use error::MineError;
pub use mcc::{aggregate_graphs, EngineCounters, EngineState, MccEngine, MiningOutcome};
pub use pipeline::{mine_reference, mine_views, refine_reference, refine_views, ModelViews};
