//! Cost-driven consensus mining.
//!
//! Two phases:
//! - [`aggregate_graphs`]: folds the input graphs into aggregated node and
//!   edge sets, synthesizes root edges, normalizes frequencies and scores
//!   every edge.
//! - [`MccEngine`]: greedily grows a reference graph from the scored edges,
//!   best candidate first, until the threshold cuts the supply off.

pub mod aggregate;
pub mod engine;

pub use aggregate::aggregate_graphs;
pub use engine::{EngineCounters, EngineState, MccEngine, MiningOutcome};
