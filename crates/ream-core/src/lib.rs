//! Data model for mining reference enterprise-architecture models.
//!
//! This crate owns the structures every pipeline stage works on: structural
//! identity keys, the [`ModelGraph`] arena holding one model or viewpoint,
//! the per-graph distinct projections, the cross-graph aggregation sets, and
//! high-level-node clusters. The consensus and refinement algorithms live in
//! `ream-mine`; document ingestion and serialization in `ream-archimate`.

pub mod cluster;
pub mod edge;
pub mod error;
pub mod graph;
pub mod key;
pub mod node;
pub mod sets;

// Re-export commonly used types
pub use cluster::{keep_best_cluster, Cluster};
pub use edge::{DistinctEdge, ModelEdge};
pub use error::CoreError;
pub use graph::{EdgeView, ModelGraph};
pub use key::{EdgeKey, EdgeKind, NodeKey, NULL_NODE_ID, ROOT_EDGE_KIND};
pub use node::{DistinctNode, ModelNode};
pub use sets::{AggregatedEdge, AggregatedNode, EdgesSet, NodesSet, ReservedEdge, ReservedEdgesSet};
