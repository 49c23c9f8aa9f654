//! Consensus cost model.
//!
//! Every aggregated edge gets a score balancing the gain of inserting its
//! target against the expected cost of moving and deleting structure that
//! not all inputs share. Higher scores favor inclusion. Root edges carry no
//! source-move penalty since their source is the synthetic null node.

use serde::{Deserialize, Serialize};

use ream_core::AggregatedEdge;

/// Cost weights and acceptance threshold of one mining run. The engine has
/// no defaults; callers always pass explicit values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostParams {
    pub move_cost: f64,
    pub delete_cost: f64,
    pub insert_cost: f64,
    /// Minimum cost value an edge must reach to be accepted.
    pub threshold: f64,
}

impl CostParams {
    pub fn new(move_cost: f64, delete_cost: f64, insert_cost: f64, threshold: f64) -> Self {
        CostParams {
            move_cost,
            delete_cost,
            insert_cost,
            threshold,
        }
    }
}

/// Scores one aggregated edge given its target node's frequency.
pub fn edge_cost(edge: &AggregatedEdge, target_frequency: f64, params: &CostParams) -> f64 {
    let insert_costs = target_frequency * params.insert_cost;
    let move_costs = (target_frequency - edge.frequency) * params.move_cost;
    let delete_costs = (1.0 - edge.frequency) * params.delete_cost;
    let source_node_move_costs = if edge.key.kind.is_root() {
        0.0
    } else {
        edge.frequency * params.move_cost
    };
    insert_costs - move_costs - delete_costs - source_node_move_costs
}
