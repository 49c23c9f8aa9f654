//! Folding input graphs into the aggregated consensus sets.

use tracing::{debug, info};

use ream_core::{EdgesSet, ModelGraph, NodesSet};

use crate::cost::{edge_cost, CostParams};

/// Computes each graph's distinct projections, folds them into fresh
/// aggregation sets, attaches synthetic root edges, normalizes frequencies
/// by the graph count, and scores every edge.
pub fn aggregate_graphs(graphs: &mut [ModelGraph], params: &CostParams) -> (NodesSet, EdgesSet) {
    let mut nodes = NodesSet::new();
    let mut edges = EdgesSet::new();

    for graph in graphs.iter_mut() {
        graph.initialize_distinct_nodes();
        graph.initialize_distinct_edges();
        for distinct in graph.distinct_nodes().values() {
            nodes.add_distinct(distinct);
        }
        for distinct in graph.distinct_edges().values() {
            edges.add_distinct(distinct);
        }
    }

    let declared_edges = edges.len();
    edges.add_artificial_edges(&nodes);
    debug!(
        root_edges = edges.len() - declared_edges,
        "synthesized root edges"
    );

    nodes.normalize(graphs.len());
    edges.normalize(graphs.len());

    for edge in edges.values_mut() {
        let target_frequency = nodes
            .frequency(&edge.key.target)
            .expect("aggregated edges target aggregated nodes");
        edge.cost_value = edge_cost(edge, target_frequency, params);
    }

    info!(
        graphs = graphs.len(),
        nodes = nodes.len(),
        edges = edges.len(),
        "aggregated distinct sets"
    );
    (nodes, edges)
}
