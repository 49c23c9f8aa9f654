//! Cluster-based refinement of the mined reference graph.
//!
//! The consensus engine keeps every edge that clears the cost threshold,
//! which lets moderately frequent but peripheral structure through. The
//! refinement pass prunes the result down to nodes that are either common to
//! every input or belong to the winning cluster of a high-level node, where
//! clusters from all inputs compete per anchor and the largest reachable set
//! wins. The pass is a monotone filter: it removes nodes and edges from the
//! mined graph and never adds structure.

use indexmap::IndexMap;
use tracing::{debug, info};

use ream_core::{keep_best_cluster, Cluster, ModelGraph, NodeKey, NodesSet, NULL_NODE_ID};

/// Prunes `reference` in place to the union of common nodes and winning
/// clusters computed over `graphs`.
pub fn refine(reference: &mut ModelGraph, nodes: &NodesSet, graphs: &mut [ModelGraph]) {
    // The synthetic scaffolding never appears in refined output.
    reference.delete_node(NULL_NODE_ID);
    reference.delete_root_edges();

    let mut winners: IndexMap<NodeKey, Cluster> = IndexMap::new();
    for graph in graphs.iter_mut() {
        graph.compute_nodes_clusters();
        for cluster in graph.clusters().values() {
            keep_best_cluster(&mut winners, cluster.clone());
        }
    }

    let mut keep = nodes.common_node_keys();
    let common = keep.len();
    for cluster in winners.values() {
        for member in &cluster.members {
            keep.insert(member.clone());
        }
    }
    debug!(
        common,
        winners = winners.len(),
        kept = keep.len(),
        "refinement keep set"
    );

    reference.compute_reference_nodes(&keep);
    let dropped_nodes: Vec<String> = reference
        .nodes()
        .filter(|(_, node)| !node.is_reference)
        .map(|(id, _)| id.to_string())
        .collect();
    for id in &dropped_nodes {
        reference.delete_node(id);
    }

    reference.compute_reference_edges();
    let dropped_edges: Vec<String> = reference
        .edges()
        .filter(|view| !view.edge.is_reference)
        .map(|view| view.id.to_string())
        .collect();
    for id in &dropped_edges {
        reference.delete_edge(id);
    }

    info!(
        dropped_nodes = dropped_nodes.len(),
        dropped_edges = dropped_edges.len(),
        nodes = reference.node_count(),
        edges = reference.edge_count(),
        "refinement complete"
    );
}
