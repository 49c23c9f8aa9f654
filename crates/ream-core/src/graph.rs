//! ModelGraph: the canonical in-memory form of one model or viewpoint.
//!
//! [`ModelGraph`] is used on both ends of the pipeline: ingestion produces
//! one per input document (or per named view), and the consensus engine
//! grows one as its output. Nodes and edges live in a petgraph
//! [`StableGraph`] arena; external string ids map to arena handles through
//! insertion-ordered side indexes, so iteration order is the order entries
//! were added and stays reproducible across runs.
//!
//! The external id space differs by origin: input graphs are keyed by the
//! raw identifiers of the source document, reference graphs by the canonical
//! rendering of each entry's structural key. The graph itself never
//! interprets ids; it only guarantees that an edge can be added solely
//! between ids it already knows, which is where unresolvable endpoints in a
//! malformed document surface.
//!
//! Derived data (distinct projections, clusters) is computed on demand and
//! cached on the graph; both are read-only snapshots of the raw collections
//! at computation time.

use std::collections::{HashMap, VecDeque};

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableGraph;
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};
use serde::{Deserialize, Serialize};

use crate::cluster::{keep_best_cluster, Cluster};
use crate::edge::{DistinctEdge, ModelEdge};
use crate::error::CoreError;
use crate::key::{EdgeKey, NodeKey, NULL_NODE_ID};
use crate::node::{DistinctNode, ModelNode};

/// One edge of a graph together with the external ids of its endpoints.
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub id: &'a str,
    pub source_id: &'a str,
    pub target_id: &'a str,
    pub edge: &'a ModelEdge,
}

/// Node/edge container for one model, one viewpoint, or the reference model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelGraph {
    graph: StableGraph<ModelNode, ModelEdge, Directed, u32>,
    /// External node id -> arena handle, in insertion order.
    node_ids: IndexMap<String, NodeIndex<u32>>,
    /// External edge id -> arena handle, in insertion order.
    edge_ids: IndexMap<String, EdgeIndex<u32>>,
    /// Distinct-node projection, filled by `initialize_distinct_nodes`.
    /// Serialized as a pair sequence: JSON map keys must be strings.
    #[serde(with = "indexmap::map::serde_seq")]
    distinct_nodes: IndexMap<NodeKey, DistinctNode>,
    /// Distinct-edge projection, filled by `initialize_distinct_edges`.
    #[serde(with = "indexmap::map::serde_seq")]
    distinct_edges: IndexMap<EdgeKey, DistinctEdge>,
    /// High-level-node clusters, filled by `compute_nodes_clusters`.
    #[serde(with = "indexmap::map::serde_seq")]
    clusters: IndexMap<NodeKey, Cluster>,
}

impl ModelGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// A reference graph seeded with the synthetic null node, the anchor
    /// every root edge hangs off.
    pub fn reference() -> Self {
        let mut graph = Self::new();
        graph.add_node(NULL_NODE_ID, ModelNode::null());
        graph
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_ids.len()
    }

    pub fn node_exists(&self, id: &str) -> bool {
        self.node_ids.contains_key(id)
    }

    pub fn edge_exists(&self, id: &str) -> bool {
        self.edge_ids.contains_key(id)
    }

    /// The node stored under an external id.
    pub fn node(&self, id: &str) -> Option<&ModelNode> {
        self.node_ids
            .get(id)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Nodes in insertion order, with their external ids.
    pub fn nodes(&self) -> impl Iterator<Item = (&str, &ModelNode)> + '_ {
        self.node_ids.iter().filter_map(|(id, &idx)| {
            self.graph.node_weight(idx).map(|node| (id.as_str(), node))
        })
    }

    /// Edges in insertion order, with endpoint ids resolved.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        let names: HashMap<NodeIndex<u32>, &str> = self
            .node_ids
            .iter()
            .map(|(id, &idx)| (idx, id.as_str()))
            .collect();
        self.edge_ids.iter().filter_map(move |(id, &idx)| {
            let (source, target) = self.graph.edge_endpoints(idx)?;
            Some(EdgeView {
                id: id.as_str(),
                source_id: names.get(&source).copied()?,
                target_id: names.get(&target).copied()?,
                edge: self.graph.edge_weight(idx)?,
            })
        })
    }

    /// Count of edges pointing at the node stored under `id`.
    pub fn incoming_edge_count(&self, id: &str) -> usize {
        match self.node_ids.get(id) {
            Some(&idx) => self.graph.edges_directed(idx, Direction::Incoming).count(),
            None => 0,
        }
    }

    /// Count of edges leaving the node stored under `id`.
    pub fn outgoing_edge_count(&self, id: &str) -> usize {
        match self.node_ids.get(id) {
            Some(&idx) => self.graph.edges_directed(idx, Direction::Outgoing).count(),
            None => 0,
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Adds a node under an external id. No-op returning `false` when the id
    /// is already taken; incremental reference-graph construction relies on
    /// this to fold repeated insertions.
    pub fn add_node(&mut self, id: impl Into<String>, node: ModelNode) -> bool {
        let id = id.into();
        if self.node_ids.contains_key(&id) {
            return false;
        }
        let idx = self.graph.add_node(node);
        self.node_ids.insert(id, idx);
        true
    }

    /// Adds an edge between two known node ids. No-op returning `false` when
    /// the edge id is already taken; fails when either endpoint id is
    /// unknown, which in ingestion means the document references an element
    /// it never declares.
    pub fn add_edge(
        &mut self,
        id: impl Into<String>,
        source_id: &str,
        target_id: &str,
        edge: ModelEdge,
    ) -> Result<bool, CoreError> {
        let id = id.into();
        if self.edge_ids.contains_key(&id) {
            return Ok(false);
        }
        let source = *self.node_ids.get(source_id).ok_or_else(|| {
            CoreError::UnresolvableEdgeEndpoint {
                edge: id.clone(),
                endpoint: source_id.to_string(),
            }
        })?;
        let target = *self.node_ids.get(target_id).ok_or_else(|| {
            CoreError::UnresolvableEdgeEndpoint {
                edge: id.clone(),
                endpoint: target_id.to_string(),
            }
        })?;
        let idx = self.graph.add_edge(source, target, edge);
        self.edge_ids.insert(id, idx);
        Ok(true)
    }

    /// Removes a node and every edge touching it. Returns whether the id was
    /// present.
    pub fn delete_node(&mut self, id: &str) -> bool {
        let Some(idx) = self.node_ids.shift_remove(id) else {
            return false;
        };
        let incident: Vec<EdgeIndex<u32>> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|edge| edge.id())
            .chain(
                self.graph
                    .edges_directed(idx, Direction::Incoming)
                    .map(|edge| edge.id()),
            )
            .collect();
        self.edge_ids.retain(|_, edge_idx| !incident.contains(edge_idx));
        self.graph.remove_node(idx);
        true
    }

    /// Removes an edge. Returns whether the id was present.
    pub fn delete_edge(&mut self, id: &str) -> bool {
        let Some(idx) = self.edge_ids.shift_remove(id) else {
            return false;
        };
        self.graph.remove_edge(idx);
        true
    }

    /// Drops every synthetic root edge, leaving the null node (if present)
    /// without outgoing edges.
    pub fn delete_root_edges(&mut self) {
        let root_edges: Vec<String> = self
            .edge_ids
            .iter()
            .filter(|(_, &idx)| {
                self.graph
                    .edge_weight(idx)
                    .is_some_and(|edge| edge.kind.is_root())
            })
            .map(|(id, _)| id.clone())
            .collect();
        for id in root_edges {
            self.delete_edge(&id);
        }
    }

    // -----------------------------------------------------------------------
    // Distinct projections
    // -----------------------------------------------------------------------

    /// Groups raw nodes by structural key, in first-occurrence order.
    ///
    /// `is_root` is evaluated at the key's first occurrence against this
    /// graph's own edges: root iff nothing targets that raw node.
    pub fn initialize_distinct_nodes(&mut self) {
        let mut distinct: IndexMap<NodeKey, DistinctNode> = IndexMap::new();
        for &idx in self.node_ids.values() {
            let Some(node) = self.graph.node_weight(idx) else {
                continue;
            };
            match distinct.entry(node.key.clone()) {
                Entry::Occupied(mut entry) => entry.get_mut().occurrences += 1,
                Entry::Vacant(entry) => {
                    let is_root = self
                        .graph
                        .edges_directed(idx, Direction::Incoming)
                        .next()
                        .is_none();
                    entry.insert(DistinctNode {
                        key: node.key.clone(),
                        occurrences: 1,
                        is_root,
                    });
                }
            }
        }
        self.distinct_nodes = distinct;
    }

    /// Groups raw edges by structural key, in insertion order. Endpoint keys
    /// come straight from the arena, so this cannot fail: dangling endpoints
    /// were already rejected by `add_edge`.
    pub fn initialize_distinct_edges(&mut self) {
        let mut distinct: IndexMap<EdgeKey, DistinctEdge> = IndexMap::new();
        for &idx in self.edge_ids.values() {
            let Some((source, target)) = self.graph.edge_endpoints(idx) else {
                continue;
            };
            let (Some(source), Some(target), Some(edge)) = (
                self.graph.node_weight(source),
                self.graph.node_weight(target),
                self.graph.edge_weight(idx),
            ) else {
                continue;
            };
            let key = EdgeKey::new(source.key.clone(), target.key.clone(), edge.kind.clone());
            match distinct.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().occurrences += 1,
                Entry::Vacant(entry) => {
                    let key = entry.key().clone();
                    entry.insert(DistinctEdge {
                        key,
                        occurrences: 1,
                    });
                }
            }
        }
        self.distinct_edges = distinct;
    }

    pub fn distinct_nodes(&self) -> &IndexMap<NodeKey, DistinctNode> {
        &self.distinct_nodes
    }

    pub fn distinct_edges(&self) -> &IndexMap<EdgeKey, DistinctEdge> {
        &self.distinct_edges
    }

    // -----------------------------------------------------------------------
    // Clusters
    // -----------------------------------------------------------------------

    /// Computes the cluster of every high-level node (no incoming edges in
    /// this graph): the forward transitive closure over outgoing edges,
    /// mapped into key space. When two high-level nodes collapse to the same
    /// key, the larger cluster is kept.
    pub fn compute_nodes_clusters(&mut self) {
        let mut clusters: IndexMap<NodeKey, Cluster> = IndexMap::new();
        for &idx in self.node_ids.values() {
            if self
                .graph
                .edges_directed(idx, Direction::Incoming)
                .next()
                .is_some()
            {
                continue;
            }
            let Some(anchor) = self.graph.node_weight(idx) else {
                continue;
            };
            let members = self.reachable_keys(idx);
            keep_best_cluster(&mut clusters, Cluster::new(anchor.key.clone(), members));
        }
        self.clusters = clusters;
    }

    pub fn clusters(&self) -> &IndexMap<NodeKey, Cluster> {
        &self.clusters
    }

    /// Breadth-first forward closure from `start`, no revisits, in raw-id
    /// space; the result is the closure's key set (start included).
    fn reachable_keys(&self, start: NodeIndex<u32>) -> IndexSet<NodeKey> {
        let mut visited: IndexSet<NodeIndex<u32>> = IndexSet::new();
        visited.insert(start);
        let mut queue: VecDeque<NodeIndex<u32>> = VecDeque::new();
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            for next in self.graph.neighbors_directed(current, Direction::Outgoing) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        visited
            .into_iter()
            .filter_map(|idx| self.graph.node_weight(idx).map(|node| node.key.clone()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Reference marking
    // -----------------------------------------------------------------------

    /// Marks `is_reference` on every node whose key is in `keys`. Keys not
    /// present in this graph are ignored; marking never adds structure.
    pub fn compute_reference_nodes(&mut self, keys: &IndexSet<NodeKey>) {
        let indices: Vec<NodeIndex<u32>> = self.node_ids.values().copied().collect();
        for idx in indices {
            if let Some(node) = self.graph.node_weight_mut(idx) {
                if keys.contains(&node.key) {
                    node.is_reference = true;
                }
            }
        }
    }

    /// Marks `is_reference` on every edge whose endpoints are both marked.
    pub fn compute_reference_edges(&mut self) {
        let indices: Vec<EdgeIndex<u32>> = self.edge_ids.values().copied().collect();
        for idx in indices {
            let Some((source, target)) = self.graph.edge_endpoints(idx) else {
                continue;
            };
            let both_marked = self
                .graph
                .node_weight(source)
                .is_some_and(|node| node.is_reference)
                && self
                    .graph
                    .node_weight(target)
                    .is_some_and(|node| node.is_reference);
            if both_marked {
                if let Some(edge) = self.graph.edge_weight_mut(idx) {
                    edge.is_reference = true;
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Per-kind stats
    // -----------------------------------------------------------------------

    /// Node count per element kind, in first-occurrence order. The null node
    /// has no kind and is not counted.
    pub fn node_kind_stats(&self) -> IndexMap<String, usize> {
        let mut stats: IndexMap<String, usize> = IndexMap::new();
        for (_, node) in self.nodes() {
            if let Some(kind) = node.key.kind() {
                *stats.entry(kind.to_string()).or_insert(0) += 1;
            }
        }
        stats
    }

    /// Edge count per relationship kind, in first-occurrence order.
    pub fn edge_kind_stats(&self) -> IndexMap<String, usize> {
        let mut stats: IndexMap<String, usize> = IndexMap::new();
        for view in self.edges() {
            *stats.entry(view.edge.kind.as_str().to_string()).or_insert(0) += 1;
        }
        stats
    }

    /// Verifies the id indexes against the arena.
    pub fn assert_consistency(&self) {
        assert_eq!(self.node_ids.len(), self.graph.node_count());
        assert_eq!(self.edge_ids.len(), self.graph.edge_count());
        for (id, &idx) in &self.node_ids {
            assert!(
                self.graph.node_weight(idx).is_some(),
                "node id '{id}' maps to a removed arena entry"
            );
        }
        for (id, &idx) in &self.edge_ids {
            assert!(
                self.graph.edge_weight(idx).is_some(),
                "edge id '{id}' maps to a removed arena entry"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::EdgeKind;

    fn element_graph(nodes: &[(&str, &str, &str)], edges: &[(&str, &str, &str, &str)]) -> ModelGraph {
        let mut graph = ModelGraph::new();
        for (id, label, kind) in nodes {
            graph.add_node(*id, ModelNode::element(*label, *kind));
        }
        for (id, source, target, kind) in edges {
            graph
                .add_edge(*id, source, target, ModelEdge::typed(*kind))
                .unwrap();
        }
        graph
    }

    #[test]
    fn duplicate_node_id_is_a_noop() {
        let mut graph = ModelGraph::new();
        assert!(graph.add_node("n1", ModelNode::element("A", "T")));
        assert!(!graph.add_node("n1", ModelNode::element("B", "T")));
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.node("n1").unwrap().key.label(), Some("A"));
    }

    #[test]
    fn duplicate_edge_id_is_a_noop() {
        let mut graph = element_graph(
            &[("n1", "A", "T"), ("n2", "B", "T")],
            &[("e1", "n1", "n2", "Flow")],
        );
        assert!(!graph.add_edge("e1", "n2", "n1", ModelEdge::typed("Flow")).unwrap());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let mut graph = ModelGraph::new();
        graph.add_node("n1", ModelNode::element("A", "T"));
        let err = graph
            .add_edge("e1", "n1", "missing", ModelEdge::typed("Flow"))
            .unwrap_err();
        let CoreError::UnresolvableEdgeEndpoint { edge, endpoint } = err;
        assert_eq!(edge, "e1");
        assert_eq!(endpoint, "missing");
    }

    #[test]
    fn deleting_a_node_drops_incident_edges() {
        let mut graph = element_graph(
            &[("n1", "A", "T"), ("n2", "B", "T"), ("n3", "C", "T")],
            &[("e1", "n1", "n2", "Flow"), ("e2", "n2", "n3", "Flow")],
        );
        assert!(graph.delete_node("n2"));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 0);
        assert!(!graph.edge_exists("e1"));
        assert!(!graph.edge_exists("e2"));
        graph.assert_consistency();
    }

    #[test]
    fn delete_root_edges_spares_typed_edges() {
        let mut graph = ModelGraph::reference();
        graph.add_node("AT", ModelNode::element("A", "T"));
        graph.add_node("BT", ModelNode::element("B", "T"));
        graph
            .add_edge("NoneNoneATroot_edge", NULL_NODE_ID, "AT", ModelEdge::root(1.0))
            .unwrap();
        graph
            .add_edge("ATBTFlow", "AT", "BT", ModelEdge::typed("Flow"))
            .unwrap();

        graph.delete_root_edges();

        assert_eq!(graph.edge_count(), 1);
        assert!(graph.edge_exists("ATBTFlow"));
        assert_eq!(graph.outgoing_edge_count(NULL_NODE_ID), 0);
        assert!(graph.edges().all(|view| !view.edge.kind.is_root()));
    }

    #[test]
    fn distinct_nodes_group_by_key_and_count_occurrences() {
        // n1 and n3 share a key; n1 has no incoming edge when first seen.
        let mut graph = element_graph(
            &[("n1", "A", "T"), ("n2", "B", "T"), ("n3", "A", "T")],
            &[("e1", "n1", "n2", "Flow"), ("e2", "n2", "n3", "Flow")],
        );
        graph.initialize_distinct_nodes();

        let distinct = graph.distinct_nodes();
        assert_eq!(distinct.len(), 2);
        let a = &distinct[&NodeKey::element("A", "T")];
        assert_eq!(a.occurrences, 2);
        assert!(a.is_root);
        let b = &distinct[&NodeKey::element("B", "T")];
        assert_eq!(b.occurrences, 1);
        assert!(!b.is_root);
    }

    #[test]
    fn distinct_edges_group_by_endpoint_keys_and_kind() {
        let mut graph = element_graph(
            &[("n1", "A", "T"), ("n2", "B", "T"), ("n3", "A", "T")],
            &[
                ("e1", "n1", "n2", "Flow"),
                ("e2", "n3", "n2", "Flow"),
                ("e3", "n1", "n2", "Serving"),
            ],
        );
        graph.initialize_distinct_edges();

        let distinct = graph.distinct_edges();
        assert_eq!(distinct.len(), 2);
        let flow = EdgeKey::new(
            NodeKey::element("A", "T"),
            NodeKey::element("B", "T"),
            EdgeKind::typed("Flow"),
        );
        assert_eq!(distinct[&flow].occurrences, 2);
    }

    #[test]
    fn clusters_follow_outgoing_edges_only() {
        // A -> B -> C plus a separate root D -> C.
        let mut graph = element_graph(
            &[
                ("n1", "A", "T"),
                ("n2", "B", "T"),
                ("n3", "C", "T"),
                ("n4", "D", "T"),
            ],
            &[
                ("e1", "n1", "n2", "Flow"),
                ("e2", "n2", "n3", "Flow"),
                ("e3", "n4", "n3", "Flow"),
            ],
        );
        graph.compute_nodes_clusters();

        let clusters = graph.clusters();
        assert_eq!(clusters.len(), 2);
        let a = &clusters[&NodeKey::element("A", "T")];
        assert_eq!(a.evaluation_metric(), 3);
        assert!(a.members.contains(&NodeKey::element("C", "T")));
        let d = &clusters[&NodeKey::element("D", "T")];
        assert_eq!(d.evaluation_metric(), 2);
    }

    #[test]
    fn cycle_has_no_high_level_nodes() {
        let mut graph = element_graph(
            &[("n1", "A", "T"), ("n2", "B", "T")],
            &[("e1", "n1", "n2", "Flow"), ("e2", "n2", "n1", "Flow")],
        );
        graph.compute_nodes_clusters();
        assert!(graph.clusters().is_empty());
    }

    #[test]
    fn reference_marking_requires_both_endpoints() {
        let mut graph = element_graph(
            &[("AT", "A", "T"), ("BT", "B", "T"), ("CT", "C", "T")],
            &[("e1", "AT", "BT", "Flow"), ("e2", "BT", "CT", "Flow")],
        );
        let keys: IndexSet<NodeKey> = [
            NodeKey::element("A", "T"),
            NodeKey::element("B", "T"),
            // D is not in the graph and must be ignored.
            NodeKey::element("D", "T"),
        ]
        .into_iter()
        .collect();

        graph.compute_reference_nodes(&keys);
        graph.compute_reference_edges();

        assert!(graph.node("AT").unwrap().is_reference);
        assert!(!graph.node("CT").unwrap().is_reference);
        assert_eq!(graph.node_count(), 3);
        let marked: Vec<&str> = graph
            .edges()
            .filter(|view| view.edge.is_reference)
            .map(|view| view.id)
            .collect();
        assert_eq!(marked, vec!["e1"]);
    }

    #[test]
    fn kind_stats_skip_the_null_node() {
        let mut graph = ModelGraph::reference();
        graph.add_node("AT1", ModelNode::element("A", "T1"));
        graph.add_node("BT1", ModelNode::element("B", "T1"));
        graph.add_node("CT2", ModelNode::element("C", "T2"));
        graph
            .add_edge("e1", "AT1", "BT1", ModelEdge::typed("Flow"))
            .unwrap();

        let nodes = graph.node_kind_stats();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes["T1"], 2);
        assert_eq!(nodes["T2"], 1);
        assert_eq!(graph.edge_kind_stats()["Flow"], 1);
    }

    #[test]
    fn serde_round_trip_preserves_structure() {
        let mut graph = element_graph(
            &[("n1", "A", "T"), ("n2", "B", "T")],
            &[("e1", "n1", "n2", "Flow")],
        );
        graph.initialize_distinct_nodes();
        graph.initialize_distinct_edges();

        let json = serde_json::to_string(&graph).unwrap();
        let back: ModelGraph = serde_json::from_str(&json).unwrap();

        assert_eq!(back.node_count(), 2);
        assert_eq!(back.edge_count(), 1);
        assert_eq!(back.distinct_nodes().len(), 2);
        assert!(back.node_exists("n1"));
        assert!(back.edge_exists("e1"));
    }

    /// End-to-end pass over one graph: build, project, cluster, mark, prune.
    #[test]
    fn comprehensive_single_graph_lifecycle() {
        let mut graph = element_graph(
            &[
                ("n1", "Portal", "ApplicationComponent"),
                ("n2", "Claims", "BusinessProcess"),
                ("n3", "Archive", "ApplicationComponent"),
                ("n4", "Ledger", "ApplicationComponent"),
            ],
            &[
                ("e1", "n1", "n2", "Serving"),
                ("e2", "n2", "n3", "Flow"),
                ("e3", "n4", "n3", "Access"),
            ],
        );

        graph.initialize_distinct_nodes();
        graph.initialize_distinct_edges();
        assert_eq!(graph.distinct_nodes().len(), 4);
        assert_eq!(graph.distinct_edges().len(), 3);
        let roots: Vec<&NodeKey> = graph
            .distinct_nodes()
            .values()
            .filter(|node| node.is_root)
            .map(|node| &node.key)
            .collect();
        assert_eq!(
            roots,
            vec![
                &NodeKey::element("Portal", "ApplicationComponent"),
                &NodeKey::element("Ledger", "ApplicationComponent"),
            ]
        );

        graph.compute_nodes_clusters();
        assert_eq!(graph.clusters().len(), 2);

        // Keep only the Portal cluster.
        let keep = graph.clusters()[&NodeKey::element("Portal", "ApplicationComponent")]
            .members
            .clone();
        graph.compute_reference_nodes(&keep);
        graph.compute_reference_edges();
        let doomed: Vec<String> = graph
            .nodes()
            .filter(|(_, node)| !node.is_reference)
            .map(|(id, _)| id.to_string())
            .collect();
        for id in doomed {
            graph.delete_node(&id);
        }

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(!graph.node_exists("n4"));
        graph.assert_consistency();
    }
}
