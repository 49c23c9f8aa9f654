//! Cross-graph aggregation sets.
//!
//! After every input graph has computed its distinct projections, the
//! projections fold into two process-wide accumulators: [`NodesSet`] and
//! [`EdgesSet`], keyed by structural identity. Frequency accumulates one
//! unit per distinct key per source graph (presence, not raw occurrence
//! count) and is normalized to `(0, 1]` by the number of graphs once folding
//! is complete. [`ReservedEdgesSet`] holds consensus-accepted edges whose
//! source node is not yet reachable, indexed by source key so they can be
//! promoted the moment that source appears.

use std::collections::HashMap;

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::edge::DistinctEdge;
use crate::key::{EdgeKey, NodeKey};
use crate::node::DistinctNode;

/// One aggregated node across all input graphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedNode {
    pub key: NodeKey,
    /// Graph count before normalization, share of graphs afterwards.
    pub frequency: f64,
    /// Fixed by the first graph that contributed the key.
    pub is_root: bool,
}

/// One aggregated edge across all input graphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedEdge {
    pub key: EdgeKey,
    pub frequency: f64,
    /// Consensus score; written by the engine's cost initialization and
    /// updated as accepted edges make new sources reachable.
    pub cost_value: f64,
}

/// An accepted edge parked until its source node becomes reachable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservedEdge {
    pub key: EdgeKey,
    pub frequency: f64,
}

/// Aggregated nodes keyed by structural identity, in fold order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodesSet {
    entries: IndexMap<NodeKey, AggregatedNode>,
}

impl NodesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &NodeKey) -> Option<&AggregatedNode> {
        self.entries.get(key)
    }

    pub fn frequency(&self, key: &NodeKey) -> Option<f64> {
        self.entries.get(key).map(|node| node.frequency)
    }

    pub fn values(&self) -> impl Iterator<Item = &AggregatedNode> {
        self.entries.values()
    }

    /// Folds one graph's distinct node in: a new key is inserted with one
    /// unit of frequency and the contributing graph's root flag; a known key
    /// gains one unit and keeps its structural fields.
    pub fn add_distinct(&mut self, distinct: &DistinctNode) {
        match self.entries.entry(distinct.key.clone()) {
            Entry::Occupied(mut entry) => entry.get_mut().frequency += 1.0,
            Entry::Vacant(entry) => {
                entry.insert(AggregatedNode {
                    key: distinct.key.clone(),
                    frequency: 1.0,
                    is_root: distinct.is_root,
                });
            }
        }
    }

    /// Divides every frequency by the number of graphs folded in.
    pub fn normalize(&mut self, graph_count: usize) {
        if graph_count == 0 {
            return;
        }
        for node in self.entries.values_mut() {
            node.frequency /= graph_count as f64;
        }
    }

    /// Keys present in every input graph. Normalized frequency is exactly
    /// `count / count = 1.0` for those and strictly below for all others, so
    /// the equality test is precise.
    pub fn common_node_keys(&self) -> IndexSet<NodeKey> {
        self.entries
            .values()
            .filter(|node| node.frequency == 1.0)
            .map(|node| node.key.clone())
            .collect()
    }
}

/// Aggregated edges keyed by structural identity, in fold order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgesSet {
    entries: IndexMap<EdgeKey, AggregatedEdge>,
}

impl EdgesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &EdgeKey) -> Option<&AggregatedEdge> {
        self.entries.get(key)
    }

    pub fn values(&self) -> impl Iterator<Item = &AggregatedEdge> {
        self.entries.values()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut AggregatedEdge> {
        self.entries.values_mut()
    }

    /// Folds one graph's distinct edge in, one unit of frequency per graph.
    pub fn add_distinct(&mut self, distinct: &DistinctEdge) {
        match self.entries.entry(distinct.key.clone()) {
            Entry::Occupied(mut entry) => entry.get_mut().frequency += 1.0,
            Entry::Vacant(entry) => {
                entry.insert(AggregatedEdge {
                    key: distinct.key.clone(),
                    frequency: 1.0,
                    cost_value: 0.0,
                });
            }
        }
    }

    /// Synthesizes one root edge per root-flagged aggregated node, carrying
    /// the node's frequency. Must run after all graphs folded in and before
    /// `normalize`, so root edges are scaled together with everything else.
    pub fn add_artificial_edges(&mut self, nodes: &NodesSet) {
        for node in nodes.values().filter(|node| node.is_root) {
            match self.entries.entry(EdgeKey::root(node.key.clone())) {
                Entry::Occupied(mut entry) => entry.get_mut().frequency += node.frequency,
                Entry::Vacant(entry) => {
                    let key = entry.key().clone();
                    entry.insert(AggregatedEdge {
                        key,
                        frequency: node.frequency,
                        cost_value: 0.0,
                    });
                }
            }
        }
    }

    /// Divides every frequency by the number of graphs folded in.
    pub fn normalize(&mut self, graph_count: usize) {
        if graph_count == 0 {
            return;
        }
        for edge in self.entries.values_mut() {
            edge.frequency /= graph_count as f64;
        }
    }

    /// Key of the edge with the highest cost value. Ties keep the earliest
    /// folded edge: fold order follows the sorted input file order, so the
    /// same inputs always select the same candidate.
    pub fn best_edge_key(&self) -> Option<EdgeKey> {
        let mut best: Option<&AggregatedEdge> = None;
        for edge in self.entries.values() {
            match best {
                Some(current) if edge.cost_value <= current.cost_value => {}
                _ => best = Some(edge),
            }
        }
        best.map(|edge| edge.key.clone())
    }

    /// Removes and returns an edge, preserving the order of the remainder.
    pub fn remove(&mut self, key: &EdgeKey) -> Option<AggregatedEdge> {
        self.entries.shift_remove(key)
    }
}

/// Accepted-but-unreachable edges, keyed by edge identity and indexed by
/// source key for promotion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservedEdgesSet {
    entries: IndexMap<EdgeKey, ReservedEdge>,
    by_source: HashMap<NodeKey, Vec<EdgeKey>>,
}

impl ReservedEdgesSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parks an edge until its source key becomes reachable.
    pub fn park(&mut self, edge: ReservedEdge) {
        if self.entries.contains_key(&edge.key) {
            return;
        }
        self.by_source
            .entry(edge.key.source.clone())
            .or_default()
            .push(edge.key.clone());
        self.entries.insert(edge.key.clone(), edge);
    }

    /// Removes and returns every parked edge waiting on `source`, in parking
    /// order.
    pub fn take_with_source(&mut self, source: &NodeKey) -> Vec<ReservedEdge> {
        let Some(keys) = self.by_source.remove(source) else {
            return Vec::new();
        };
        keys.iter()
            .filter_map(|key| self.entries.shift_remove(key))
            .collect()
    }

    /// Snapshot of all parked edge keys in parking order.
    pub fn keys_in_order(&self) -> Vec<EdgeKey> {
        self.entries.keys().cloned().collect()
    }

    /// Removes one parked edge, cleaning the source index.
    pub fn remove(&mut self, key: &EdgeKey) -> Option<ReservedEdge> {
        let edge = self.entries.shift_remove(key)?;
        if let Some(keys) = self.by_source.get_mut(&edge.key.source) {
            keys.retain(|parked| parked != key);
            if keys.is_empty() {
                self.by_source.remove(&edge.key.source);
            }
        }
        Some(edge)
    }
}
