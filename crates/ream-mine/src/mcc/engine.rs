//! The greedy consensus engine.
//!
//! Consumes the aggregated sets and grows a reference graph one edge at a
//! time, highest cost first. An accepted edge whose source is not yet in the
//! graph is parked in the reserved set and promoted the moment its source
//! arrives; promotion cascades recursively, so a whole parked chain unblocks
//! at once. The run ends by draining the reserved set in a single pass and
//! counting whatever stays unresolved.

use serde::Serialize;
use tracing::{debug, info};

use ream_core::{
    AggregatedEdge, EdgeKey, EdgesSet, ModelEdge, ModelGraph, ModelNode, NodeKey, NodesSet,
    ReservedEdge, ReservedEdgesSet,
};

use crate::cost::CostParams;

/// Engine phases. `Running` consumes aggregated edges; `Draining` sweeps the
/// reserved set once; `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EngineState {
    Running,
    Draining,
    Done,
}

/// Counters of one engine run, carried into the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineCounters {
    /// Candidates taken from the aggregated set, accepted or not.
    pub considered: usize,
    pub accepted: usize,
    /// Accepted edges parked because their source was unreachable.
    pub parked: usize,
    /// Parked edges applied by the recursive promotion cascade.
    pub promoted: usize,
    /// Parked edges applied by the closing drain pass.
    pub drained: usize,
    /// Parked edges whose source never became reachable.
    pub unresolved: usize,
}

/// What a mining run produces: the reference graph plus the aggregated node
/// set (refinement reads common nodes from it) and the engine counters.
#[derive(Debug, Clone)]
pub struct MiningOutcome {
    pub reference: ModelGraph,
    pub nodes: NodesSet,
    pub counters: EngineCounters,
}

/// Greedy consensus over one pair of aggregated sets.
pub struct MccEngine {
    nodes: NodesSet,
    edges: EdgesSet,
    reserved: ReservedEdgesSet,
    params: CostParams,
    state: EngineState,
    reference: ModelGraph,
    counters: EngineCounters,
}

impl MccEngine {
    /// Engine over scored aggregation sets. The reference graph starts with
    /// only the null node, so root edges are applicable from the first step.
    pub fn new(nodes: NodesSet, edges: EdgesSet, params: CostParams) -> Self {
        MccEngine {
            nodes,
            edges,
            reserved: ReservedEdgesSet::new(),
            params,
            state: EngineState::Running,
            reference: ModelGraph::reference(),
            counters: EngineCounters::default(),
        }
    }

    /// Runs to completion. The engine cannot fail: the aggregated set
    /// strictly shrinks every step, and an over-high threshold simply leaves
    /// the reference graph at the null node alone.
    pub fn run(mut self) -> MiningOutcome {
        while self.state != EngineState::Done {
            match self.state {
                EngineState::Running => self.step(),
                EngineState::Draining => {
                    self.drain();
                    self.state = EngineState::Done;
                }
                EngineState::Done => {}
            }
        }
        info!(
            accepted = self.counters.accepted,
            parked = self.counters.parked,
            promoted = self.counters.promoted,
            unresolved = self.counters.unresolved,
            nodes = self.reference.node_count(),
            edges = self.reference.edge_count(),
            "consensus complete"
        );
        MiningOutcome {
            reference: self.reference,
            nodes: self.nodes,
            counters: self.counters,
        }
    }

    /// One `Running` iteration: take the best-scored edge, test it against
    /// the threshold, and either integrate or stop consuming.
    fn step(&mut self) {
        let Some(key) = self.edges.best_edge_key() else {
            self.state = EngineState::Draining;
            return;
        };
        // Each candidate is considered exactly once, accepted or not.
        let Some(edge) = self.edges.remove(&key) else {
            self.state = EngineState::Draining;
            return;
        };
        self.counters.considered += 1;

        if edge.cost_value < self.params.threshold {
            debug!(
                edge = %edge.key,
                cost = edge.cost_value,
                threshold = self.params.threshold,
                "best candidate below threshold"
            );
            // Candidates come in descending cost order, so nothing behind
            // this one can pass either.
            self.state = EngineState::Draining;
            return;
        }
        self.accept(edge);
    }

    fn accept(&mut self, edge: AggregatedEdge) {
        self.counters.accepted += 1;
        debug!(edge = %edge.key, cost = edge.cost_value, "accepted");

        // The target is about to become reachable, which refunds the
        // source-move penalty of every remaining edge leaving it.
        for remaining in self.edges.values_mut() {
            if remaining.key.source == edge.key.target {
                remaining.cost_value += remaining.frequency * self.params.move_cost;
            }
        }

        if self.in_reference(&edge.key.source) {
            self.apply(edge.key, edge.frequency);
        } else {
            self.counters.parked += 1;
            self.reserved.park(ReservedEdge {
                key: edge.key,
                frequency: edge.frequency,
            });
        }
    }

    /// Integrates an edge whose source is reachable, then recursively
    /// promotes every parked edge unblocked by a node this added. The
    /// cascade fully drains before the next candidate is considered.
    fn apply(&mut self, key: EdgeKey, frequency: f64) {
        let mut cascade: Vec<NodeKey> = Vec::new();
        cascade.extend(self.insert_edge(&key, frequency));
        while let Some(source) = cascade.pop() {
            for promoted in self.reserved.take_with_source(&source) {
                self.counters.promoted += 1;
                debug!(edge = %promoted.key, "promoted reserved edge");
                cascade.extend(self.insert_edge(&promoted.key, promoted.frequency));
            }
        }
    }

    /// Single sweep over the reserved set in parking order; entries whose
    /// source is reachable when scanned are applied without promotion. One
    /// pass, not a fixed point: an entry whose unblocker appears later in
    /// parking order stays unresolved, and that structure is dropped.
    fn drain(&mut self) {
        for key in self.reserved.keys_in_order() {
            if !self.in_reference(&key.source) {
                continue;
            }
            if let Some(edge) = self.reserved.remove(&key) {
                self.counters.drained += 1;
                self.insert_edge(&edge.key, edge.frequency);
            }
        }
        self.counters.unresolved = self.reserved.len();
        if self.counters.unresolved > 0 {
            info!(
                unresolved = self.counters.unresolved,
                "reserved edges left without a reachable source"
            );
        }
    }

    /// Adds the edge's target node (frequency from the aggregated set) if
    /// new, then the edge itself. Returns the target key when a node was
    /// actually inserted, feeding the promotion cascade.
    fn insert_edge(&mut self, key: &EdgeKey, frequency: f64) -> Option<NodeKey> {
        let target_id = key.target.to_string();
        let mut added_target = None;
        if !self.reference.node_exists(&target_id) {
            let node_frequency = self
                .nodes
                .frequency(&key.target)
                .expect("edge targets exist in the aggregated node set");
            let node = match &key.target {
                NodeKey::Null => ModelNode::null(),
                NodeKey::Element { label, kind } => ModelNode::element(label.clone(), kind.clone()),
            };
            self.reference
                .add_node(target_id.clone(), node.with_frequency(node_frequency));
            added_target = Some(key.target.clone());
        }
        let edge = ModelEdge {
            kind: key.kind.clone(),
            frequency,
            is_reference: false,
        };
        self.reference
            .add_edge(key.to_string(), &key.source.to_string(), &target_id, edge)
            .expect("applied edges start from a node already in the reference graph");
        added_target
    }

    fn in_reference(&self, key: &NodeKey) -> bool {
        self.reference.node_exists(&key.to_string())
    }
}
