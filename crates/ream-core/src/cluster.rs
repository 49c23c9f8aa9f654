//! Node clusters anchored at high-level nodes.
//!
//! A high-level node has no incoming edge within its own graph. Its cluster
//! is the forward transitive closure over outgoing edges, anchor included,
//! mapped into key space. Clusters from different graphs (or from key
//! collisions within one graph) compete per anchor key: the larger member
//! set wins, ties keep the incumbent.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::key::NodeKey;

/// The reachable key set of one high-level node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub anchor: NodeKey,
    /// Keys reachable from the anchor over outgoing edges, anchor included.
    pub members: IndexSet<NodeKey>,
}

impl Cluster {
    pub fn new(anchor: NodeKey, members: IndexSet<NodeKey>) -> Self {
        Cluster { anchor, members }
    }

    /// Cardinality of the member set; the score clusters compete on.
    pub fn evaluation_metric(&self) -> usize {
        self.members.len()
    }
}

/// Inserts `cluster` into `winners` keyed by its anchor, keeping whichever
/// instance has the larger evaluation metric. On a tie the incumbent stays.
pub fn keep_best_cluster(winners: &mut IndexMap<NodeKey, Cluster>, cluster: Cluster) {
    match winners.get_mut(&cluster.anchor) {
        Some(current) => {
            if cluster.evaluation_metric() > current.evaluation_metric() {
                *current = cluster;
            }
        }
        None => {
            winners.insert(cluster.anchor.clone(), cluster);
        }
    }
}
