//! Node payloads stored in model graphs.

use serde::{Deserialize, Serialize};

use crate::key::NodeKey;

/// A node resident in a [`ModelGraph`](crate::ModelGraph).
///
/// Input graphs carry only the key; `frequency` stays at `0.0` there and is
/// meaningful on reference-graph nodes, where it is copied from the
/// aggregated node set at insertion time. `is_reference` is written by the
/// refinement pass alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelNode {
    pub key: NodeKey,
    pub frequency: f64,
    pub is_reference: bool,
}

impl ModelNode {
    /// A node for a real model element, frequency unset.
    pub fn element(label: impl Into<String>, kind: impl Into<String>) -> Self {
        ModelNode {
            key: NodeKey::element(label, kind),
            frequency: 0.0,
            is_reference: false,
        }
    }

    /// The synthetic null node.
    pub fn null() -> Self {
        ModelNode {
            key: NodeKey::Null,
            frequency: 0.0,
            is_reference: false,
        }
    }

    /// Same node with the given frequency, used when copying an aggregated
    /// node into the reference graph.
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }
}

/// One entry of a graph's distinct-node projection.
///
/// `occurrences` counts raw nodes of this key within the one originating
/// graph. `is_root` is evaluated at the key's first occurrence: true iff no
/// edge of the originating graph targets that raw node id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistinctNode {
    pub key: NodeKey,
    pub occurrences: u32,
    pub is_root: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_node_starts_unmarked() {
        let node = ModelNode::element("Customer", "BusinessActor");
        assert_eq!(node.frequency, 0.0);
        assert!(!node.is_reference);
        assert_eq!(node.key.to_string(), "CustomerBusinessActor");
    }

    #[test]
    fn with_frequency_keeps_key() {
        let node = ModelNode::element("Customer", "BusinessActor").with_frequency(0.5);
        assert_eq!(node.frequency, 0.5);
        assert_eq!(node.key.label(), Some("Customer"));
    }
}
