//! Edge payloads stored in model graphs.

use serde::{Deserialize, Serialize};

use crate::key::{EdgeKey, EdgeKind};

/// An edge resident in a [`ModelGraph`](crate::ModelGraph).
///
/// Endpoints live in the graph structure, not in the payload; the payload
/// carries the relationship kind plus the mining attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEdge {
    pub kind: EdgeKind,
    pub frequency: f64,
    pub is_reference: bool,
}

impl ModelEdge {
    /// An edge of a declared relationship kind, frequency unset.
    pub fn typed(kind: impl Into<String>) -> Self {
        ModelEdge {
            kind: EdgeKind::typed(kind),
            frequency: 0.0,
            is_reference: false,
        }
    }

    /// A synthetic root edge with the given frequency.
    pub fn root(frequency: f64) -> Self {
        ModelEdge {
            kind: EdgeKind::Root,
            frequency,
            is_reference: false,
        }
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }
}

/// One entry of a graph's distinct-edge projection: the structural key plus
/// the raw occurrence count within the originating graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistinctEdge {
    pub key: EdgeKey,
    pub occurrences: u32,
}
