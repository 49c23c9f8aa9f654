//! Structural identity keys for nodes and edges.
//!
//! Model elements have no stable identifiers across independently authored
//! inputs, so identity is structural: a node is identified by its label plus
//! element kind, an edge by its endpoint keys plus relationship kind. The
//! canonical string rendering of a key doubles as the external id under which
//! reference-graph entries are stored and serialized.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical id of the synthetic null node (`label=None, type=None`).
pub const NULL_NODE_ID: &str = "NoneNone";

/// Reserved kind string for synthetic root edges.
pub const ROOT_EDGE_KIND: &str = "root_edge";

/// Structural identity of a node: label plus element kind.
///
/// The `Null` variant is the synthetic anchor for root edges. It takes part
/// in mining like any other node but is always removed from final output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKey {
    /// The synthetic null node.
    Null,
    /// A real model element.
    Element { label: String, kind: String },
}

impl NodeKey {
    /// Builds the key of a real element.
    pub fn element(label: impl Into<String>, kind: impl Into<String>) -> Self {
        NodeKey::Element {
            label: label.into(),
            kind: kind.into(),
        }
    }

    /// True for the synthetic null node.
    pub fn is_null(&self) -> bool {
        matches!(self, NodeKey::Null)
    }

    /// The element label, if this is a real element.
    pub fn label(&self) -> Option<&str> {
        match self {
            NodeKey::Null => None,
            NodeKey::Element { label, .. } => Some(label),
        }
    }

    /// The element kind, if this is a real element.
    pub fn kind(&self) -> Option<&str> {
        match self {
            NodeKey::Null => None,
            NodeKey::Element { kind, .. } => Some(kind),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Null => f.write_str(NULL_NODE_ID),
            NodeKey::Element { label, kind } => write!(f, "{label}{kind}"),
        }
    }
}

/// Relationship kind of an edge.
///
/// `Root` is the reserved synthetic kind attached to edges from the null node
/// to root nodes; every kind read from an input document is `Typed`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Synthetic root edge.
    Root,
    /// A relationship kind declared in an input document.
    Typed(String),
}

impl EdgeKind {
    /// Builds a kind from a declared relationship type string.
    ///
    /// A document declaring the reserved root-edge kind maps onto `Root`, so
    /// the synthetic kind can never be shadowed by a typed twin.
    pub fn typed(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        if kind == ROOT_EDGE_KIND {
            EdgeKind::Root
        } else {
            EdgeKind::Typed(kind)
        }
    }

    /// True for the synthetic root-edge kind.
    pub fn is_root(&self) -> bool {
        matches!(self, EdgeKind::Root)
    }

    /// The kind string as written in exchange documents.
    pub fn as_str(&self) -> &str {
        match self {
            EdgeKind::Root => ROOT_EDGE_KIND,
            EdgeKind::Typed(kind) => kind,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural identity of an edge: source key, target key, kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub source: NodeKey,
    pub target: NodeKey,
    pub kind: EdgeKind,
}

impl EdgeKey {
    pub fn new(source: NodeKey, target: NodeKey, kind: EdgeKind) -> Self {
        EdgeKey {
            source,
            target,
            kind,
        }
    }

    /// The key of a synthetic root edge anchored at the null node.
    pub fn root(target: NodeKey) -> Self {
        EdgeKey {
            source: NodeKey::Null,
            target,
            kind: EdgeKind::Root,
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.source, self.target, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_key_renders_as_none_none() {
        assert_eq!(NodeKey::Null.to_string(), "NoneNone");
        assert!(NodeKey::Null.is_null());
        assert_eq!(NodeKey::Null.label(), None);
    }

    #[test]
    fn element_key_renders_as_label_then_kind() {
        let key = NodeKey::element("Claims handling", "BusinessProcess");
        assert_eq!(key.to_string(), "Claims handlingBusinessProcess");
        assert_eq!(key.label(), Some("Claims handling"));
        assert_eq!(key.kind(), Some("BusinessProcess"));
    }

    #[test]
    fn typed_kind_never_shadows_root() {
        assert_eq!(EdgeKind::typed("root_edge"), EdgeKind::Root);
        assert_eq!(EdgeKind::typed("Serving"), EdgeKind::Typed("Serving".into()));
        assert_eq!(EdgeKind::Root.as_str(), "root_edge");
    }

    #[test]
    fn edge_key_concatenates_parts() {
        let key = EdgeKey::new(
            NodeKey::element("A", "T1"),
            NodeKey::element("B", "T2"),
            EdgeKind::typed("Flow"),
        );
        assert_eq!(key.to_string(), "AT1BT2Flow");

        let root = EdgeKey::root(NodeKey::element("A", "T1"));
        assert_eq!(root.to_string(), "NoneNoneAT1root_edge");
    }
}
