//! Tabular report formatting for mined graphs.
//!
//! Everything here renders to a `String`; the caller decides where the
//! bytes go. Fields follow RFC 4180 quoting so labels with commas or
//! quotes survive a round trip through spreadsheet tooling.

use indexmap::IndexMap;
use ream_core::ModelGraph;

// ---------------------------------------------------------------------------
// CSV rendering
// ---------------------------------------------------------------------------

/// Renders the node table: one row per node, keyed by identifier.
///
/// The `is_reference` column is only emitted for refined graphs, where
/// the marking pass has actually run.
pub fn nodes_csv(graph: &ModelGraph, with_reference: bool) -> String {
    let mut out = String::new();
    out.push_str("id,label,type,frequency");
    if with_reference {
        out.push_str(",is_reference");
    }
    out.push('\n');
    for (id, node) in graph.nodes() {
        out.push_str(&csv_field(id));
        out.push(',');
        out.push_str(&csv_field(node.key.label().unwrap_or("")));
        out.push(',');
        out.push_str(&csv_field(node.key.kind().unwrap_or("")));
        out.push(',');
        out.push_str(&node.frequency.to_string());
        if with_reference {
            out.push(',');
            out.push_str(if node.is_reference { "true" } else { "false" });
        }
        out.push('\n');
    }
    out
}

/// Renders the edge table: one row per edge with its endpoint identifiers.
pub fn edges_csv(graph: &ModelGraph, with_reference: bool) -> String {
    let mut out = String::new();
    out.push_str("id,source,target,type,frequency");
    if with_reference {
        out.push_str(",is_reference");
    }
    out.push('\n');
    for view in graph.edges() {
        out.push_str(&csv_field(view.id));
        out.push(',');
        out.push_str(&csv_field(view.source_id));
        out.push(',');
        out.push_str(&csv_field(view.target_id));
        out.push(',');
        out.push_str(&csv_field(view.edge.kind.as_str()));
        out.push(',');
        out.push_str(&view.edge.frequency.to_string());
        if with_reference {
            out.push(',');
            out.push_str(if view.edge.is_reference { "true" } else { "false" });
        }
        out.push('\n');
    }
    out
}

/// Renders an occurrence table: one row per kind, in first-seen order.
pub fn stats_csv(stats: &IndexMap<String, usize>) -> String {
    let mut out = String::new();
    out.push_str("type,count\n");
    for (kind, count) in stats {
        out.push_str(&csv_field(kind));
        out.push(',');
        out.push_str(&count.to_string());
        out.push('\n');
    }
    out
}

/// Turns a view name into a file stem usable on every platform.
///
/// View names come straight out of the exchange files and may contain
/// path separators.
pub fn view_file_stem(view: &str) -> String {
    view.replace(['/', '\\'], "_")
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        let mut quoted = String::with_capacity(value.len() + 2);
        quoted.push('"');
        for ch in value.chars() {
            if ch == '"' {
                quoted.push('"');
            }
            quoted.push(ch);
        }
        quoted.push('"');
        quoted
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ream_core::{ModelEdge, ModelNode};

    fn sample_graph() -> ModelGraph {
        let mut graph = ModelGraph::new();
        graph.add_node(
            "ClerkBusinessRole",
            ModelNode::element("Clerk", "BusinessRole").with_frequency(2.0),
        );
        graph.add_node(
            "PayBusinessProcess",
            ModelNode::element("Pay", "BusinessProcess").with_frequency(0.5),
        );
        graph
            .add_edge(
                "ClerkBusinessRolePayBusinessProcessAssignment",
                "ClerkBusinessRole",
                "PayBusinessProcess",
                ModelEdge::typed("Assignment").with_frequency(1.5),
            )
            .unwrap();
        graph
    }

    #[test]
    fn node_rows_carry_identifier_label_kind_and_frequency() {
        let csv = nodes_csv(&sample_graph(), false);
        assert_eq!(
            csv,
            "id,label,type,frequency\n\
             ClerkBusinessRole,Clerk,BusinessRole,2\n\
             PayBusinessProcess,Pay,BusinessProcess,0.5\n"
        );
    }

    #[test]
    fn edge_rows_carry_both_endpoints() {
        let csv = edges_csv(&sample_graph(), false);
        assert_eq!(
            csv,
            "id,source,target,type,frequency\n\
             ClerkBusinessRolePayBusinessProcessAssignment,\
             ClerkBusinessRole,PayBusinessProcess,Assignment,1.5\n"
        );
    }

    #[test]
    fn reference_column_appears_only_when_requested() {
        let mut graph = ModelGraph::new();
        let mut clerk = ModelNode::element("Clerk", "BusinessRole").with_frequency(2.0);
        clerk.is_reference = true;
        graph.add_node("ClerkBusinessRole", clerk);
        let plain = nodes_csv(&graph, false);
        assert!(!plain.contains("is_reference"));
        let refined = nodes_csv(&graph, true);
        assert!(refined.starts_with("id,label,type,frequency,is_reference\n"));
        assert!(refined.contains("ClerkBusinessRole,Clerk,BusinessRole,2,true\n"));
    }

    #[test]
    fn fields_with_commas_and_quotes_are_escaped() {
        let mut graph = ModelGraph::new();
        graph.add_node(
            "id-1",
            ModelNode::element("Order, \"rush\"", "BusinessObject"),
        );
        let csv = nodes_csv(&graph, false);
        assert!(csv.contains("id-1,\"Order, \"\"rush\"\"\",BusinessObject,0\n"));
    }

    #[test]
    fn stats_keep_first_seen_order() {
        let mut stats = IndexMap::new();
        stats.insert("BusinessProcess".to_string(), 4);
        stats.insert("ApplicationComponent".to_string(), 1);
        assert_eq!(
            stats_csv(&stats),
            "type,count\nBusinessProcess,4\nApplicationComponent,1\n"
        );
    }

    #[test]
    fn view_names_with_separators_become_flat_file_stems() {
        assert_eq!(view_file_stem("Business/IT Alignment"), "Business_IT Alignment");
        assert_eq!(view_file_stem("plain"), "plain");
    }
}
