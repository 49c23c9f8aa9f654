//! Ingestion of Open Exchange documents into model graphs.
//!
//! Two readings of the same document exist. [`model_graph`] flattens the
//! whole model into one graph over every declared element and relationship.
//! [`view_graphs`] produces one graph per diagram, keyed by the lowercased
//! view name, containing the elements shown on that diagram and the
//! relationships the diagram implies.
//!
//! A relationship belongs to a view when the view draws an explicit
//! connection for it, or when one endpoint is nested somewhere below the
//! other on the diagram. Nesting is read through containers and through
//! intermediate element nodes, so a relationship between a node and a
//! grandchild of that node still counts.

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use ream_core::{ModelEdge, ModelGraph, ModelNode};

use crate::dom::Element;
use crate::error::ArchimateError;

/// Reads the whole model into a single graph. Element identifiers become
/// node ids; a relationship referencing an undeclared element is fatal.
pub fn model_graph(document: &Element) -> Result<ModelGraph, ArchimateError> {
    let mut graph = ModelGraph::new();

    if let Some(elements) = document.child("elements") {
        for element in elements.children_named("element") {
            let id = required_attr(element, "element", "identifier")?;
            let entry = format!("element '{id}'");
            let kind = required_attr(element, &entry, "type")?;
            let label = name_text(element, &entry)?;
            graph.add_node(id, ModelNode::element(label, kind));
        }
    }

    if let Some(relationships) = document.child("relationships") {
        for relationship in relationships.children_named("relationship") {
            let id = required_attr(relationship, "relationship", "identifier")?;
            let entry = format!("relationship '{id}'");
            let source = required_attr(relationship, &entry, "source")?;
            let target = required_attr(relationship, &entry, "target")?;
            let kind = required_attr(relationship, &entry, "type")?;
            graph.add_edge(id, source, target, ModelEdge::typed(kind))?;
        }
    }

    Ok(graph)
}

/// Reads one graph per diagram, keyed by lowercased view name. Views whose
/// diagram references no declared element are dropped.
pub fn view_graphs(document: &Element) -> Result<IndexMap<String, ModelGraph>, ArchimateError> {
    let mut element_table: IndexMap<&str, (&str, &str)> = IndexMap::new();
    if let Some(elements) = document.child("elements") {
        for element in elements.children_named("element") {
            let id = required_attr(element, "element", "identifier")?;
            let entry = format!("element '{id}'");
            let kind = required_attr(element, &entry, "type")?;
            let label = name_text(element, &entry)?;
            element_table.insert(id, (label, kind));
        }
    }

    let mut relationship_table: IndexMap<&str, (&str, &str, &str)> = IndexMap::new();
    if let Some(relationships) = document.child("relationships") {
        for relationship in relationships.children_named("relationship") {
            let id = required_attr(relationship, "relationship", "identifier")?;
            let entry = format!("relationship '{id}'");
            let source = required_attr(relationship, &entry, "source")?;
            let target = required_attr(relationship, &entry, "target")?;
            let kind = required_attr(relationship, &entry, "type")?;
            relationship_table.insert(id, (source, target, kind));
        }
    }

    let mut graphs: IndexMap<String, ModelGraph> = IndexMap::new();
    let Some(diagrams) = document
        .child("views")
        .and_then(|views| views.child("diagrams"))
    else {
        return Ok(graphs);
    };

    for view in diagrams.children_named("view") {
        let entry = match view.attr("identifier") {
            Some(id) => format!("view '{id}'"),
            None => "view".to_string(),
        };
        let name = name_text(view, &entry)?.to_lowercase();

        let mut nodes: IndexSet<&str> = IndexSet::new();
        let mut descendants: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
        for node in view.children_named("node") {
            collect_view_nodes(node, &element_table, &mut nodes, &mut descendants);
        }
        if nodes.is_empty() {
            debug!(view = %name, "view without referenced elements skipped");
            continue;
        }

        let mut explicit: IndexSet<&str> = IndexSet::new();
        for connection in view.children_named("connection") {
            match connection.attr("relationshipRef") {
                Some(id) => {
                    explicit.insert(id);
                }
                None => debug!(view = %name, "connection without relationshipRef skipped"),
            }
        }

        let mut graph = ModelGraph::new();
        for &id in &nodes {
            if let Some(&(label, kind)) = element_table.get(id) {
                graph.add_node(id, ModelNode::element(label, kind));
            }
        }

        for (&id, &(source, target, kind)) in &relationship_table {
            let contained = descendants
                .get(source)
                .is_some_and(|set| set.contains(target))
                || descendants
                    .get(target)
                    .is_some_and(|set| set.contains(source));
            if !explicit.contains(id) && !contained {
                continue;
            }
            if !nodes.contains(source) || !nodes.contains(target) {
                debug!(
                    view = %name,
                    relationship = id,
                    "relationship endpoint outside view skipped"
                );
                continue;
            }
            graph.add_edge(id, source, target, ModelEdge::typed(kind))?;
        }

        graphs.insert(name, graph);
    }

    Ok(graphs)
}

/// Walks one diagram node. Label subtrees are annotations and dropped
/// whole; containers and nodes without a usable element reference are
/// transparent, their children promoted. Returns all element ids recorded
/// in this subtree so callers can build flattened descendant sets.
fn collect_view_nodes<'a>(
    node: &'a Element,
    element_table: &IndexMap<&str, (&str, &str)>,
    nodes: &mut IndexSet<&'a str>,
    descendants: &mut IndexMap<&'a str, IndexSet<&'a str>>,
) -> IndexSet<&'a str> {
    if node.attr("type") == Some("Label") {
        return IndexSet::new();
    }

    let mut subtree: IndexSet<&'a str> = IndexSet::new();
    for child in node.children_named("node") {
        subtree.extend(collect_view_nodes(child, element_table, nodes, descendants));
    }

    match node.attr("elementRef") {
        Some(id) if element_table.contains_key(id) => {
            nodes.insert(id);
            descendants
                .entry(id)
                .or_default()
                .extend(subtree.iter().copied());
            let mut recorded = subtree;
            recorded.insert(id);
            recorded
        }
        Some(id) => {
            warn!(element = id, "diagram node references undeclared element, skipped");
            subtree
        }
        None => subtree,
    }
}

fn required_attr<'a>(
    element: &'a Element,
    entry: &str,
    name: &str,
) -> Result<&'a str, ArchimateError> {
    element
        .attr(name)
        .ok_or_else(|| ArchimateError::MalformedModel {
            entry: entry.to_string(),
            attribute: name.to_string(),
        })
}

fn name_text<'a>(element: &'a Element, entry: &str) -> Result<&'a str, ArchimateError> {
    let name = element
        .child("name")
        .map(|child| child.text.as_str())
        .unwrap_or("");
    if name.is_empty() {
        return Err(ArchimateError::MalformedModel {
            entry: entry.to_string(),
            attribute: "name".to_string(),
        });
    }
    Ok(name)
}
