//! Open Exchange document assembly and serialization.
//!
//! An [`ExchangeDocument`] accumulates mined graphs into the element,
//! relationship, and diagram sections of one ArchiMate 3.0 exchange file.
//! Several per-viewpoint graphs can land in the same document; elements and
//! relationships are shared across views while every view keeps its own
//! diagram nodes and connections.
//!
//! Graph node ids double as element identifiers during assembly. They are
//! derived from labels and types, which XML NCName rules do not allow, so
//! [`ExchangeDocument::regenerate_identifiers`] must run before
//! serialization to swap every element and relationship identifier for a
//! generated one and rewire all references, including diagram connection
//! endpoints, which the exchange format points at diagram nodes rather than
//! elements.

use indexmap::IndexMap;

use ream_core::ModelGraph;

use crate::error::ArchimateError;
use crate::ident::IdGenerator;

const ARCHIMATE_NS: &str = "http://www.opengroup.org/xsd/archimate/3.0/";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str = "http://www.opengroup.org/xsd/archimate/3.0/ \
                               http://www.opengroup.org/xsd/archimate/3.0/archimate3_Diagram.xsd";
const MODEL_NAME: &str = "reference model";

/// One `<element>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeElement {
    pub kind: String,
    pub label: String,
}

/// One `<relationship>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRelationship {
    pub kind: String,
    pub source: String,
    pub target: String,
}

/// One `<node>` of a diagram, referencing an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewNode {
    pub identifier: String,
    pub element: String,
}

/// One `<connection>` of a diagram. `source` and `target` hold element ids
/// during assembly and diagram-node identifiers after regeneration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewConnection {
    pub identifier: String,
    pub relationship: String,
    pub source: String,
    pub target: String,
}

/// One `<view>` under the diagrams section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeView {
    pub identifier: String,
    pub name: String,
    pub nodes: Vec<ViewNode>,
    pub connections: Vec<ViewConnection>,
}

/// An ArchiMate Open Exchange document under construction.
#[derive(Debug, Clone)]
pub struct ExchangeDocument {
    identifier: String,
    elements: IndexMap<String, ExchangeElement>,
    relationships: IndexMap<String, ExchangeRelationship>,
    views: Vec<ExchangeView>,
    ids: IdGenerator,
}

impl ExchangeDocument {
    pub fn new() -> Self {
        Self::with_generator(IdGenerator::new())
    }

    /// Builds a document drawing identifiers from the given generator, which
    /// makes exports reproducible in tests.
    pub fn with_generator(mut ids: IdGenerator) -> Self {
        let identifier = ids.next_key();
        ExchangeDocument {
            identifier,
            elements: IndexMap::new(),
            relationships: IndexMap::new(),
            views: Vec::new(),
            ids,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn elements(&self) -> &IndexMap<String, ExchangeElement> {
        &self.elements
    }

    pub fn relationships(&self) -> &IndexMap<String, ExchangeRelationship> {
        &self.relationships
    }

    pub fn views(&self) -> &[ExchangeView] {
        &self.views
    }

    /// Adds a graph to the element and relationship sections. The null node
    /// and root edges are synthetic mining structure and never exported.
    pub fn add_graph(&mut self, graph: &ModelGraph) -> Result<(), ArchimateError> {
        self.add_elements(graph);
        self.add_relationships(graph)
    }

    /// Adds a graph as one diagram. The view is found by name or created;
    /// elements and relationships already present from earlier views are
    /// reused, but the diagram always gets its own nodes and connections.
    pub fn add_view(&mut self, name: &str, graph: &ModelGraph) -> Result<(), ArchimateError> {
        self.add_elements(graph);
        self.add_relationships(graph)?;

        let mut nodes = Vec::new();
        for (id, node) in graph.nodes() {
            if node.key.is_null() {
                continue;
            }
            nodes.push(ViewNode {
                identifier: self.ids.next_key(),
                element: id.to_string(),
            });
        }

        let mut connections = Vec::new();
        for edge in graph.edges() {
            if edge.edge.kind.is_root() {
                continue;
            }
            connections.push(ViewConnection {
                identifier: self.ids.next_key(),
                relationship: edge.id.to_string(),
                source: edge.source_id.to_string(),
                target: edge.target_id.to_string(),
            });
        }

        let idx = match self.views.iter().position(|view| view.name == name) {
            Some(idx) => idx,
            None => {
                let identifier = self.ids.next_key();
                self.views.push(ExchangeView {
                    identifier,
                    name: name.to_string(),
                    nodes: Vec::new(),
                    connections: Vec::new(),
                });
                self.views.len() - 1
            }
        };
        self.views[idx].nodes.extend(nodes);
        self.views[idx].connections.extend(connections);
        Ok(())
    }

    fn add_elements(&mut self, graph: &ModelGraph) {
        for (id, node) in graph.nodes() {
            if node.key.is_null() || self.elements.contains_key(id) {
                continue;
            }
            let (Some(label), Some(kind)) = (node.key.label(), node.key.kind()) else {
                continue;
            };
            self.elements.insert(
                id.to_string(),
                ExchangeElement {
                    kind: kind.to_string(),
                    label: label.to_string(),
                },
            );
        }
    }

    fn add_relationships(&mut self, graph: &ModelGraph) -> Result<(), ArchimateError> {
        for edge in graph.edges() {
            if edge.edge.kind.is_root() || self.relationships.contains_key(edge.id) {
                continue;
            }
            for endpoint in [edge.source_id, edge.target_id] {
                if !self.elements.contains_key(endpoint) {
                    return Err(ArchimateError::DanglingReference {
                        relationship: edge.id.to_string(),
                        element: endpoint.to_string(),
                    });
                }
            }
            self.relationships.insert(
                edge.id.to_string(),
                ExchangeRelationship {
                    kind: edge.edge.kind.as_str().to_string(),
                    source: edge.source_id.to_string(),
                    target: edge.target_id.to_string(),
                },
            );
        }
        Ok(())
    }

    /// Replaces every element and relationship identifier with a freshly
    /// generated key and rewires all references to them. Diagram node and
    /// connection identifiers are already generated keys and stay as they
    /// are; connection endpoints switch from element ids to the identifiers
    /// of the diagram nodes showing those elements.
    pub fn regenerate_identifiers(&mut self) {
        let mut element_ids: IndexMap<String, String> = IndexMap::new();
        let mut elements = IndexMap::with_capacity(self.elements.len());
        for (old, entry) in std::mem::take(&mut self.elements) {
            let new = self.ids.next_key();
            element_ids.insert(old, new.clone());
            elements.insert(new, entry);
        }
        self.elements = elements;

        let mut relationship_ids: IndexMap<String, String> = IndexMap::new();
        let mut relationships = IndexMap::with_capacity(self.relationships.len());
        for (old, mut entry) in std::mem::take(&mut self.relationships) {
            let new = self.ids.next_key();
            if let Some(source) = element_ids.get(&entry.source) {
                entry.source = source.clone();
            }
            if let Some(target) = element_ids.get(&entry.target) {
                entry.target = target.clone();
            }
            relationship_ids.insert(old, new.clone());
            relationships.insert(new, entry);
        }
        self.relationships = relationships;

        for view in &mut self.views {
            // Connection endpoints resolve against the pre-rewrite element
            // ids, so capture this view's element -> diagram-node map first.
            let mut by_element: IndexMap<String, String> = IndexMap::new();
            for node in &view.nodes {
                by_element
                    .entry(node.element.clone())
                    .or_insert_with(|| node.identifier.clone());
            }
            for node in &mut view.nodes {
                if let Some(new) = element_ids.get(&node.element) {
                    node.element = new.clone();
                }
            }
            for connection in &mut view.connections {
                if let Some(new) = relationship_ids.get(&connection.relationship) {
                    connection.relationship = new.clone();
                }
                if let Some(node_id) = by_element.get(&connection.source) {
                    connection.source = node_id.clone();
                }
                if let Some(node_id) = by_element.get(&connection.target) {
                    connection.target = node_id.clone();
                }
            }
        }
    }

    /// Serializes the document with the XML declaration and two-space
    /// indentation.
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!(
            "<model xmlns=\"{ARCHIMATE_NS}\" xmlns:xsi=\"{XSI_NS}\" \
             xsi:schemaLocation=\"{SCHEMA_LOCATION}\" identifier=\"{}\">\n",
            escape_xml(&self.identifier)
        ));
        xml.push_str(&format!(
            "  <name xml:lang=\"de\">{}</name>\n",
            escape_xml(MODEL_NAME)
        ));

        if self.elements.is_empty() {
            xml.push_str("  <elements/>\n");
        } else {
            xml.push_str("  <elements>\n");
            for (identifier, element) in &self.elements {
                xml.push_str(&format!(
                    "    <element identifier=\"{}\" xsi:type=\"{}\" xml:lang=\"de\">\n",
                    escape_xml(identifier),
                    escape_xml(&element.kind)
                ));
                xml.push_str(&format!(
                    "      <name xml:lang=\"de\">{}</name>\n",
                    escape_xml(&element.label)
                ));
                xml.push_str("    </element>\n");
            }
            xml.push_str("  </elements>\n");
        }

        if self.relationships.is_empty() {
            xml.push_str("  <relationships/>\n");
        } else {
            xml.push_str("  <relationships>\n");
            for (identifier, relationship) in &self.relationships {
                xml.push_str(&format!(
                    "    <relationship identifier=\"{}\" source=\"{}\" target=\"{}\" \
                     xsi:type=\"{}\" xml:lang=\"de\"/>\n",
                    escape_xml(identifier),
                    escape_xml(&relationship.source),
                    escape_xml(&relationship.target),
                    escape_xml(&relationship.kind)
                ));
            }
            xml.push_str("  </relationships>\n");
        }

        if !self.views.is_empty() {
            xml.push_str("  <views>\n");
            xml.push_str("    <diagrams>\n");
            for view in &self.views {
                xml.push_str(&format!(
                    "      <view identifier=\"{}\" xsi:type=\"Diagram\">\n",
                    escape_xml(&view.identifier)
                ));
                xml.push_str(&format!(
                    "        <name xml:lang=\"de\">{}</name>\n",
                    escape_xml(&view.name)
                ));
                for node in &view.nodes {
                    xml.push_str(&format!(
                        "        <node identifier=\"{}\" elementRef=\"{}\" xsi:type=\"Element\" \
                         x=\"100\" y=\"100\" w=\"100\" h=\"100\">\n",
                        escape_xml(&node.identifier),
                        escape_xml(&node.element)
                    ));
                    xml.push_str("          <style>\n");
                    xml.push_str("            <fillColor r=\"255\" g=\"255\" b=\"181\" a=\"100\"/>\n");
                    xml.push_str("            <lineColor r=\"92\" g=\"92\" b=\"92\"/>\n");
                    xml.push_str("            <font name=\"Segoe UI\" size=\"9\">\n");
                    xml.push_str("              <color r=\"0\" g=\"0\" b=\"0\"/>\n");
                    xml.push_str("            </font>\n");
                    xml.push_str("          </style>\n");
                    xml.push_str("        </node>\n");
                }
                for connection in &view.connections {
                    xml.push_str(&format!(
                        "        <connection identifier=\"{}\" xsi:type=\"Relationship\" \
                         relationshipRef=\"{}\" source=\"{}\" target=\"{}\">\n",
                        escape_xml(&connection.identifier),
                        escape_xml(&connection.relationship),
                        escape_xml(&connection.source),
                        escape_xml(&connection.target)
                    ));
                    xml.push_str("          <style>\n");
                    xml.push_str("            <lineColor r=\"0\" g=\"0\" b=\"0\"/>\n");
                    xml.push_str("            <font name=\"Segoe UI\" size=\"9\">\n");
                    xml.push_str("              <color r=\"0\" g=\"0\" b=\"0\"/>\n");
                    xml.push_str("            </font>\n");
                    xml.push_str("          </style>\n");
                    xml.push_str("        </connection>\n");
                }
                xml.push_str("      </view>\n");
            }
            xml.push_str("    </diagrams>\n");
            xml.push_str("  </views>\n");
        }

        xml.push_str("</model>\n");
        xml
    }
}

impl Default for ExchangeDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
