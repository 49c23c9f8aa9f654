//! Ingestion tests over complete Open Exchange documents.
//!
//! Each test parses a full document string and checks the graphs produced
//! by whole-model and per-diagram ingestion: element resolution, required
//! attributes, diagram nesting through containers, and the relationship
//! inclusion rules for views.

use ream_archimate::{model_graph, parse, view_graphs, ArchimateError};
use ream_core::NodeKey;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn document(body: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <model xmlns=\"http://www.opengroup.org/xsd/archimate/3.0/\" \
         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
         identifier=\"id-model\">\n<name xml:lang=\"en\">Order handling</name>\n\
         {body}\n</model>"
    )
}

const ELEMENTS: &str = r#"<elements>
    <element identifier="id-a" xsi:type="BusinessActor"><name xml:lang="en">Customer</name></element>
    <element identifier="id-b" xsi:type="BusinessProcess"><name xml:lang="en">Order</name></element>
    <element identifier="id-c" xsi:type="ApplicationComponent"><name xml:lang="en">Portal</name></element>
</elements>"#;

const RELATIONSHIPS: &str = r#"<relationships>
    <relationship identifier="id-r1" source="id-a" target="id-b" xsi:type="Triggering"/>
    <relationship identifier="id-r2" source="id-c" target="id-b" xsi:type="Serving"/>
</relationships>"#;

// ---------------------------------------------------------------------------
// Whole-model ingestion
// ---------------------------------------------------------------------------

#[test]
fn whole_model_ingestion_reads_elements_and_relationships() {
    let xml = document(&format!("{ELEMENTS}\n{RELATIONSHIPS}"));
    let root = parse(&xml).unwrap();
    let graph = model_graph(&root).unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);

    let customer = graph.node("id-a").unwrap();
    assert_eq!(customer.key, NodeKey::element("Customer", "BusinessActor"));

    let kinds: Vec<&str> = graph.edges().map(|view| view.edge.kind.as_str()).collect();
    assert_eq!(kinds, ["Triggering", "Serving"]);
}

#[test]
fn sections_are_optional_for_the_whole_model() {
    let xml = document(ELEMENTS);
    let root = parse(&xml).unwrap();
    let graph = model_graph(&root).unwrap();
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 0);

    assert!(view_graphs(&root).unwrap().is_empty());
}

#[test]
fn missing_required_attributes_are_malformed() {
    let no_type = document(
        r#"<elements><element identifier="id-a"><name xml:lang="en">Customer</name></element></elements>"#,
    );
    let err = model_graph(&parse(&no_type).unwrap()).unwrap_err();
    assert!(matches!(
        err,
        ArchimateError::MalformedModel { ref attribute, .. } if attribute == "type"
    ));

    let no_name =
        document(r#"<elements><element identifier="id-a" xsi:type="BusinessActor"/></elements>"#);
    let err = model_graph(&parse(&no_name).unwrap()).unwrap_err();
    assert!(matches!(
        err,
        ArchimateError::MalformedModel { ref entry, ref attribute }
            if entry == "element 'id-a'" && attribute == "name"
    ));

    let no_source = document(&format!(
        "{ELEMENTS}\n<relationships><relationship identifier=\"id-r1\" \
         target=\"id-b\" xsi:type=\"Serving\"/></relationships>"
    ));
    let err = model_graph(&parse(&no_source).unwrap()).unwrap_err();
    assert!(matches!(
        err,
        ArchimateError::MalformedModel { ref attribute, .. } if attribute == "source"
    ));
}

#[test]
fn relationship_to_an_undeclared_element_is_fatal() {
    let xml = document(&format!(
        "{ELEMENTS}\n<relationships><relationship identifier=\"id-r1\" \
         source=\"id-a\" target=\"id-ghost\" xsi:type=\"Serving\"/></relationships>"
    ));
    let err = model_graph(&parse(&xml).unwrap()).unwrap_err();
    assert!(matches!(err, ArchimateError::Graph(_)));
    assert!(err.to_string().contains("id-ghost"));
}

// ---------------------------------------------------------------------------
// Per-diagram ingestion
// ---------------------------------------------------------------------------

fn views(body: &str) -> String {
    document(&format!(
        "{ELEMENTS}\n{RELATIONSHIPS}\n<views><diagrams>\n{body}\n</diagrams></views>"
    ))
}

#[test]
fn views_are_keyed_by_lowercased_name() {
    let xml = views(
        r#"<view identifier="id-v1" xsi:type="Diagram">
            <name xml:lang="en">Business Overview</name>
            <node identifier="id-n1" elementRef="id-a" xsi:type="Element" x="1" y="1" w="9" h="9"/>
        </view>"#,
    );
    let graphs = view_graphs(&parse(&xml).unwrap()).unwrap();
    assert_eq!(graphs.len(), 1);
    let graph = &graphs["business overview"];
    assert_eq!(graph.node_count(), 1);
    assert!(graph.node_exists("id-a"));
}

#[test]
fn label_annotations_are_dropped_with_their_subtree() {
    let xml = views(
        r#"<view identifier="id-v1" xsi:type="Diagram">
            <name xml:lang="en">Overview</name>
            <node identifier="id-n1" elementRef="id-a" xsi:type="Element"/>
            <node identifier="id-n2" xsi:type="Label">
                <node identifier="id-n3" elementRef="id-b" xsi:type="Element"/>
            </node>
        </view>"#,
    );
    let graphs = view_graphs(&parse(&xml).unwrap()).unwrap();
    let graph = &graphs["overview"];
    assert!(graph.node_exists("id-a"));
    assert!(!graph.node_exists("id-b"));
}

#[test]
fn nesting_through_a_container_implies_the_relationship() {
    // id-a encloses a container holding id-b; id-r1 connects a to b and has
    // no explicit connection, so it must still join the view.
    let xml = views(
        r#"<view identifier="id-v1" xsi:type="Diagram">
            <name xml:lang="en">Overview</name>
            <node identifier="id-n1" elementRef="id-a" xsi:type="Element">
                <node identifier="id-n2" xsi:type="Container">
                    <node identifier="id-n3" elementRef="id-b" xsi:type="Element"/>
                </node>
            </node>
        </view>"#,
    );
    let graphs = view_graphs(&parse(&xml).unwrap()).unwrap();
    let graph = &graphs["overview"];
    assert_eq!(graph.node_count(), 2);
    assert!(graph.edge_exists("id-r1"));
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn sibling_elements_without_a_connection_share_no_edge() {
    let xml = views(
        r#"<view identifier="id-v1" xsi:type="Diagram">
            <name xml:lang="en">Overview</name>
            <node identifier="id-n1" elementRef="id-a" xsi:type="Element"/>
            <node identifier="id-n2" elementRef="id-b" xsi:type="Element"/>
        </view>"#,
    );
    let graphs = view_graphs(&parse(&xml).unwrap()).unwrap();
    let graph = &graphs["overview"];
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn explicit_connections_bring_their_relationship() {
    let xml = views(
        r#"<view identifier="id-v1" xsi:type="Diagram">
            <name xml:lang="en">Overview</name>
            <node identifier="id-n1" elementRef="id-b" xsi:type="Element"/>
            <node identifier="id-n2" elementRef="id-c" xsi:type="Element"/>
            <connection identifier="id-co1" relationshipRef="id-r2" xsi:type="Relationship" source="id-n2" target="id-n1"/>
        </view>"#,
    );
    let graphs = view_graphs(&parse(&xml).unwrap()).unwrap();
    let graph = &graphs["overview"];
    assert!(graph.edge_exists("id-r2"));
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn connections_whose_endpoint_is_off_diagram_are_skipped() {
    // id-r1 targets id-b, which this diagram does not show.
    let xml = views(
        r#"<view identifier="id-v1" xsi:type="Diagram">
            <name xml:lang="en">Overview</name>
            <node identifier="id-n1" elementRef="id-a" xsi:type="Element"/>
            <connection identifier="id-co1" relationshipRef="id-r1" xsi:type="Relationship" source="id-n1" target="id-n1"/>
        </view>"#,
    );
    let graphs = view_graphs(&parse(&xml).unwrap()).unwrap();
    let graph = &graphs["overview"];
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn views_without_model_elements_are_dropped() {
    let xml = views(
        r#"<view identifier="id-v1" xsi:type="Diagram">
            <name xml:lang="en">Notes</name>
            <node identifier="id-n1" xsi:type="Label"/>
        </view>
        <view identifier="id-v2" xsi:type="Diagram">
            <name xml:lang="en">Overview</name>
            <node identifier="id-n2" elementRef="id-a" xsi:type="Element"/>
        </view>"#,
    );
    let graphs = view_graphs(&parse(&xml).unwrap()).unwrap();
    assert_eq!(graphs.len(), 1);
    assert!(graphs.contains_key("overview"));
}

#[test]
fn unknown_element_references_are_tolerated() {
    let xml = views(
        r#"<view identifier="id-v1" xsi:type="Diagram">
            <name xml:lang="en">Overview</name>
            <node identifier="id-n1" elementRef="id-ghost" xsi:type="Element">
                <node identifier="id-n2" elementRef="id-a" xsi:type="Element"/>
            </node>
        </view>"#,
    );
    let graphs = view_graphs(&parse(&xml).unwrap()).unwrap();
    let graph = &graphs["overview"];
    assert_eq!(graph.node_count(), 1);
    assert!(graph.node_exists("id-a"));
}

#[test]
fn a_view_missing_its_name_is_malformed() {
    let xml = views(
        r#"<view identifier="id-v1" xsi:type="Diagram">
            <node identifier="id-n1" elementRef="id-a" xsi:type="Element"/>
        </view>"#,
    );
    let err = view_graphs(&parse(&xml).unwrap()).unwrap_err();
    assert!(matches!(
        err,
        ArchimateError::MalformedModel { ref entry, ref attribute }
            if entry == "view 'id-v1'" && attribute == "name"
    ));
}
