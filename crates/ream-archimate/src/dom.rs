//! Minimal XML tree for Open Exchange documents.
//!
//! `quick-xml` gives us the event stream; this module folds it into an owned
//! element tree that ingestion can walk freely. Names are stored without
//! their namespace prefix, attribute keys as written, so `attr` resolves
//! prefixed attributes like `xsi:type` by their local part.

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ArchimateError;

/// One XML element: local name, attributes in document order, child elements,
/// and the concatenated text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    /// Looks up an attribute by its local name, ignoring any prefix.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find_map(|(key, value)| {
            let local = key.rsplit(':').next().unwrap_or(key.as_str());
            (local == name).then_some(value.as_str())
        })
    }

    /// First direct child with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All direct children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

/// Parses a document into its root element.
pub fn parse(xml: &str) -> Result<Element, ArchimateError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    root.ok_or(ArchimateError::EmptyDocument)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, ArchimateError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = IndexMap::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    }
}
