//! Error types for ArchiMate document ingestion and export.
//!
//! Uses `thiserror` for structured, matchable error variants.

use thiserror::Error;

use ream_core::CoreError;

/// Errors produced while reading or writing Open Exchange documents.
#[derive(Debug, Error)]
pub enum ArchimateError {
    /// The document is not well-formed XML.
    #[error("invalid xml: {0}")]
    InvalidXml(#[from] quick_xml::Error),

    /// An attribute list could not be decoded.
    #[error("invalid xml attribute: {0}")]
    InvalidAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// The document contains no root element at all.
    #[error("document contains no root element")]
    EmptyDocument,

    /// A model entry lacks an attribute the exchange format requires. Element
    /// and relationship declarations must carry an identifier, a type, and
    /// (for elements) a non-empty name.
    #[error("{entry} is missing required attribute '{attribute}'")]
    MalformedModel { entry: String, attribute: String },

    /// A relationship points at an element the document never declares.
    #[error("relationship '{relationship}' references undeclared element '{element}'")]
    DanglingReference {
        relationship: String,
        element: String,
    },

    /// Graph construction rejected the ingested structure.
    #[error(transparent)]
    Graph(#[from] CoreError),
}
