//! Core error types for ream-core.
//!
//! Uses `thiserror` for structured, matchable error variants.

use thiserror::Error;

/// Errors produced by graph construction.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An edge was added whose endpoint id is not a known node id. Fatal for
    /// the document being ingested: edges are only added once every node of
    /// the same document has been collected, so an unknown id here means the
    /// document references an element it never declares.
    #[error("edge '{edge}' references unknown node id '{endpoint}'")]
    UnresolvableEdgeEndpoint { edge: String, endpoint: String },
}
