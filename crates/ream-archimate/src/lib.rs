//! ArchiMate Open Exchange ingestion and export.
//!
//! The format boundary of the miner:
//!
//! - [`dom`]: a small owned XML tree parsed with `quick-xml`.
//! - [`ingest`]: turns a parsed document into [`ream_core::ModelGraph`]s,
//!   either one graph for the whole model or one per diagram.
//! - [`exchange`]: assembles mined graphs back into an exchange document
//!   and serializes it.
//! - [`ident`]: generated NCName-valid identifiers for exported documents.

pub mod dom;
pub mod error;
pub mod exchange;
pub mod ident;
pub mod ingest;

pub use dom::{parse, Element};
pub use error::ArchimateError;
pub use exchange::{
    ExchangeDocument, ExchangeElement, ExchangeRelationship, ExchangeView, ViewConnection, ViewNode,
};
pub use ident::IdGenerator;
pub use ingest::{model_graph, view_graphs};
