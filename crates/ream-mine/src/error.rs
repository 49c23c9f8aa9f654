//! Error types for the mining pipelines.

use thiserror::Error;

/// Errors raised while orchestrating mining runs.
#[derive(Debug, Error)]
pub enum MineError {
    /// A named viewpoint is missing from one input model during per-view
    /// mining. Recoverable: the orchestrator logs it and continues with the
    /// remaining models for that view.
    #[error("viewpoint '{view}' does not exist in model '{model}'")]
    ViewNotFound { view: String, model: String },
}
