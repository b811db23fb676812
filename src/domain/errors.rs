//! Domain errors for the hrdesk resolution system.
//!
//! The first three variants are absorbed by the orchestrator and
//! converted into `complex`-reason escalations; they never surface to
//! the caller as bare technical failures. `Unauthorized` is the only
//! error that blocks a request outright, before the pipeline starts.

use thiserror::Error;

use super::models::query::Role;

/// Errors raised at the pipeline's collaborator boundaries.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Classification backend unavailable: {0}")]
    ClassificationUnavailable(String),

    #[error("Retrieval backend unavailable: {0}")]
    RetrievalUnavailable(String),

    #[error("Generation backend unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("Analytics sink write failed: {0}")]
    SinkWriteFailure(String),

    #[error("Role {role:?} lacks the {capability} capability")]
    Unauthorized { role: Role, capability: String },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

pub type DomainResult<T> = Result<T, PipelineError>;

impl From<sqlx::Error> for PipelineError {
    fn from(err: sqlx::Error) -> Self {
        PipelineError::SinkWriteFailure(err.to_string())
    }
}
