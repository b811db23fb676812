//! Responder port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{GeneratedAnswer, Query, RetrievedContext};

/// Generates an answer from the query and its retrieved context.
///
/// Invoked at most once per resolution. The context may be empty; the
/// implementation is expected to produce a general response that
/// directs the employee to HR rather than inventing policy.
///
/// # Errors
///
/// - `PipelineError::GenerationUnavailable` - the model backend cannot
///   be reached or returned no usable content.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(
        &self,
        query: &Query,
        context: &RetrievedContext,
    ) -> DomainResult<GeneratedAnswer>;
}
