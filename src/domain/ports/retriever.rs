//! Retriever port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Category, RetrievedContext};

/// Returns ranked policy fragments supporting a query.
///
/// An empty result is a valid business outcome (policy gap), distinct
/// from a backend failure: empty proceeds to generation with no
/// context, unavailability escalates immediately and skips generation.
///
/// # Errors
///
/// - `PipelineError::RetrievalUnavailable` - the index cannot be
///   reached or the search failed.
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn retrieve(&self, text: &str, category: Category) -> DomainResult<RetrievedContext>;
}
