//! Analytics sink port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::ResolutionRecord;

/// Durable append-only store for resolution records.
///
/// Safe for concurrent writers; records are never updated or deleted.
/// The collaborator is assumed durable but possibly transiently
/// unavailable, so callers retry `append` with bounded backoff.
///
/// # Errors
///
/// - `PipelineError::SinkWriteFailure` - the append did not complete.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn append(&self, record: &ResolutionRecord) -> DomainResult<()>;
}
