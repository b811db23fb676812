//! Classifier port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Classification;

/// Maps raw query text to a topic category and a sensitivity flag.
///
/// Implementations must be deterministic for identical input (same
/// model/version) and must not consult retrieval or generation.
/// Sensitivity detection takes precedence over the category: when
/// `sensitive` is true the category is still assigned but never used
/// for retrieval.
///
/// # Errors
///
/// - `PipelineError::ClassificationUnavailable` - backend unreachable or
///   its output unusable. The orchestrator treats this as a
///   `complex`-reason escalation, never as a silent default category.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` for concurrent use across
/// tokio tasks.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> DomainResult<Classification>;
}
