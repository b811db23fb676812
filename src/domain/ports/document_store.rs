//! Document ingestion port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainResult;
use crate::domain::models::Category;

/// Result of one document ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Document identity as stored
    pub document_id: String,
    /// Number of fragments indexed
    pub chunk_count: usize,
}

/// Boundary to the document index.
///
/// The pipeline treats ingestion only as "it changes future retriever
/// results"; parsing and chunking happen behind this trait. Gated to
/// roles with the document-management capability at the caller boundary.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Ingest a document's bytes under the given identity.
    ///
    /// # Errors
    ///
    /// - `PipelineError::RetrievalUnavailable` - the index cannot be
    ///   reached or rejected the document.
    async fn ingest(
        &self,
        name: &str,
        bytes: &[u8],
        document_type: &str,
        category: Option<Category>,
    ) -> DomainResult<IngestReport>;
}
