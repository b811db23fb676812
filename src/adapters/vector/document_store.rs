//! HTTP document ingestion against the vector search service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use crate::domain::errors::{DomainResult, PipelineError};
use crate::domain::models::{Category, RetrievalConfig};
use crate::domain::ports::{DocumentStore, IngestReport};

#[derive(Debug, Deserialize)]
struct IngestResponse {
    document_id: String,
    chunk_count: usize,
}

/// Uploads document bytes to the vector service, which parses, chunks
/// and indexes them into the policy collection.
pub struct HttpDocumentStore {
    http_client: ReqwestClient,
    base_url: String,
    collection: String,
}

impl HttpDocumentStore {
    pub fn new(config: &RetrievalConfig, timeout: Duration) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
        })
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn ingest(
        &self,
        name: &str,
        bytes: &[u8],
        document_type: &str,
        category: Option<Category>,
    ) -> DomainResult<IngestReport> {
        let mut request = self
            .http_client
            .post(format!(
                "{}/collections/{}/documents",
                self.base_url, self.collection
            ))
            .query(&[("name", name), ("document_type", document_type)])
            .header("content-type", "application/octet-stream")
            .body(bytes.to_vec());

        if let Some(category) = category {
            request = request.query(&[("category", category.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PipelineError::RetrievalUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::RetrievalUnavailable(format!(
                "ingestion returned {status}: {body}"
            )));
        }

        let parsed: IngestResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::RetrievalUnavailable(e.to_string()))?;

        info!(
            document_id = %parsed.document_id,
            chunks = parsed.chunk_count,
            "document ingested"
        );

        Ok(IngestReport {
            document_id: parsed.document_id,
            chunk_count: parsed.chunk_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ingest_success() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/collections/hr_policies/documents")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("name".into(), "leave_policy.md".into()),
                mockito::Matcher::UrlEncoded("document_type".into(), "policy".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"document_id":"leave_policy.md","chunk_count":7}"#)
            .create_async()
            .await;

        let config = RetrievalConfig {
            base_url: server.url(),
            ..Default::default()
        };
        let store = HttpDocumentStore::new(&config, Duration::from_secs(5)).unwrap();

        let report = store
            .ingest("leave_policy.md", b"Employees receive...", "policy", None)
            .await
            .unwrap();

        assert_eq!(report.document_id, "leave_policy.md");
        assert_eq!(report.chunk_count, 7);
    }

    #[tokio::test]
    async fn test_ingest_rejection_maps_to_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/collections/hr_policies/documents")
            .match_query(mockito::Matcher::Any)
            .with_status(422)
            .with_body("unsupported file type")
            .create_async()
            .await;

        let config = RetrievalConfig {
            base_url: server.url(),
            ..Default::default()
        };
        let store = HttpDocumentStore::new(&config, Duration::from_secs(5)).unwrap();

        let err = store
            .ingest("virus.exe", b"MZ", "binary", None)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::RetrievalUnavailable(_)));
    }
}
