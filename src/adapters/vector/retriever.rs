//! HTTP retriever against the vector search service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::errors::{DomainResult, PipelineError};
use crate::domain::models::{Category, RetrievalConfig, RetrievedContext, RetrievedFragment};
use crate::domain::ports::Retriever;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    text: &'a str,
    top_k: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    content: String,
    source: String,
    /// Vector distance; lower is closer
    distance: f64,
}

/// Retriever backed by a vector search service over the ingested
/// policy collection.
pub struct HttpRetriever {
    http_client: ReqwestClient,
    base_url: String,
    collection: String,
    top_k: usize,
}

impl HttpRetriever {
    pub fn new(config: &RetrievalConfig, timeout: Duration) -> Result<Self> {
        let http_client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            collection: config.collection.clone(),
            top_k: config.top_k,
        })
    }
}

#[async_trait]
impl Retriever for HttpRetriever {
    async fn retrieve(&self, text: &str, category: Category) -> DomainResult<RetrievedContext> {
        let request = SearchRequest {
            text,
            top_k: self.top_k,
            // The sentinel categories carry no filter value.
            category: match category {
                Category::Unknown | Category::Flagged => None,
                other => Some(other.as_str()),
            },
        };

        let response = self
            .http_client
            .post(format!(
                "{}/collections/{}/query",
                self.base_url, self.collection
            ))
            .json(&request)
            .send()
            .await
            .map_err(|e| PipelineError::RetrievalUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::RetrievalUnavailable(format!(
                "search returned {status}: {body}"
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::RetrievalUnavailable(e.to_string()))?;

        // Distance converts to similarity; drop fragments with no
        // positive relevance at all.
        let fragments: Vec<RetrievedFragment> = parsed
            .results
            .into_iter()
            .filter_map(|hit| {
                let relevance = 1.0 - hit.distance;
                (relevance > 0.0)
                    .then(|| RetrievedFragment::new(hit.content, hit.source, relevance))
            })
            .collect();

        debug!(fragments = fragments.len(), "retrieval complete");
        Ok(RetrievedContext::new(fragments))
    }
}
