//! Mock collaborators for testing.
//!
//! Every mock counts its invocations so tests can assert which stages
//! ran; the sensitivity short-circuit in particular is verified through
//! call counts, not just verdicts.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::errors::{DomainResult, PipelineError};
use crate::domain::models::{
    Category, Classification, GeneratedAnswer, Query, ResolutionRecord, RetrievedContext,
};
use crate::domain::ports::{AnalyticsSink, Classifier, Responder, Retriever};

/// Classifier returning a fixed classification or a scripted failure.
pub struct MockClassifier {
    result: Option<Classification>,
    calls: AtomicU32,
}

impl MockClassifier {
    pub fn returning(classification: Classification) -> Self {
        Self {
            result: Some(classification),
            calls: AtomicU32::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            result: None,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _text: &str) -> DomainResult<Classification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().ok_or_else(|| {
            PipelineError::ClassificationUnavailable("mock backend down".to_string())
        })
    }
}

/// Retriever returning a fixed context or a scripted failure.
pub struct MockRetriever {
    result: Option<RetrievedContext>,
    calls: AtomicU32,
}

impl MockRetriever {
    pub fn returning(context: RetrievedContext) -> Self {
        Self {
            result: Some(context),
            calls: AtomicU32::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::returning(RetrievedContext::empty())
    }

    pub fn unavailable() -> Self {
        Self {
            result: None,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Retriever for MockRetriever {
    async fn retrieve(&self, _text: &str, _category: Category) -> DomainResult<RetrievedContext> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .ok_or_else(|| PipelineError::RetrievalUnavailable("mock index down".to_string()))
    }
}

/// Responder returning a fixed answer or a scripted failure.
pub struct MockResponder {
    result: Option<GeneratedAnswer>,
    calls: AtomicU32,
}

impl MockResponder {
    pub fn returning(answer: GeneratedAnswer) -> Self {
        Self {
            result: Some(answer),
            calls: AtomicU32::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            result: None,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Responder for MockResponder {
    async fn respond(
        &self,
        _query: &Query,
        _context: &RetrievedContext,
    ) -> DomainResult<GeneratedAnswer> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .ok_or_else(|| PipelineError::GenerationUnavailable("mock model down".to_string()))
    }
}

/// In-memory sink that can fail the first N appends.
pub struct MemorySink {
    records: Arc<Mutex<Vec<ResolutionRecord>>>,
    fail_first: u32,
    calls: AtomicU32,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            fail_first: 0,
            calls: AtomicU32::new(0),
        }
    }

    /// Fail the first `n` append attempts, then accept writes.
    pub fn failing_first(n: u32) -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            fail_first: n,
            calls: AtomicU32::new(0),
        }
    }

    /// Fail every append attempt.
    pub fn always_failing() -> Self {
        Self::failing_first(u32::MAX)
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn records(&self) -> Vec<ResolutionRecord> {
        self.records.lock().await.clone()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnalyticsSink for MemorySink {
    async fn append(&self, record: &ResolutionRecord) -> DomainResult<()> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst);
        if attempt < self.fail_first {
            return Err(PipelineError::SinkWriteFailure(
                "mock sink transiently down".to_string(),
            ));
        }
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::EscalationVerdict;
    use chrono::Utc;
    use uuid::Uuid;

    fn record() -> ResolutionRecord {
        ResolutionRecord {
            id: Uuid::new_v4(),
            query: Query::new("test", "EMP1"),
            category: Category::GeneralPolicy,
            intent: String::new(),
            response_text: Some("answer".to_string()),
            confidence: 0.8,
            verdict: EscalationVerdict::answered(),
            sources: vec![],
            response_time_ms: 1,
            failure: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_memory_sink_fail_then_accept() {
        let sink = MemorySink::failing_first(2);
        let record = record();

        assert!(sink.append(&record).await.is_err());
        assert!(sink.append(&record).await.is_err());
        assert!(sink.append(&record).await.is_ok());
        assert_eq!(sink.calls(), 3);
        assert_eq!(sink.records().await.len(), 1);
    }
}
