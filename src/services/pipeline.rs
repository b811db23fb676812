//! The query-resolution pipeline.
//!
//! One `resolve` call drives a query through the stage machine:
//! classification, the sensitive fast path or retrieval, generation,
//! confidence assessment, the escalation decision, and the analytics
//! append. Exactly one resolution record comes out of every call, even
//! when an upstream collaborator fails or times out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainResult, PipelineError};
use crate::domain::models::{
    Category, Config, EscalationReason, EscalationVerdict, FailureAnnotation, FailureStage,
    GeneratedAnswer, Query, ResolutionOutcome, ResolutionRecord, ResolutionStage,
    SinkRetryConfig, SinkStatus, TimeoutsConfig,
};
use crate::domain::ports::{AnalyticsSink, Classifier, Responder, Retriever};
use crate::infrastructure::retry::RetryPolicy;
use crate::services::confidence::ConfidenceAssessor;
use crate::services::escalation::EscalationPolicy;
use crate::services::notice;

/// Working state accumulated while the stage machine runs.
///
/// Collapsed into the immutable record once a verdict exists.
struct Draft {
    category: Category,
    intent: String,
    answer: Option<GeneratedAnswer>,
    confidence: f64,
    sources: Vec<String>,
    context_empty: bool,
    failure: Option<FailureAnnotation>,
}

impl Draft {
    fn new() -> Self {
        Self {
            category: Category::Unknown,
            intent: String::new(),
            answer: None,
            confidence: 0.0,
            sources: Vec::new(),
            context_empty: true,
            failure: None,
        }
    }
}

/// Orchestrates one query-processing transaction per call.
///
/// Holds no per-query state; concurrent resolutions share only the
/// sink (append-only) and the immutable policy configuration.
pub struct ResolutionPipeline {
    classifier: Arc<dyn Classifier>,
    retriever: Arc<dyn Retriever>,
    responder: Arc<dyn Responder>,
    sink: Arc<dyn AnalyticsSink>,
    assessor: ConfidenceAssessor,
    policy: EscalationPolicy,
    timeouts: TimeoutsConfig,
    sink_retry: SinkRetryConfig,
}

impl ResolutionPipeline {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        retriever: Arc<dyn Retriever>,
        responder: Arc<dyn Responder>,
        sink: Arc<dyn AnalyticsSink>,
        config: &Config,
    ) -> Self {
        Self {
            classifier,
            retriever,
            responder,
            sink,
            assessor: ConfidenceAssessor::new(&config.policy),
            policy: EscalationPolicy::new(&config.policy),
            timeouts: config.timeouts.clone(),
            sink_retry: config.sink_retry.clone(),
        }
    }

    /// Resolve one query to a record and a sink write status.
    ///
    /// # Errors
    ///
    /// - `PipelineError::InvalidQuery` - the query failed boundary
    ///   validation and never entered the pipeline.
    ///
    /// Collaborator failures do not propagate: they are absorbed into a
    /// `complex`-reason escalation so the caller always receives a
    /// record. A sink failure after exhausted retries is reported on
    /// the outcome's `sink` field, alongside the otherwise-successful
    /// response.
    pub async fn resolve(&self, query: Query) -> DomainResult<ResolutionOutcome> {
        query.validate().map_err(PipelineError::InvalidQuery)?;

        let session_id = Uuid::new_v4();
        let started = Instant::now();
        let mut stage = ResolutionStage::Received;

        let (draft, verdict) = self.run_stages(session_id, &query, &mut stage).await;
        advance(&mut stage, ResolutionStage::Decided, session_id);

        let response_text = if verdict.escalated {
            Some(notice::escalated_response(
                draft.answer.as_ref().map(|a| a.text.as_str()),
                verdict.reason,
                session_id,
            ))
        } else {
            draft.answer.as_ref().map(|a| a.text.clone())
        };

        let record = ResolutionRecord {
            id: session_id,
            query,
            category: draft.category,
            intent: draft.intent,
            response_text,
            confidence: draft.confidence,
            verdict,
            sources: draft.sources,
            response_time_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            failure: draft.failure,
            created_at: Utc::now(),
        };

        let sink_status = self.log_record(&record).await;
        advance(&mut stage, ResolutionStage::Logged, session_id);
        advance(&mut stage, ResolutionStage::Done, session_id);

        info!(
            session_id = %session_id,
            category = record.category.as_str(),
            confidence = record.confidence,
            escalated = record.verdict.escalated,
            reason = record.verdict.reason.as_str(),
            response_time_ms = record.response_time_ms,
            "resolution complete"
        );

        Ok(ResolutionOutcome {
            record,
            sink: sink_status,
        })
    }

    /// Drive the stages up to (but not including) `Decided`.
    ///
    /// Returns the draft and the verdict; every failure path synthesizes
    /// a `complex` verdict with a failure annotation instead of
    /// propagating.
    async fn run_stages(
        &self,
        session_id: Uuid,
        query: &Query,
        stage: &mut ResolutionStage,
    ) -> (Draft, EscalationVerdict) {
        let mut draft = Draft::new();

        // Classification
        let classification = match self
            .call_with_timeout(
                self.timeouts.classify_secs,
                self.classifier.classify(&query.text),
                FailureStage::Classification,
            )
            .await
        {
            Ok(c) => c,
            Err(annotation) => {
                warn!(session_id = %session_id, stage = annotation.stage.as_str(),
                      error = %annotation.message, "stage failed, escalating");
                draft.failure = Some(annotation);
                return (draft, synthesized_verdict());
            }
        };
        advance(stage, ResolutionStage::Classified, session_id);

        // Sensitive fast path: no retrieval, no generation.
        if classification.sensitive {
            advance(stage, ResolutionStage::EscalatedSensitive, session_id);
            draft.category = Category::Flagged;
            draft.intent = classification.intent;
            let verdict = self
                .policy
                .decide(true, 0.0, false, Category::Flagged);
            return (draft, verdict);
        }

        draft.category = classification.category;
        draft.intent = classification.intent;

        // Retrieval
        let context = match self
            .call_with_timeout(
                self.timeouts.retrieve_secs,
                self.retriever.retrieve(&query.text, classification.category),
                FailureStage::Retrieval,
            )
            .await
        {
            Ok(context) => context,
            Err(annotation) => {
                warn!(session_id = %session_id, stage = annotation.stage.as_str(),
                      error = %annotation.message, "stage failed, escalating");
                draft.failure = Some(annotation);
                return (draft, synthesized_verdict());
            }
        };
        advance(stage, ResolutionStage::Retrieved, session_id);
        draft.context_empty = context.is_empty();
        draft.sources = context.sources();

        // Generation. An empty context still generates: the responder
        // produces a general answer and the verdict downgrades it to a
        // policy-gap escalation.
        let answer = match self
            .call_with_timeout(
                self.timeouts.generate_secs,
                self.responder.respond(query, &context),
                FailureStage::Generation,
            )
            .await
        {
            Ok(answer) => answer,
            Err(annotation) => {
                warn!(session_id = %session_id, stage = annotation.stage.as_str(),
                      error = %annotation.message, "stage failed, escalating");
                draft.failure = Some(annotation);
                return (draft, synthesized_verdict());
            }
        };
        advance(stage, ResolutionStage::Generated, session_id);

        // Assessment and decision are pure and cannot fail.
        draft.confidence = self.assessor.assess(&context, &answer);
        advance(stage, ResolutionStage::Assessed, session_id);
        draft.answer = Some(answer);

        let verdict = self.policy.decide(
            false,
            draft.confidence,
            draft.context_empty,
            draft.category,
        );
        (draft, verdict)
    }

    /// Run one external call under its stage timeout, folding both the
    /// collaborator error and the timeout into a failure annotation.
    async fn call_with_timeout<T>(
        &self,
        secs: u64,
        call: impl std::future::Future<Output = DomainResult<T>>,
        failure_stage: FailureStage,
    ) -> Result<T, FailureAnnotation> {
        match tokio::time::timeout(Duration::from_secs(secs), call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(FailureAnnotation::new(failure_stage, err.to_string())),
            Err(_) => Err(FailureAnnotation::new(
                failure_stage,
                format!("timed out after {secs}s"),
            )),
        }
    }

    /// Append the record to the analytics sink with bounded backoff.
    ///
    /// Runs on a spawned task: a caller that disconnects mid-pipeline
    /// cannot abandon an in-flight durable write.
    async fn log_record(&self, record: &ResolutionRecord) -> SinkStatus {
        let sink = Arc::clone(&self.sink);
        let record = record.clone();
        let retry = RetryPolicy::from(&self.sink_retry);

        let write = tokio::spawn(async move {
            retry.execute(|| sink.append(&record)).await
        });

        match write.await {
            Ok(Ok(())) => SinkStatus::Logged,
            Ok(Err(err)) => {
                warn!(error = %err, "analytics append failed after retries");
                SinkStatus::Failed(err.to_string())
            }
            Err(join_err) => {
                warn!(error = %join_err, "analytics append task aborted");
                SinkStatus::Failed(join_err.to_string())
            }
        }
    }
}

/// Verdict synthesized when a stage fails: always a complex escalation.
fn synthesized_verdict() -> EscalationVerdict {
    EscalationVerdict::escalated(EscalationReason::Complex)
}

/// Move the stage machine forward, logging the transition.
fn advance(stage: &mut ResolutionStage, next: ResolutionStage, session_id: Uuid) {
    debug_assert!(
        stage.can_transition_to(next),
        "invalid transition {} -> {}",
        stage.as_str(),
        next.as_str()
    );
    debug!(session_id = %session_id, from = stage.as_str(), to = next.as_str(), "stage");
    *stage = next;
}
