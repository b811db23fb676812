//! Common test utilities for integration tests.
//!
//! Provides shared fixtures and builders used across multiple
//! integration test files.

use std::sync::Arc;

use hrdesk::adapters::mock::{MemorySink, MockClassifier, MockResponder, MockRetriever};
use hrdesk::domain::models::{
    Category, Classification, Config, GeneratedAnswer, Query, RetrievedContext,
    RetrievedFragment, Role,
};
use hrdesk::services::ResolutionPipeline;

/// Configuration with near-instant sink backoff so retry tests stay fast.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.sink_retry.initial_backoff_ms = 1;
    config.sink_retry.max_backoff_ms = 5;
    config
}

/// Default employee query used by most scenarios.
pub fn sick_leave_query() -> Query {
    Query::new("How many sick leaves do I get?", "EMP123")
        .with_department("Engineering")
        .with_role(Role::Employee)
}

/// A classification for a routine, non-sensitive leave question.
pub fn leave_classification() -> Classification {
    Classification::new(Category::LeavePolicy, "sick leave entitlement", false)
}

/// One well-matching policy fragment.
pub fn strong_context() -> RetrievedContext {
    RetrievedContext::new(vec![RetrievedFragment::new(
        "Full-time employees are entitled to 12 paid sick days per calendar year.",
        "leave_policy.md",
        0.9,
    )])
}

/// An answer with a healthy self-reported quality signal.
pub fn good_answer() -> GeneratedAnswer {
    GeneratedAnswer::new("You are entitled to 12 paid sick days per year.").with_quality(0.8)
}

/// Bundle of mocks wired into a pipeline, with handles kept for
/// call-count assertions.
pub struct TestHarness {
    pub classifier: Arc<MockClassifier>,
    pub retriever: Arc<MockRetriever>,
    pub responder: Arc<MockResponder>,
    pub sink: Arc<MemorySink>,
    pub pipeline: ResolutionPipeline,
}

pub fn harness(
    classifier: MockClassifier,
    retriever: MockRetriever,
    responder: MockResponder,
    sink: MemorySink,
) -> TestHarness {
    let classifier = Arc::new(classifier);
    let retriever = Arc::new(retriever);
    let responder = Arc::new(responder);
    let sink = Arc::new(sink);

    let pipeline = ResolutionPipeline::new(
        classifier.clone(),
        retriever.clone(),
        responder.clone(),
        sink.clone(),
        &test_config(),
    );

    TestHarness {
        classifier,
        retriever,
        responder,
        sink,
        pipeline,
    }
}

/// Harness for the happy path: routine question, strong context,
/// good answer, healthy sink.
pub fn happy_harness() -> TestHarness {
    harness(
        MockClassifier::returning(leave_classification()),
        MockRetriever::returning(strong_context()),
        MockResponder::returning(good_answer()),
        MemorySink::new(),
    )
}
