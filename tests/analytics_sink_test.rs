//! Integration tests for the SQLite analytics sink.

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use uuid::Uuid;

use hrdesk::adapters::sqlite::{migrations, SqliteAnalyticsSink};
use hrdesk::domain::models::{
    Category, EscalationReason, EscalationVerdict, FailureAnnotation, FailureStage, Query,
    ResolutionRecord, Role,
};
use hrdesk::domain::ports::AnalyticsSink;

async fn setup_sink() -> SqliteAnalyticsSink {
    let pool: SqlitePool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite should open");
    migrations::run(&pool).await.expect("migrations should run");
    SqliteAnalyticsSink::new(pool)
}

fn sample_record(category: Category, escalated: bool) -> ResolutionRecord {
    let verdict = if escalated {
        EscalationVerdict::escalated(EscalationReason::PolicyGap)
    } else {
        EscalationVerdict::answered()
    };

    ResolutionRecord {
        id: Uuid::new_v4(),
        query: Query::new("How many sick leaves do I get?", "EMP123")
            .with_department("Engineering")
            .with_role(Role::Employee),
        category,
        intent: "sick leave entitlement".to_string(),
        response_text: Some("You are entitled to 12 paid sick days per year.".to_string()),
        confidence: if escalated { 0.2 } else { 0.86 },
        verdict,
        sources: vec!["leave_policy.md".to_string()],
        response_time_ms: 1_234,
        failure: None,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_append_and_fetch_round_trip() {
    let sink = setup_sink().await;
    let record = sample_record(Category::LeavePolicy, false);

    sink.append(&record).await.unwrap();
    let fetched = sink.fetch(record.id).await.unwrap().expect("record exists");

    assert_eq!(fetched.id, record.id);
    assert_eq!(fetched.query.employee_id, "EMP123");
    assert_eq!(fetched.query.role, Role::Employee);
    assert_eq!(fetched.category, Category::LeavePolicy);
    assert_eq!(fetched.verdict, record.verdict);
    assert_eq!(fetched.sources, record.sources);
    assert_eq!(fetched.response_time_ms, 1_234);
    assert!(fetched.failure.is_none());
}

#[tokio::test]
async fn test_failure_annotation_round_trip() {
    let sink = setup_sink().await;
    let mut record = sample_record(Category::Unknown, true);
    record.verdict = EscalationVerdict::escalated(EscalationReason::Complex);
    record.response_text = None;
    record.failure = Some(FailureAnnotation::new(
        FailureStage::Retrieval,
        "search returned 502",
    ));

    sink.append(&record).await.unwrap();
    let fetched = sink.fetch(record.id).await.unwrap().expect("record exists");

    assert!(fetched.response_text.is_none());
    let failure = fetched.failure.expect("annotation persisted");
    assert_eq!(failure.stage, FailureStage::Retrieval);
    assert_eq!(failure.message, "search returned 502");
}

#[tokio::test]
async fn test_fetch_missing_record() {
    let sink = setup_sink().await;
    assert!(sink.fetch(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_summary_aggregates() {
    let sink = setup_sink().await;

    for _ in 0..3 {
        sink.append(&sample_record(Category::LeavePolicy, false))
            .await
            .unwrap();
    }
    sink.append(&sample_record(Category::Benefits, true))
        .await
        .unwrap();

    let summary = sink.summary().await.unwrap();

    assert_eq!(summary.total_queries, 4);
    assert_eq!(summary.escalated_queries, 1);
    assert!((summary.escalation_rate - 0.25).abs() < f64::EPSILON);
    assert!(summary.avg_confidence > 0.0);

    // Categories ordered by count, descending.
    assert_eq!(summary.category_distribution[0].0, "leave_policy");
    assert_eq!(summary.category_distribution[0].1, 3);
    assert_eq!(summary.category_distribution[1].0, "benefits");
}

#[tokio::test]
async fn test_concurrent_appends() {
    let sink = setup_sink().await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let sink = sink.clone();
        handles.push(tokio::spawn(async move {
            sink.append(&sample_record(Category::Payroll, false)).await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let summary = sink.summary().await.unwrap();
    assert_eq!(summary.total_queries, 8);
}
