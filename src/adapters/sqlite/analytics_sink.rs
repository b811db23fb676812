//! SQLite implementation of the analytics sink.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::domain::errors::{DomainResult, PipelineError};
use crate::domain::models::{
    Category, EscalationReason, EscalationVerdict, FailureAnnotation, FailureStage, Query,
    ResolutionRecord, Role,
};
use crate::domain::ports::AnalyticsSink;

/// Append-only resolution record store.
#[derive(Clone)]
pub struct SqliteAnalyticsSink {
    pool: SqlitePool,
}

impl SqliteAnalyticsSink {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch one record by session id.
    pub async fn fetch(&self, id: Uuid) -> DomainResult<Option<ResolutionRecord>> {
        let row: Option<RecordRow> =
            sqlx::query_as("SELECT * FROM resolution_records WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Aggregate the stored records for the analytics view.
    pub async fn summary(&self) -> DomainResult<AnalyticsSummary> {
        let (total, escalated): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(escalated), 0) FROM resolution_records",
        )
        .fetch_one(&self.pool)
        .await?;

        let avg_confidence: (Option<f64>,) =
            sqlx::query_as("SELECT AVG(confidence) FROM resolution_records")
                .fetch_one(&self.pool)
                .await?;

        let category_distribution: Vec<(String, i64)> = sqlx::query_as(
            "SELECT category, COUNT(*) FROM resolution_records
             GROUP BY category ORDER BY COUNT(*) DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        let avg_response_time_ms: (Option<f64>,) =
            sqlx::query_as("SELECT AVG(response_time_ms) FROM resolution_records")
                .fetch_one(&self.pool)
                .await?;

        #[allow(clippy::cast_precision_loss)]
        let escalation_rate = if total == 0 {
            0.0
        } else {
            escalated as f64 / total as f64
        };

        Ok(AnalyticsSummary {
            total_queries: total,
            escalated_queries: escalated,
            escalation_rate,
            avg_confidence: avg_confidence.0.unwrap_or(0.0),
            avg_response_time_ms: avg_response_time_ms.0.unwrap_or(0.0),
            category_distribution,
        })
    }
}

#[async_trait]
impl AnalyticsSink for SqliteAnalyticsSink {
    async fn append(&self, record: &ResolutionRecord) -> DomainResult<()> {
        let sources_json = serde_json::to_string(&record.sources)
            .map_err(|e| PipelineError::SinkWriteFailure(e.to_string()))?;

        sqlx::query(
            r"INSERT INTO resolution_records (
                id, employee_id, department, role, query_text, submitted_at,
                category, intent, response_text, confidence, escalated,
                escalation_reason, sources, response_time_ms,
                failure_stage, failure_message, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id.to_string())
        .bind(&record.query.employee_id)
        .bind(&record.query.department)
        .bind(record.query.role.as_str())
        .bind(&record.query.text)
        .bind(record.query.submitted_at.to_rfc3339())
        .bind(record.category.as_str())
        .bind(&record.intent)
        .bind(&record.response_text)
        .bind(record.confidence)
        .bind(i32::from(record.verdict.escalated))
        .bind(record.verdict.reason.as_str())
        .bind(&sources_json)
        .bind(i64::try_from(record.response_time_ms).unwrap_or(i64::MAX))
        .bind(record.failure.as_ref().map(|f| f.stage.as_str()))
        .bind(record.failure.as_ref().map(|f| f.message.clone()))
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// Aggregated view over the stored records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_queries: i64,
    pub escalated_queries: i64,
    pub escalation_rate: f64,
    pub avg_confidence: f64,
    pub avg_response_time_ms: f64,
    pub category_distribution: Vec<(String, i64)>,
}

#[derive(Debug, FromRow)]
struct RecordRow {
    id: String,
    employee_id: String,
    department: String,
    role: String,
    query_text: String,
    submitted_at: String,
    category: String,
    intent: String,
    response_text: Option<String>,
    confidence: f64,
    escalated: i64,
    escalation_reason: String,
    sources: String,
    response_time_ms: i64,
    failure_stage: Option<String>,
    failure_message: Option<String>,
    created_at: String,
}

impl TryFrom<RecordRow> for ResolutionRecord {
    type Error = PipelineError;

    fn try_from(row: RecordRow) -> Result<Self, Self::Error> {
        let parse =
            |what: &str, msg: String| PipelineError::SinkWriteFailure(format!("{what}: {msg}"));

        let id = Uuid::parse_str(&row.id).map_err(|e| parse("id", e.to_string()))?;
        let role = Role::from_str(&row.role)
            .ok_or_else(|| parse("role", row.role.clone()))?;
        let category = Category::from_str(&row.category)
            .ok_or_else(|| parse("category", row.category.clone()))?;
        let reason = EscalationReason::from_str(&row.escalation_reason)
            .ok_or_else(|| parse("escalation_reason", row.escalation_reason.clone()))?;
        let sources: Vec<String> = serde_json::from_str(&row.sources)
            .map_err(|e| parse("sources", e.to_string()))?;

        let submitted_at = DateTime::parse_from_rfc3339(&row.submitted_at)
            .map_err(|e| parse("submitted_at", e.to_string()))?
            .with_timezone(&Utc);
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| parse("created_at", e.to_string()))?
            .with_timezone(&Utc);

        let failure = match (row.failure_stage, row.failure_message) {
            (Some(stage), Some(message)) => {
                let stage = match stage.as_str() {
                    "classification" => FailureStage::Classification,
                    "retrieval" => FailureStage::Retrieval,
                    "generation" => FailureStage::Generation,
                    other => return Err(parse("failure_stage", other.to_string())),
                };
                Some(FailureAnnotation::new(stage, message))
            }
            _ => None,
        };

        Ok(ResolutionRecord {
            id,
            query: Query {
                text: row.query_text,
                employee_id: row.employee_id,
                department: row.department,
                role,
                submitted_at,
            },
            category,
            intent: row.intent,
            response_text: row.response_text,
            confidence: row.confidence,
            verdict: EscalationVerdict {
                escalated: row.escalated != 0,
                reason,
            },
            sources,
            response_time_ms: u64::try_from(row.response_time_ms).unwrap_or(0),
            failure,
            created_at,
        })
    }
}
