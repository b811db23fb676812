//! Schema migrations for the analytics database.

use sqlx::SqlitePool;

use crate::domain::errors::DomainResult;

/// Create the analytics schema if it does not exist.
///
/// The table is append-only: records are inserted once and never
/// updated or deleted by the service.
pub async fn run(pool: &SqlitePool) -> DomainResult<()> {
    sqlx::query(
        r"CREATE TABLE IF NOT EXISTS resolution_records (
            id TEXT PRIMARY KEY,
            employee_id TEXT NOT NULL,
            department TEXT NOT NULL,
            role TEXT NOT NULL,
            query_text TEXT NOT NULL,
            submitted_at TEXT NOT NULL,
            category TEXT NOT NULL,
            intent TEXT NOT NULL,
            response_text TEXT,
            confidence REAL NOT NULL,
            escalated INTEGER NOT NULL,
            escalation_reason TEXT NOT NULL,
            sources TEXT NOT NULL,
            response_time_ms INTEGER NOT NULL,
            failure_stage TEXT,
            failure_message TEXT,
            created_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_resolution_records_category
         ON resolution_records(category)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_resolution_records_employee
         ON resolution_records(employee_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}
