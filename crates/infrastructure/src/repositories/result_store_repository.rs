use async_trait::async_trait;
use dnstester_application::ports::ResultStore;
use dnstester_domain::{DomainError, ResolutionReport};
use sqlx::SqlitePool;
use tracing::{debug, error, instrument};

/// Task results as JSON documents keyed by task id.
pub struct SqliteResultStore {
    pool: SqlitePool,
}

impl SqliteResultStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResultStore for SqliteResultStore {
    #[instrument(skip(self, report), fields(results = report.results.len()))]
    async fn put(&self, task_id: &str, report: &ResolutionReport) -> Result<(), DomainError> {
        let json = serde_json::to_string(report)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;

        sqlx::query(
            "INSERT INTO task_results (task_id, result, updated_at)
             VALUES (?, ?, datetime('now'))
             ON CONFLICT(task_id) DO UPDATE SET
                 result = excluded.result,
                 updated_at = excluded.updated_at",
        )
        .bind(task_id)
        .bind(&json)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to store task result");
            DomainError::DatabaseError(e.to_string())
        })?;

        debug!("Task result stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, task_id: &str) -> Result<Option<ResolutionReport>, DomainError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT result FROM task_results WHERE task_id = ?")
                .bind(task_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to fetch task result");
                    DomainError::DatabaseError(e.to_string())
                })?;

        row.map(|(json,)| {
            serde_json::from_str(&json).map_err(|e| DomainError::SerializationError(e.to_string()))
        })
        .transpose()
    }

    #[instrument(skip(self, task_ids), fields(count = task_ids.len()))]
    async fn delete(&self, task_ids: &[String]) -> Result<u64, DomainError> {
        if task_ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; task_ids.len()].join(", ");
        let sql = format!(
            "DELETE FROM task_results WHERE task_id IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for id in task_ids {
            query = query.bind(id);
        }

        let result = query.execute(&self.pool).await.map_err(|e| {
            error!(error = %e, "Failed to delete task results");
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(result.rows_affected())
    }
}
