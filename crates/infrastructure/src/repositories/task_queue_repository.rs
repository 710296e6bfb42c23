use async_trait::async_trait;
use dnstester_application::ports::{Delivery, MetricsRecorder, NoopMetricsRecorder, TaskQueue};
use dnstester_domain::{DomainError, TaskRecord, TaskStatus};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

type TaskRow = (String, String, i64, Option<String>, String, String);
type DeliveryRow = (String, String, i64);

const NOW_EPOCH: &str = "CAST(strftime('%s', 'now') AS INTEGER)";

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| {
        error!(error = %e, "{}", context);
        DomainError::DatabaseError(e.to_string())
    }
}

/// Active row owned by this delivery.
const CURRENT_DELIVERY: &str = "id = ? AND status = 'active' AND attempts = ?";

/// SQLite-backed at-least-once task queue.
///
/// A claim sets a lease; an active task whose lease ran out is claimable
/// again until it has been delivered `max_deliveries` times. Updates made on
/// behalf of a delivery are fenced on its attempt number.
pub struct SqliteTaskQueue {
    pool: SqlitePool,
    lease_secs: i64,
    max_deliveries: u32,
    metrics: Arc<dyn MetricsRecorder>,
}

impl SqliteTaskQueue {
    pub fn new(pool: SqlitePool, lease: Duration, max_deliveries: u32) -> Self {
        Self {
            pool,
            lease_secs: i64::try_from(lease.as_secs()).unwrap_or(i64::MAX),
            max_deliveries: max_deliveries.max(1),
            metrics: Arc::new(NoopMetricsRecorder),
        }
    }

    /// Counts tasks the queue itself gives up on.
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Fails active tasks whose lease expired on their last allowed delivery.
    async fn expire_exhausted(&self) -> Result<(), DomainError> {
        let sql = format!(
            "UPDATE tasks
             SET status = 'failed',
                 error = COALESCE(error, 'delivery limit reached'),
                 lease_expires_at = NULL,
                 updated_at = datetime('now')
             WHERE status = 'active'
               AND lease_expires_at <= {now}
               AND attempts >= ?
             RETURNING id",
            now = NOW_EPOCH
        );

        let expired: Vec<(String,)> = sqlx::query_as(&sql)
            .bind(self.max_deliveries as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to expire exhausted tasks"))?;

        for (task_id,) in &expired {
            warn!(task_id = %task_id, "Task failed after exhausting deliveries");
            self.metrics.record_task(TaskStatus::Failed);
        }
        Ok(())
    }

    /// Explains why an update fenced on `delivery` matched no row.
    async fn fence_error(&self, delivery: &Delivery) -> DomainError {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT 1 FROM tasks WHERE id = ?")
            .bind(&delivery.task_id)
            .fetch_optional(&self.pool)
            .await;

        match exists {
            Ok(Some(_)) => {
                warn!(
                    task_id = %delivery.task_id,
                    attempt = delivery.attempt,
                    "Delivery no longer owns the task"
                );
                DomainError::LeaseLost(format!(
                    "task {} delivery {}",
                    delivery.task_id, delivery.attempt
                ))
            }
            Ok(None) => DomainError::NotFound(format!("task {}", delivery.task_id)),
            Err(e) => db_error("Failed to look up task")(e),
        }
    }

    async fn set_terminal(
        &self,
        delivery: &Delivery,
        status: TaskStatus,
        error: Option<&str>,
    ) -> Result<(), DomainError> {
        let sql = format!(
            "UPDATE tasks
             SET status = ?, error = ?, lease_expires_at = NULL, updated_at = datetime('now')
             WHERE {}",
            CURRENT_DELIVERY
        );

        let result = sqlx::query(&sql)
            .bind(status.as_str())
            .bind(error)
            .bind(&delivery.task_id)
            .bind(delivery.attempt as i64)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update task status"))?;

        if result.rows_affected() == 0 {
            return Err(self.fence_error(delivery).await);
        }
        Ok(())
    }
}

#[async_trait]
impl TaskQueue for SqliteTaskQueue {
    #[instrument(skip(self, payload))]
    async fn enqueue(&self, task_id: &str, payload: &str) -> Result<(), DomainError> {
        sqlx::query("INSERT INTO tasks (id, payload) VALUES (?, ?)")
            .bind(task_id)
            .bind(payload)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to enqueue task");
                DomainError::QueueError(e.to_string())
            })?;

        debug!("Task enqueued");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn dequeue(&self) -> Result<Option<Delivery>, DomainError> {
        self.expire_exhausted().await?;

        // Single statement: two workers can never claim the same row.
        let sql = format!(
            "UPDATE tasks
             SET status = 'active',
                 attempts = attempts + 1,
                 lease_expires_at = {now} + ?,
                 updated_at = datetime('now')
             WHERE id = (
                 SELECT id FROM tasks
                 WHERE status = 'pending'
                    OR (status = 'active' AND lease_expires_at <= {now})
                 ORDER BY rowid
                 LIMIT 1
             )
             RETURNING id, payload, attempts",
            now = NOW_EPOCH
        );

        let row = sqlx::query_as::<_, DeliveryRow>(&sql)
            .bind(self.lease_secs)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to claim task"))?;

        Ok(row.map(|(task_id, payload, attempts)| {
            debug!(task_id = %task_id, attempt = attempts, "Task claimed");
            Delivery {
                task_id,
                payload,
                attempt: attempts as u32,
            }
        }))
    }

    #[instrument(skip(self, delivery), fields(task_id = %delivery.task_id, attempt = delivery.attempt))]
    async fn complete(&self, delivery: &Delivery) -> Result<(), DomainError> {
        self.set_terminal(delivery, TaskStatus::Completed, None).await
    }

    #[instrument(skip(self, delivery), fields(task_id = %delivery.task_id, attempt = delivery.attempt))]
    async fn fail(&self, delivery: &Delivery, reason: &str) -> Result<(), DomainError> {
        self.set_terminal(delivery, TaskStatus::Failed, Some(reason))
            .await
    }

    #[instrument(skip(self, delivery), fields(task_id = %delivery.task_id, attempt = delivery.attempt))]
    async fn release(
        &self,
        delivery: &Delivery,
        reason: &str,
    ) -> Result<TaskStatus, DomainError> {
        let sql = format!(
            "UPDATE tasks
             SET status = CASE WHEN attempts >= ? THEN 'failed' ELSE 'pending' END,
                 error = ?,
                 lease_expires_at = NULL,
                 updated_at = datetime('now')
             WHERE {}
             RETURNING status",
            CURRENT_DELIVERY
        );

        let status: Option<(String,)> = sqlx::query_as(&sql)
            .bind(self.max_deliveries as i64)
            .bind(reason)
            .bind(&delivery.task_id)
            .bind(delivery.attempt as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to release task"))?;

        match status {
            Some((status,)) => TaskStatus::from_str(&status),
            None => Err(self.fence_error(delivery).await),
        }
    }

    #[instrument(skip(self, delivery), fields(task_id = %delivery.task_id, attempt = delivery.attempt))]
    async fn renew(&self, delivery: &Delivery) -> Result<(), DomainError> {
        let sql = format!(
            "UPDATE tasks
             SET lease_expires_at = {now} + ?, updated_at = datetime('now')
             WHERE {fence}",
            now = NOW_EPOCH,
            fence = CURRENT_DELIVERY
        );

        let result = sqlx::query(&sql)
            .bind(self.lease_secs)
            .bind(&delivery.task_id)
            .bind(delivery.attempt as i64)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to renew lease"))?;

        if result.rows_affected() == 0 {
            return Err(self.fence_error(delivery).await);
        }
        debug!("Lease renewed");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, task_id: &str) -> Result<Option<TaskRecord>, DomainError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "SELECT id, status, attempts, error, created_at, updated_at
             FROM tasks WHERE id = ?",
        )
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to fetch task"))?;

        row.map(|(task_id, status, attempts, error, created_at, updated_at)| {
            Ok(TaskRecord {
                task_id,
                status: TaskStatus::from_str(&status)?,
                attempts: attempts as u32,
                error,
                created_at,
                updated_at,
                result: None,
            })
        })
        .transpose()
    }

    #[instrument(skip(self))]
    async fn purge_finished(&self, older_than: Duration) -> Result<Vec<String>, DomainError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "DELETE FROM tasks
             WHERE status IN ('completed', 'failed')
               AND updated_at < datetime('now', ?)
             RETURNING id",
        )
        .bind(format!("-{} seconds", older_than.as_secs()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to purge finished tasks"))?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
