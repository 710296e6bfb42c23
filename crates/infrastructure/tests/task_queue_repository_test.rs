use dnstester_application::ports::{Delivery, ResultStore, TaskQueue};
use dnstester_domain::{
    DomainError, OutcomeKind, QueryResult, Rcode, ResolutionReport, Scheme, TaskStatus,
};
use dnstester_infrastructure::metrics::PrometheusMetricsRecorder;
use dnstester_infrastructure::repositories::{SqliteResultStore, SqliteTaskQueue};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

mod helpers;
use helpers::temp_pool;

const LEASE: Duration = Duration::from_secs(300);

fn queue(pool: &SqlitePool, max_deliveries: u32) -> SqliteTaskQueue {
    SqliteTaskQueue::new(pool.clone(), LEASE, max_deliveries)
}

fn report(rcode: Rcode) -> ResolutionReport {
    ResolutionReport {
        results: vec![QueryResult {
            server: "udp://1.1.1.1".parse().unwrap(),
            protocol: Scheme::Udp,
            rcode: Some(rcode),
            latency_seconds: 0.012,
            error: None,
            outcome: OutcomeKind::Success,
            attempts: 1,
        }],
        duration_seconds: 0.015,
    }
}

/// Moves `updated_at` into the past so retention picks the row up.
async fn age_task(pool: &SqlitePool, task_id: &str) {
    sqlx::query("UPDATE tasks SET updated_at = datetime('now', '-2 days') WHERE id = ?")
        .bind(task_id)
        .execute(pool)
        .await
        .unwrap();
}

// ============================================================================
// Queue lifecycle
// ============================================================================

#[tokio::test]
async fn test_enqueue_then_dequeue_marks_active() {
    // Arrange
    let (_dir, pool) = temp_pool().await;
    let queue = queue(&pool, 3);
    queue.enqueue("t-1", "{\"a\":1}").await.unwrap();

    // Act
    let delivery = queue.dequeue().await.unwrap().unwrap();

    // Assert
    assert_eq!(delivery.task_id, "t-1");
    assert_eq!(delivery.payload, "{\"a\":1}");
    assert_eq!(delivery.attempt, 1);
    let record = queue.get("t-1").await.unwrap().unwrap();
    assert_eq!(record.status, TaskStatus::Active);
    assert_eq!(record.attempts, 1);
    assert!(record.result.is_none());
}

#[tokio::test]
async fn test_dequeue_empty_queue_returns_none() {
    let (_dir, pool) = temp_pool().await;

    assert!(queue(&pool, 3).dequeue().await.unwrap().is_none());
}

#[tokio::test]
async fn test_dequeue_is_fifo_and_never_double_claims() {
    let (_dir, pool) = temp_pool().await;
    let queue = queue(&pool, 3);
    queue.enqueue("first", "{}").await.unwrap();
    queue.enqueue("second", "{}").await.unwrap();

    let a = queue.dequeue().await.unwrap().unwrap();
    let b = queue.dequeue().await.unwrap().unwrap();
    let c = queue.dequeue().await.unwrap();

    assert_eq!(a.task_id, "first");
    assert_eq!(b.task_id, "second");
    assert!(c.is_none(), "active tasks with a live lease are not claimable");
}

#[tokio::test]
async fn test_duplicate_enqueue_is_rejected() {
    let (_dir, pool) = temp_pool().await;
    let queue = queue(&pool, 3);
    queue.enqueue("dup", "{}").await.unwrap();

    let err = queue.enqueue("dup", "{}").await.unwrap_err();

    assert!(matches!(err, DomainError::QueueError(_)));
}

#[tokio::test]
async fn test_complete_and_fail_are_terminal() {
    let (_dir, pool) = temp_pool().await;
    let queue = queue(&pool, 3);
    queue.enqueue("ok", "{}").await.unwrap();
    queue.enqueue("bad", "{}").await.unwrap();
    let ok = queue.dequeue().await.unwrap().unwrap();
    let bad = queue.dequeue().await.unwrap().unwrap();

    queue.complete(&ok).await.unwrap();
    queue.fail(&bad, "invalid payload").await.unwrap();

    let ok = queue.get("ok").await.unwrap().unwrap();
    let bad = queue.get("bad").await.unwrap().unwrap();
    assert_eq!(ok.status, TaskStatus::Completed);
    assert_eq!(bad.status, TaskStatus::Failed);
    assert_eq!(bad.error.as_deref(), Some("invalid payload"));
    assert!(queue.dequeue().await.unwrap().is_none());
}

#[tokio::test]
async fn test_complete_unknown_task_is_not_found() {
    let (_dir, pool) = temp_pool().await;

    let ghost = Delivery {
        task_id: "ghost".to_string(),
        payload: String::new(),
        attempt: 1,
    };

    let err = queue(&pool, 3).complete(&ghost).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_get_unknown_task_is_none() {
    let (_dir, pool) = temp_pool().await;

    assert!(queue(&pool, 3).get("ghost").await.unwrap().is_none());
}

// ============================================================================
// Redelivery
// ============================================================================

#[tokio::test]
async fn test_release_requeues_until_deliveries_exhausted() {
    // Arrange
    let (_dir, pool) = temp_pool().await;
    let queue = queue(&pool, 2);
    queue.enqueue("flaky", "{}").await.unwrap();

    // Act: first delivery fails and goes back to pending
    let delivery = queue.dequeue().await.unwrap().unwrap();
    let first = queue.release(&delivery, "store down").await.unwrap();

    // Second delivery fails on the last allowed attempt
    let redelivery = queue.dequeue().await.unwrap().unwrap();
    let second = queue.release(&redelivery, "store down").await.unwrap();

    // Assert
    assert_eq!(first, TaskStatus::Pending);
    assert_eq!(redelivery.attempt, 2);
    assert_eq!(second, TaskStatus::Failed);
    let record = queue.get("flaky").await.unwrap().unwrap();
    assert_eq!(record.status, TaskStatus::Failed);
    assert_eq!(record.error.as_deref(), Some("store down"));
    assert!(queue.dequeue().await.unwrap().is_none());
}

#[tokio::test]
async fn test_expired_lease_is_redelivered() {
    // Arrange: zero lease so the claim expires immediately
    let (_dir, pool) = temp_pool().await;
    let queue = SqliteTaskQueue::new(pool.clone(), Duration::ZERO, 3);
    queue.enqueue("crashed", "{}").await.unwrap();
    queue.dequeue().await.unwrap().unwrap();

    // Act
    let redelivery = queue.dequeue().await.unwrap().unwrap();

    // Assert
    assert_eq!(redelivery.task_id, "crashed");
    assert_eq!(redelivery.attempt, 2);
}

#[tokio::test]
async fn test_expired_lease_on_last_delivery_fails_task() {
    let (_dir, pool) = temp_pool().await;
    let queue = SqliteTaskQueue::new(pool.clone(), Duration::ZERO, 1);
    queue.enqueue("crashed", "{}").await.unwrap();
    queue.dequeue().await.unwrap().unwrap();

    let next = queue.dequeue().await.unwrap();

    assert!(next.is_none());
    let record = queue.get("crashed").await.unwrap().unwrap();
    assert_eq!(record.status, TaskStatus::Failed);
}

#[tokio::test]
async fn test_expired_last_delivery_counts_failed_task() {
    // Arrange
    let (_dir, pool) = temp_pool().await;
    let metrics = Arc::new(PrometheusMetricsRecorder::new().unwrap());
    let queue =
        SqliteTaskQueue::new(pool.clone(), Duration::ZERO, 1).with_metrics(metrics.clone());
    queue.enqueue("crashed", "{}").await.unwrap();
    queue.dequeue().await.unwrap().unwrap();

    // Act
    queue.dequeue().await.unwrap();
    queue.dequeue().await.unwrap();

    // Assert: counted once, not on every dequeue
    assert_eq!(metrics.task_count(TaskStatus::Failed), 1);
}

// ============================================================================
// Delivery fencing
// ============================================================================

#[tokio::test]
async fn test_stale_delivery_cannot_touch_redelivered_task() {
    // Arrange: worker A's lease runs out and worker B claims the task
    let (_dir, pool) = temp_pool().await;
    let queue = SqliteTaskQueue::new(pool.clone(), Duration::ZERO, 5);
    queue.enqueue("shared", "{}").await.unwrap();
    let a = queue.dequeue().await.unwrap().unwrap();
    let b = queue.dequeue().await.unwrap().unwrap();
    assert_eq!(b.attempt, 2);

    // Act
    let released = queue.release(&a, "store down").await;
    let completed = queue.complete(&a).await;
    let failed = queue.fail(&a, "invalid payload").await;
    let renewed = queue.renew(&a).await;

    // Assert: B still owns the row and nothing was requeued
    assert!(matches!(released, Err(DomainError::LeaseLost(_))));
    assert!(matches!(completed, Err(DomainError::LeaseLost(_))));
    assert!(matches!(failed, Err(DomainError::LeaseLost(_))));
    assert!(matches!(renewed, Err(DomainError::LeaseLost(_))));
    let record = queue.get("shared").await.unwrap().unwrap();
    assert_eq!(record.status, TaskStatus::Active);
    assert_eq!(record.attempts, 2);
    assert!(record.error.is_none());

    queue.complete(&b).await.unwrap();
    let record = queue.get("shared").await.unwrap().unwrap();
    assert_eq!(record.status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_finished_delivery_cannot_complete_twice() {
    let (_dir, pool) = temp_pool().await;
    let queue = queue(&pool, 3);
    queue.enqueue("once", "{}").await.unwrap();
    let delivery = queue.dequeue().await.unwrap().unwrap();
    queue.fail(&delivery, "invalid payload").await.unwrap();

    let err = queue.complete(&delivery).await.unwrap_err();

    assert!(matches!(err, DomainError::LeaseLost(_)));
    let record = queue.get("once").await.unwrap().unwrap();
    assert_eq!(record.status, TaskStatus::Failed);
}

#[tokio::test]
async fn test_renew_keeps_task_from_redelivery() {
    // Arrange
    let (_dir, pool) = temp_pool().await;
    let queue = queue(&pool, 3);
    queue.enqueue("long", "{}").await.unwrap();
    let delivery = queue.dequeue().await.unwrap().unwrap();
    sqlx::query("UPDATE tasks SET lease_expires_at = 0 WHERE id = ?")
        .bind("long")
        .execute(&pool)
        .await
        .unwrap();

    // Act
    queue.renew(&delivery).await.unwrap();

    // Assert
    assert!(queue.dequeue().await.unwrap().is_none());
    queue.complete(&delivery).await.unwrap();
}

#[tokio::test]
async fn test_renew_unknown_task_is_not_found() {
    let (_dir, pool) = temp_pool().await;
    let ghost = Delivery {
        task_id: "ghost".to_string(),
        payload: String::new(),
        attempt: 1,
    };

    let err = queue(&pool, 3).renew(&ghost).await.unwrap_err();

    assert!(matches!(err, DomainError::NotFound(_)));
}

// ============================================================================
// Retention
// ============================================================================

#[tokio::test]
async fn test_purge_removes_only_old_finished_tasks() {
    // Arrange
    let (_dir, pool) = temp_pool().await;
    let queue = queue(&pool, 3);
    for id in ["old-done", "new-done", "old-pending"] {
        queue.enqueue(id, "{}").await.unwrap();
    }
    let old_done = queue.dequeue().await.unwrap().unwrap();
    let new_done = queue.dequeue().await.unwrap().unwrap();
    queue.complete(&old_done).await.unwrap();
    queue.complete(&new_done).await.unwrap();
    age_task(&pool, "old-done").await;
    age_task(&pool, "old-pending").await;

    // Act
    let purged = queue.purge_finished(Duration::from_secs(86_400)).await.unwrap();

    // Assert
    assert_eq!(purged, vec!["old-done".to_string()]);
    assert!(queue.get("old-done").await.unwrap().is_none());
    assert!(queue.get("new-done").await.unwrap().is_some());
    assert!(queue.get("old-pending").await.unwrap().is_some());
}

// ============================================================================
// Result store
// ============================================================================

#[tokio::test]
async fn test_result_put_is_idempotent() {
    // Arrange
    let (_dir, pool) = temp_pool().await;
    let store = SqliteResultStore::new(pool.clone());
    let report = report(Rcode::NoError);

    // Act
    store.put("t-1", &report).await.unwrap();
    store.put("t-1", &report).await.unwrap();

    // Assert
    let stored = store.get("t-1").await.unwrap().unwrap();
    assert_eq!(stored.results.len(), 1);
    assert_eq!(stored.results[0].server, report.results[0].server);
    assert_eq!(stored.results[0].rcode, Some(Rcode::NoError));
    let (rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM task_results")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn test_result_put_overwrites_previous_value() {
    let (_dir, pool) = temp_pool().await;
    let store = SqliteResultStore::new(pool);

    store.put("t-1", &report(Rcode::ServFail)).await.unwrap();
    store.put("t-1", &report(Rcode::NoError)).await.unwrap();

    let stored = store.get("t-1").await.unwrap().unwrap();
    assert_eq!(stored.results[0].rcode, Some(Rcode::NoError));
}

#[tokio::test]
async fn test_result_get_missing_is_none() {
    let (_dir, pool) = temp_pool().await;

    assert!(SqliteResultStore::new(pool).get("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn test_result_delete_counts_existing_rows() {
    let (_dir, pool) = temp_pool().await;
    let store = SqliteResultStore::new(pool);
    store.put("a", &report(Rcode::NoError)).await.unwrap();
    store.put("b", &report(Rcode::NoError)).await.unwrap();

    let deleted = store
        .delete(&["a".to_string(), "missing".to_string()])
        .await
        .unwrap();

    assert_eq!(deleted, 1);
    assert!(store.get("a").await.unwrap().is_none());
    assert!(store.get("b").await.unwrap().is_some());
    assert_eq!(store.delete(&[]).await.unwrap(), 0);
}
