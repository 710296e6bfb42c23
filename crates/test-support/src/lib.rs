//! In-memory implementations of the queue and result store ports, shared by
//! the integration tests of the application, jobs and api crates.

use async_trait::async_trait;
use dnstester_application::ports::{Delivery, ResultStore, TaskQueue};
use dnstester_domain::{DomainError, ResolutionReport, TaskRecord, TaskStatus};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

// ============================================================================
// In-memory TaskQueue
// ============================================================================

#[derive(Debug, Clone)]
struct QueuedTask {
    seq: u64,
    payload: String,
    status: TaskStatus,
    attempts: u32,
    error: Option<String>,
    finished: bool,
}

pub struct InMemoryTaskQueue {
    tasks: Arc<RwLock<HashMap<String, QueuedTask>>>,
    next_seq: Arc<AtomicU64>,
    renewals: Arc<AtomicU64>,
    max_deliveries: u32,
}

impl Default for InMemoryTaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskQueue {
    pub fn new() -> Self {
        Self::with_max_deliveries(5)
    }

    pub fn with_max_deliveries(max_deliveries: u32) -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            next_seq: Arc::new(AtomicU64::new(0)),
            renewals: Arc::new(AtomicU64::new(0)),
            max_deliveries,
        }
    }

    pub async fn status(&self, task_id: &str) -> Option<TaskStatus> {
        self.tasks.read().await.get(task_id).map(|t| t.status)
    }

    pub async fn error(&self, task_id: &str) -> Option<String> {
        self.tasks
            .read()
            .await
            .get(task_id)
            .and_then(|t| t.error.clone())
    }

    pub async fn attempts(&self, task_id: &str) -> Option<u32> {
        self.tasks.read().await.get(task_id).map(|t| t.attempts)
    }

    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    pub fn renewals(&self) -> u64 {
        self.renewals.load(Ordering::Relaxed)
    }

    /// Marks every finished task as old enough to purge.
    pub async fn age_finished(&self) {
        for task in self.tasks.write().await.values_mut() {
            if task.status.is_terminal() {
                task.finished = true;
            }
        }
    }

    /// Hands an active task to another worker, as an expired lease would.
    pub async fn redeliver(&self, task_id: &str) -> Option<Delivery> {
        let mut tasks = self.tasks.write().await;
        let task = tasks.get_mut(task_id)?;
        task.status = TaskStatus::Active;
        task.attempts += 1;
        Some(Delivery {
            task_id: task_id.to_string(),
            payload: task.payload.clone(),
            attempt: task.attempts,
        })
    }
}

/// Looks up the task `delivery` still owns.
fn owned<'a>(
    tasks: &'a mut HashMap<String, QueuedTask>,
    delivery: &Delivery,
) -> Result<&'a mut QueuedTask, DomainError> {
    let task = tasks
        .get_mut(&delivery.task_id)
        .ok_or_else(|| DomainError::NotFound(delivery.task_id.clone()))?;
    if task.status != TaskStatus::Active || task.attempts != delivery.attempt {
        return Err(DomainError::LeaseLost(format!(
            "task {} delivery {}",
            delivery.task_id, delivery.attempt
        )));
    }
    Ok(task)
}

#[async_trait]
impl TaskQueue for InMemoryTaskQueue {
    async fn enqueue(&self, task_id: &str, payload: &str) -> Result<(), DomainError> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(task_id) {
            return Err(DomainError::QueueError(format!(
                "task {} already queued",
                task_id
            )));
        }
        tasks.insert(
            task_id.to_string(),
            QueuedTask {
                seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
                payload: payload.to_string(),
                status: TaskStatus::Pending,
                attempts: 0,
                error: None,
                finished: false,
            },
        );
        Ok(())
    }

    async fn dequeue(&self) -> Result<Option<Delivery>, DomainError> {
        let mut tasks = self.tasks.write().await;
        let next = tasks
            .iter_mut()
            .filter(|(_, t)| t.status == TaskStatus::Pending)
            .min_by_key(|(_, t)| t.seq);

        Ok(next.map(|(id, task)| {
            task.status = TaskStatus::Active;
            task.attempts += 1;
            Delivery {
                task_id: id.clone(),
                payload: task.payload.clone(),
                attempt: task.attempts,
            }
        }))
    }

    async fn complete(&self, delivery: &Delivery) -> Result<(), DomainError> {
        let mut tasks = self.tasks.write().await;
        let task = owned(&mut tasks, delivery)?;
        task.status = TaskStatus::Completed;
        task.error = None;
        Ok(())
    }

    async fn fail(&self, delivery: &Delivery, reason: &str) -> Result<(), DomainError> {
        let mut tasks = self.tasks.write().await;
        let task = owned(&mut tasks, delivery)?;
        task.status = TaskStatus::Failed;
        task.error = Some(reason.to_string());
        Ok(())
    }

    async fn release(
        &self,
        delivery: &Delivery,
        reason: &str,
    ) -> Result<TaskStatus, DomainError> {
        let mut tasks = self.tasks.write().await;
        let task = owned(&mut tasks, delivery)?;
        task.error = Some(reason.to_string());
        task.status = if task.attempts >= self.max_deliveries {
            TaskStatus::Failed
        } else {
            TaskStatus::Pending
        };
        Ok(task.status)
    }

    async fn renew(&self, delivery: &Delivery) -> Result<(), DomainError> {
        let mut tasks = self.tasks.write().await;
        owned(&mut tasks, delivery)?;
        self.renewals.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn get(&self, task_id: &str) -> Result<Option<TaskRecord>, DomainError> {
        Ok(self.tasks.read().await.get(task_id).map(|t| TaskRecord {
            task_id: task_id.to_string(),
            status: t.status,
            attempts: t.attempts,
            error: t.error.clone(),
            created_at: "2026-01-01 00:00:00".to_string(),
            updated_at: "2026-01-01 00:00:00".to_string(),
            result: None,
        }))
    }

    async fn purge_finished(&self, _older_than: Duration) -> Result<Vec<String>, DomainError> {
        let mut tasks = self.tasks.write().await;
        let purged: Vec<String> = tasks
            .iter()
            .filter(|(_, t)| t.finished)
            .map(|(id, _)| id.clone())
            .collect();
        for id in &purged {
            tasks.remove(id);
        }
        Ok(purged)
    }
}

// ============================================================================
// In-memory ResultStore
// ============================================================================

pub struct InMemoryResultStore {
    results: Arc<RwLock<HashMap<String, ResolutionReport>>>,
    put_count: Arc<AtomicU64>,
    should_fail: Arc<RwLock<bool>>,
}

impl Default for InMemoryResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(HashMap::new())),
            put_count: Arc::new(AtomicU64::new(0)),
            should_fail: Arc::new(RwLock::new(false)),
        }
    }

    pub async fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write().await = fail;
    }

    pub fn put_count(&self) -> u64 {
        self.put_count.load(Ordering::Relaxed)
    }

    pub async fn len(&self) -> usize {
        self.results.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.results.read().await.is_empty()
    }
}

#[async_trait]
impl ResultStore for InMemoryResultStore {
    async fn put(&self, task_id: &str, report: &ResolutionReport) -> Result<(), DomainError> {
        self.put_count.fetch_add(1, Ordering::Relaxed);
        if *self.should_fail.read().await {
            return Err(DomainError::DatabaseError("disk I/O error".to_string()));
        }
        self.results
            .write()
            .await
            .insert(task_id.to_string(), report.clone());
        Ok(())
    }

    async fn get(&self, task_id: &str) -> Result<Option<ResolutionReport>, DomainError> {
        Ok(self.results.read().await.get(task_id).cloned())
    }

    async fn delete(&self, task_ids: &[String]) -> Result<u64, DomainError> {
        let mut results = self.results.write().await;
        Ok(task_ids
            .iter()
            .filter(|id| results.remove(id.as_str()).is_some())
            .count() as u64)
    }
}
