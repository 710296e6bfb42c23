use async_trait::async_trait;
use dnstester_domain::{DomainError, TaskRecord, TaskStatus};
use std::time::Duration;

/// A task handed to one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub task_id: String,
    pub payload: String,
    /// 1 for the first delivery, incremented on every redelivery
    pub attempt: u32,
}

/// Durable at-least-once queue.
///
/// A task has at most one active delivery at a time; a delivery whose lease
/// runs out becomes claimable again. Calls taking a [`Delivery`] only act on
/// the current delivery of the task and return [`DomainError::LeaseLost`]
/// once a newer delivery has replaced it.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn enqueue(&self, task_id: &str, payload: &str) -> Result<(), DomainError>;

    /// Claims the oldest pending (or lease-expired) task and marks it active.
    async fn dequeue(&self) -> Result<Option<Delivery>, DomainError>;

    async fn complete(&self, delivery: &Delivery) -> Result<(), DomainError>;

    async fn fail(&self, delivery: &Delivery, reason: &str) -> Result<(), DomainError>;

    /// Gives an active task back after a processing error. Returns `Pending`
    /// when it will be redelivered, `Failed` once deliveries are exhausted.
    async fn release(&self, delivery: &Delivery, reason: &str)
        -> Result<TaskStatus, DomainError>;

    /// Extends the lease of a delivery that is still being processed.
    async fn renew(&self, delivery: &Delivery) -> Result<(), DomainError>;

    async fn get(&self, task_id: &str) -> Result<Option<TaskRecord>, DomainError>;

    /// Deletes completed and failed tasks last updated before `older_than`
    /// ago, returning their ids.
    async fn purge_finished(&self, older_than: Duration) -> Result<Vec<String>, DomainError>;
}
