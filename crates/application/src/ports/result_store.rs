use async_trait::async_trait;
use dnstester_domain::{DomainError, ResolutionReport};

/// Durable key-value store for task results.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Insert or replace the result for `task_id`. Writing the same report
    /// twice leaves a single, unchanged value.
    async fn put(&self, task_id: &str, report: &ResolutionReport) -> Result<(), DomainError>;

    async fn get(&self, task_id: &str) -> Result<Option<ResolutionReport>, DomainError>;

    /// Remove results for the given tasks, returning how many existed.
    async fn delete(&self, task_ids: &[String]) -> Result<u64, DomainError>;
}
