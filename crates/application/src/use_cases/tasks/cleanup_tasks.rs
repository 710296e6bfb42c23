use dnstester_domain::DomainError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

use crate::ports::{ResultStore, TaskQueue};

/// Drops finished tasks and their results once they age out.
pub struct CleanupFinishedTasksUseCase {
    queue: Arc<dyn TaskQueue>,
    store: Arc<dyn ResultStore>,
}

impl CleanupFinishedTasksUseCase {
    pub fn new(queue: Arc<dyn TaskQueue>, store: Arc<dyn ResultStore>) -> Self {
        Self { queue, store }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, retention: Duration) -> Result<u64, DomainError> {
        let purged = self.queue.purge_finished(retention).await?;
        if purged.is_empty() {
            return Ok(0);
        }

        let results = self.store.delete(&purged).await?;
        info!(
            tasks = purged.len(),
            results,
            "Purged finished tasks"
        );

        Ok(purged.len() as u64)
    }
}
