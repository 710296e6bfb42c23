use dnstester_domain::{DomainError, TaskRecord, TaskStatus};
use std::sync::Arc;
use tracing::instrument;

use crate::ports::{ResultStore, TaskQueue};

pub struct GetTaskUseCase {
    queue: Arc<dyn TaskQueue>,
    store: Arc<dyn ResultStore>,
}

impl GetTaskUseCase {
    pub fn new(queue: Arc<dyn TaskQueue>, store: Arc<dyn ResultStore>) -> Self {
        Self { queue, store }
    }

    /// Task status, with the stored result attached once completed.
    #[instrument(skip(self))]
    pub async fn execute(&self, task_id: &str) -> Result<Option<TaskRecord>, DomainError> {
        let Some(mut record) = self.queue.get(task_id).await? else {
            return Ok(None);
        };

        if record.status == TaskStatus::Completed {
            record.result = self.store.get(task_id).await?;
        }

        Ok(Some(record))
    }
}
