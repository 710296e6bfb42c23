use crate::{TaskRetentionJob, TaskWorkerJob};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Central orchestrator for all background jobs.
///
/// Use the builder pattern to register jobs, then call `.start()` once.
///
/// # Example
///
/// ```rust,ignore
/// let handles = JobRunner::new()
///     .with_task_worker(TaskWorkerJob::new(process, queue).with_cancellation(token.clone()))
///     .with_retention(TaskRetentionJob::new(cleanup, retention).with_cancellation(token.clone()))
///     .start();
/// ```
pub struct JobRunner {
    task_worker: Option<TaskWorkerJob>,
    retention: Option<TaskRetentionJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            task_worker: None,
            retention: None,
        }
    }

    pub fn with_task_worker(mut self, job: TaskWorkerJob) -> Self {
        self.task_worker = Some(job);
        self
    }

    pub fn with_retention(mut self, job: TaskRetentionJob) -> Self {
        self.retention = Some(job);
        self
    }

    /// Start all registered background jobs and return their handles.
    pub fn start(self) -> Vec<JoinHandle<()>> {
        info!("Starting background job runner");
        let mut handles = Vec::new();

        if let Some(job) = self.task_worker {
            handles.extend(Arc::new(job).start());
        }

        if let Some(job) = self.retention {
            handles.push(Arc::new(job).start());
        }

        info!(jobs = handles.len(), "All background jobs started");
        handles
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
