use dnstester_application::ports::TaskQueue;
use dnstester_application::use_cases::{ProcessTaskUseCase, TaskOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Pulls tasks from the queue and processes them.
///
/// Runs `concurrency` independent processor loops. Each loop claims one task
/// at a time; shutdown stops claiming but lets a task in progress finish.
pub struct TaskWorkerJob {
    process: Arc<ProcessTaskUseCase>,
    queue: Arc<dyn TaskQueue>,
    concurrency: usize,
    poll_interval: Duration,
    shutdown: CancellationToken,
}

impl TaskWorkerJob {
    pub fn new(process: Arc<ProcessTaskUseCase>, queue: Arc<dyn TaskQueue>) -> Self {
        Self {
            process,
            queue,
            concurrency: 4,
            poll_interval: Duration::from_millis(500),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    /// Spawns the processor loops. Await the handles after cancelling the
    /// shutdown token to drain in-flight tasks.
    pub fn start(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        info!(
            concurrency = self.concurrency,
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Starting task worker"
        );

        (0..self.concurrency)
            .map(|processor| {
                let job = Arc::clone(&self);
                tokio::spawn(async move { job.run(processor).await })
            })
            .collect()
    }

    async fn run(&self, processor: usize) {
        loop {
            let claimed = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => break,
                claimed = self.queue.dequeue() => claimed,
            };

            match claimed {
                Ok(Some(delivery)) => {
                    debug!(processor, task_id = %delivery.task_id, "Task claimed");
                    match self.process.execute(delivery).await {
                        Ok(TaskOutcome::Completed { .. }) => {}
                        Ok(TaskOutcome::Failed { task_id, reason }) => {
                            warn!(processor, task_id = %task_id, reason = %reason, "Task failed");
                        }
                        Err(e) => {
                            error!(processor, error = %e, "Task processing error");
                        }
                    }
                }
                Ok(None) => {
                    if self.idle().await {
                        break;
                    }
                }
                Err(e) => {
                    error!(processor, error = %e, "Failed to claim task");
                    if self.idle().await {
                        break;
                    }
                }
            }
        }

        info!(processor, "TaskWorkerJob: processor stopped");
    }

    /// Waits one poll interval. Returns `true` when shutdown was requested.
    async fn idle(&self) -> bool {
        tokio::select! {
            _ = self.shutdown.cancelled() => true,
            _ = tokio::time::sleep(self.poll_interval) => false,
        }
    }
}
