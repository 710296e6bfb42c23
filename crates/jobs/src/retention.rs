use dnstester_application::use_cases::CleanupFinishedTasksUseCase;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Periodically deletes finished tasks and their results.
pub struct TaskRetentionJob {
    cleanup: Arc<CleanupFinishedTasksUseCase>,
    retention: Duration,
    interval_secs: u64,
    shutdown: CancellationToken,
}

impl TaskRetentionJob {
    pub fn new(cleanup: Arc<CleanupFinishedTasksUseCase>, retention: Duration) -> Self {
        Self {
            cleanup,
            retention,
            interval_secs: 3600,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval_secs = interval_secs.max(1);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        info!(
            retention_hours = self.retention.as_secs() / 3600,
            "Starting task retention job"
        );

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("TaskRetentionJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.cleanup.execute(self.retention).await {
                            Ok(deleted) => {
                                info!(deleted, "Task retention completed");
                            }
                            Err(e) => {
                                error!(error = %e, "Task retention failed");
                            }
                        }
                    }
                }
            }
        })
    }
}
