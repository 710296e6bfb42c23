use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Task processor settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkerConfig {
    /// Simultaneous task processors per process
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Idle wait between empty queue polls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long a claimed task stays owned before another worker may take it
    #[serde(default = "default_lease_secs")]
    pub lease_secs: u64,

    /// Deliveries before a task is given up as failed
    #[serde(default = "default_max_deliveries")]
    pub max_deliveries: u32,

    /// Cancel a resolution run after this many seconds and commit what finished
    #[serde(default)]
    pub task_deadline_secs: Option<u64>,

    /// Finished tasks older than this are purged (0 disables)
    #[serde(default = "default_retention_hours")]
    pub retention_hours: u64,

    #[serde(default)]
    pub enable_metrics: bool,

    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            poll_interval_ms: default_poll_interval_ms(),
            lease_secs: default_lease_secs(),
            max_deliveries: default_max_deliveries(),
            task_deadline_secs: None,
            retention_hours: default_retention_hours(),
            enable_metrics: false,
            metrics_port: default_metrics_port(),
        }
    }
}

impl WorkerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn lease(&self) -> Duration {
        Duration::from_secs(self.lease_secs)
    }

    /// How often an active task refreshes its lease.
    pub fn lease_renewal(&self) -> Duration {
        self.lease() / 3
    }

    pub fn task_deadline(&self) -> Option<Duration> {
        self.task_deadline_secs.map(Duration::from_secs)
    }
}

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_lease_secs() -> u64 {
    300
}

fn default_max_deliveries() -> u32 {
    5
}

fn default_retention_hours() -> u64 {
    168
}

fn default_metrics_port() -> u16 {
    9091
}
