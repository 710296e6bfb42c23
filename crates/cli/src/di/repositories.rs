use dnstester_application::ports::MetricsRecorder;
use dnstester_domain::Config;
use dnstester_infrastructure::repositories::{SqliteResultStore, SqliteTaskQueue};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct Repositories {
    pub queue: Arc<SqliteTaskQueue>,
    pub store: Arc<SqliteResultStore>,
}

impl Repositories {
    pub fn new(pool: SqlitePool, config: &Config, metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self {
            queue: Arc::new(
                SqliteTaskQueue::new(
                    pool.clone(),
                    config.worker.lease(),
                    config.worker.max_deliveries,
                )
                .with_metrics(metrics),
            ),
            store: Arc::new(SqliteResultStore::new(pool)),
        }
    }
}
