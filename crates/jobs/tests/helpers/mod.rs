#![allow(dead_code)]
pub mod mock_transport;

pub use dnstester_test_support::{InMemoryResultStore, InMemoryTaskQueue};
pub use mock_transport::DelayedTransport;

use dnstester_application::ports::{NoopMetricsRecorder, TaskQueue};
use dnstester_application::use_cases::{ProcessTaskUseCase, ResolutionEngine};
use dnstester_domain::{QueryOptions, ServerSpec, TaskPayload};
use std::sync::Arc;
use std::time::Duration;

pub fn payload(task_id: &str, servers: &[&str]) -> String {
    TaskPayload {
        task_id: task_id.to_string(),
        domain: "example.com".to_string(),
        qtype: "A".to_string(),
        servers: servers.iter().map(|s| ServerSpec::new(*s)).collect(),
        tls_insecure: false,
    }
    .encode()
    .unwrap()
}

pub async fn enqueue(queue: &InMemoryTaskQueue, task_id: &str) {
    queue
        .enqueue(task_id, &payload(task_id, &["1.1.1.1"]))
        .await
        .unwrap();
}

pub fn process_use_case(
    transport: DelayedTransport,
    queue: Arc<InMemoryTaskQueue>,
    store: Arc<InMemoryResultStore>,
) -> Arc<ProcessTaskUseCase> {
    let metrics = Arc::new(NoopMetricsRecorder);
    let engine = Arc::new(ResolutionEngine::new(Arc::new(transport), metrics.clone()));
    let options = QueryOptions {
        timeout: Duration::from_secs(5),
        max_concurrency: 10,
        max_retries: 0,
        tls_insecure: false,
    };
    Arc::new(ProcessTaskUseCase::new(engine, queue, store, metrics, options))
}
