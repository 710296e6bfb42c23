#![allow(dead_code)]

pub use dnstester_test_support::{InMemoryResultStore, InMemoryTaskQueue};

use dnstester_api::AppState;
use dnstester_application::use_cases::{GetTaskUseCase, SubmitTaskUseCase};
use dnstester_infrastructure::metrics::PrometheusMetricsRecorder;
use std::sync::Arc;

pub struct TestApp {
    pub state: AppState,
    pub queue: Arc<InMemoryTaskQueue>,
    pub store: Arc<InMemoryResultStore>,
    pub metrics: Arc<PrometheusMetricsRecorder>,
}

pub fn test_app() -> TestApp {
    let queue = Arc::new(InMemoryTaskQueue::new());
    let store = Arc::new(InMemoryResultStore::new());
    let metrics = Arc::new(PrometheusMetricsRecorder::new().unwrap());
    let state = AppState {
        submit_task: Arc::new(SubmitTaskUseCase::new(queue.clone())),
        get_task: Arc::new(GetTaskUseCase::new(queue.clone(), store.clone())),
        metrics: metrics.clone(),
    };
    TestApp {
        state,
        queue,
        store,
        metrics,
    }
}
