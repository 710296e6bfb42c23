use axum::extract::FromRef;
use dnstester_application::use_cases::{GetTaskUseCase, SubmitTaskUseCase};
use dnstester_infrastructure::metrics::PrometheusMetricsRecorder;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub submit_task: Arc<SubmitTaskUseCase>,
    pub get_task: Arc<GetTaskUseCase>,
    pub metrics: Arc<PrometheusMetricsRecorder>,
}

impl FromRef<AppState> for Arc<PrometheusMetricsRecorder> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.metrics)
    }
}
