use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use dnstester_infrastructure::metrics::PrometheusMetricsRecorder;
use std::sync::Arc;

/// Creates all API routes with state
pub fn create_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::get_metrics))
        .route(handlers::lookup::LOOKUP_ENDPOINT, post(handlers::submit_lookup))
        .route("/tasks/{task_id}", get(handlers::get_task))
        .with_state(state)
}

/// Health and metrics only, for processes that do not accept tasks.
pub fn create_metrics_routes(metrics: Arc<PrometheusMetricsRecorder>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::get_metrics))
        .with_state(metrics)
}
