use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse};
use dnstester_infrastructure::metrics::PrometheusMetricsRecorder;
use std::sync::Arc;
use tracing::error;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn get_metrics(
    State(metrics): State<Arc<PrometheusMetricsRecorder>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let text = metrics.render().map_err(|e| {
        error!(error = %e, "Failed to encode metrics");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    Ok(([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], text))
}
