use axum::{extract::State, http::StatusCode, response::Json};
use dnstester_application::ports::MetricsRecorder;
use tracing::{error, warn};

use crate::{
    dto::{LookupRequest, LookupResponse},
    state::AppState,
};

pub const LOOKUP_ENDPOINT: &str = "/dns-lookup";

pub async fn submit_lookup(
    State(state): State<AppState>,
    Json(req): Json<LookupRequest>,
) -> Result<(StatusCode, Json<LookupResponse>), (StatusCode, String)> {
    state.metrics.record_api_request(LOOKUP_ENDPOINT);

    match state.submit_task.execute(req.into()).await {
        Ok(task) => Ok((StatusCode::ACCEPTED, Json(task.into()))),
        Err(e) if e.is_validation() => {
            warn!(error = %e, "Rejected lookup request");
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => {
            error!(error = %e, "Failed to enqueue lookup");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
