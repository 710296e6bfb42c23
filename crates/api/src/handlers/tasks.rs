use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use dnstester_application::ports::MetricsRecorder;
use tracing::error;

use crate::{dto::TaskResponse, state::AppState};

pub async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskResponse>, (StatusCode, String)> {
    state.metrics.record_result_poll();

    match state.get_task.execute(&task_id).await {
        Ok(Some(record)) => Ok(Json(record.into())),
        Ok(None) => Err((StatusCode::NOT_FOUND, format!("Task {} not found", task_id))),
        Err(e) => {
            error!(task_id = %task_id, error = %e, "Failed to retrieve task");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
