use dnstester_domain::{ResolutionReport, TaskRecord, TaskStatus};
use serde::Serialize;

#[derive(Serialize, Debug, Clone)]
pub struct TaskResponse {
    pub task_id: String,
    pub status: TaskStatus,
    pub attempts: u32,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResolutionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<TaskRecord> for TaskResponse {
    fn from(record: TaskRecord) -> Self {
        Self {
            task_id: record.task_id,
            status: record.status,
            attempts: record.attempts,
            created_at: record.created_at,
            updated_at: record.updated_at,
            result: record.result,
            error: record.error,
        }
    }
}
