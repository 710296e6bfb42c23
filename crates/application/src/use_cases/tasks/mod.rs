pub mod cleanup_tasks;
pub mod get_task;
pub mod process_task;
pub mod submit_task;

pub use cleanup_tasks::CleanupFinishedTasksUseCase;
pub use get_task::GetTaskUseCase;
pub use process_task::{ProcessTaskUseCase, TaskOutcome};
pub use submit_task::{SubmitTaskRequest, SubmitTaskUseCase, SubmittedTask};
