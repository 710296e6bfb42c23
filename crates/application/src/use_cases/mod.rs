pub mod resolution;
pub mod tasks;

pub use resolution::{ResolutionEngine, ResultAggregator};
pub use tasks::{
    CleanupFinishedTasksUseCase, GetTaskUseCase, ProcessTaskUseCase, SubmitTaskRequest,
    SubmitTaskUseCase, SubmittedTask, TaskOutcome,
};
