pub mod retention;
pub mod runner;
pub mod task_worker;

pub use retention::TaskRetentionJob;
pub use runner::JobRunner;
pub use task_worker::TaskWorkerJob;
