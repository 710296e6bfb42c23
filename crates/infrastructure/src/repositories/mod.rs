pub mod result_store_repository;
pub mod task_queue_repository;

pub use result_store_repository::SqliteResultStore;
pub use task_queue_repository::SqliteTaskQueue;
