pub mod metrics_recorder;
pub mod query_transport;
pub mod result_store;
pub mod task_queue;

pub use metrics_recorder::{AttemptRecord, MetricsRecorder, NoopMetricsRecorder};
pub use query_transport::QueryTransport;
pub use result_store::ResultStore;
pub use task_queue::{Delivery, TaskQueue};
