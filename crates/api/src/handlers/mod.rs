pub mod health;
pub mod lookup;
pub mod metrics;
pub mod tasks;

pub use health::health_check;
pub use lookup::submit_lookup;
pub use metrics::get_metrics;
pub use tasks::get_task;
