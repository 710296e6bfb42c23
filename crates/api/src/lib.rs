pub mod dto;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::{create_api_routes, create_metrics_routes};
pub use state::AppState;
