pub mod shutdown;
pub mod web;

pub use shutdown::shutdown_signal;
pub use web::start_web_server;
