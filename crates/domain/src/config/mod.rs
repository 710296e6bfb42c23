//! Configuration for the dns-tester binaries
//!
//! - `root`: top-level `Config`, file loading and CLI overrides
//! - `dns`: query timeout, concurrency and retry defaults
//! - `worker`: task processor settings
//! - `database`: queue / result store location
//! - `api`: HTTP listener
//! - `logging`: log level and format
//! - `errors`: configuration errors

pub mod api;
pub mod database;
pub mod dns;
pub mod errors;
pub mod logging;
pub mod root;
pub mod worker;

pub use api::ApiConfig;
pub use database::DatabaseConfig;
pub use dns::DnsConfig;
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use root::{CliOverrides, Config};
pub use worker::WorkerConfig;
