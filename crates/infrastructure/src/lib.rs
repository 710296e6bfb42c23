pub mod database;
pub mod dns;
pub mod metrics;
pub mod repositories;
