pub mod query;
pub mod serve;
pub mod status;
pub mod submit;
pub mod worker;
