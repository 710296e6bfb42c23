//! dns-tester domain layer
pub mod config;
pub mod errors;
pub mod normalize;
pub mod query;
pub mod rcode;
pub mod record_type;
pub mod scheme;
pub mod server;
pub mod target;
pub mod task;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use normalize::{normalize_domain, normalize_qtype, reverse_name};
pub use query::{
    AttemptOutcome, OutcomeKind, QueryOptions, QueryResult, ReportSummary, ResolutionReport,
    TransportError,
};
pub use rcode::Rcode;
pub use record_type::RecordType;
pub use scheme::Scheme;
pub use server::{DnsServer, ServerSpec};
pub use target::Target;
pub use task::{generate_task_id, ResolutionRequest, TaskPayload, TaskRecord, TaskStatus};
