use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid query type: {0}")]
    InvalidQueryType(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Invalid task payload: {0}")]
    InvalidPayload(String),

    #[error("No servers to query")]
    NoServers,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Queue error: {0}")]
    QueueError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Lease lost: {0}")]
    LeaseLost(String),
}

impl DomainError {
    /// Errors caused by bad input rather than by the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDomainName(_)
                | Self::InvalidQueryType(_)
                | Self::InvalidTarget(_)
                | Self::UnsupportedScheme(_)
                | Self::InvalidPayload(_)
                | Self::NoServers
        )
    }
}
