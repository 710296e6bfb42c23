use crate::{DomainError, Rcode, Scheme, Target};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_CONCURRENCY: usize = 500;
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Knobs for one resolution run.
///
/// `max_concurrency` bounds in-flight attempts across every target of the
/// run, not per server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryOptions {
    pub timeout: Duration,
    pub max_concurrency: usize,
    pub max_retries: u32,
    pub tls_insecure: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_retries: DEFAULT_MAX_RETRIES,
            tls_insecure: false,
        }
    }
}

impl QueryOptions {
    pub fn with_tls_insecure(mut self, tls_insecure: bool) -> Self {
        self.tls_insecure = tls_insecure;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_concurrency == 0 {
            return Err(DomainError::InvalidPayload(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(DomainError::InvalidPayload(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Failure of a single query attempt below the DNS layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("TLS failure: {0}")]
    Tls(String),

    #[error("HTTP failure: {0}")]
    Http(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("cannot resolve server address: {0}")]
    Unresolvable(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl TransportError {
    /// Label value for the `error_type` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::ConnectionRefused(_) => "connection_refused",
            Self::Tls(_) => "tls",
            Self::Http(_) => "http",
            Self::MalformedResponse(_) => "malformed",
            Self::Unresolvable(_) => "resolve",
            Self::Io(_) => "io",
        }
    }

    pub fn from_io(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::ConnectionRefused => Self::ConnectionRefused(err.to_string()),
            std::io::ErrorKind::TimedOut => Self::Timeout(Duration::ZERO),
            _ => Self::Io(err.to_string()),
        }
    }
}

/// How one attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A DNS response arrived; the rcode may still be a failure code.
    Success(Rcode),
    Timeout,
    TransportError(TransportError),
    Canceled,
}

impl AttemptOutcome {
    pub fn from_transport(result: Result<Rcode, TransportError>) -> Self {
        match result {
            Ok(rcode) => Self::Success(rcode),
            Err(TransportError::Timeout(_)) => Self::Timeout,
            Err(e) => Self::TransportError(e),
        }
    }

    /// Only transport-level failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::TransportError(_))
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Success(_) => OutcomeKind::Success,
            Self::Timeout => OutcomeKind::Timeout,
            Self::TransportError(_) => OutcomeKind::TransportError,
            Self::Canceled => OutcomeKind::Canceled,
        }
    }

    /// Value of the `result` metric label: the rcode mnemonic on success,
    /// otherwise the error kind.
    pub fn result_label(&self) -> String {
        match self {
            Self::Success(rcode) => rcode.to_string(),
            Self::Timeout => "timeout".to_string(),
            Self::TransportError(e) => e.kind().to_string(),
            Self::Canceled => "canceled".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    Timeout,
    TransportError,
    Canceled,
}

/// Externally visible record for one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub server: Target,
    pub protocol: Scheme,
    pub rcode: Option<Rcode>,
    pub latency_seconds: f64,
    pub error: Option<String>,
    pub outcome: OutcomeKind,
    pub attempts: u32,
}

impl QueryResult {
    pub fn from_outcome(
        target: Target,
        outcome: &AttemptOutcome,
        latency: Duration,
        attempts: u32,
        timeout: Duration,
    ) -> Self {
        let (rcode, error) = match outcome {
            AttemptOutcome::Success(rcode) => (Some(*rcode), None),
            AttemptOutcome::Timeout => (None, Some(format!("timeout after {:?}", timeout))),
            AttemptOutcome::TransportError(e) => (None, Some(e.to_string())),
            AttemptOutcome::Canceled => (None, Some("canceled".to_string())),
        };

        Self {
            protocol: target.scheme(),
            server: target,
            rcode,
            latency_seconds: latency.as_secs_f64(),
            error,
            outcome: outcome.kind(),
            attempts,
        }
    }

    pub fn canceled(target: Target, attempts: u32, latency: Duration) -> Self {
        Self::from_outcome(
            target,
            &AttemptOutcome::Canceled,
            latency,
            attempts,
            Duration::ZERO,
        )
    }

    pub fn is_noerror(&self) -> bool {
        matches!(self.rcode, Some(Rcode::NoError))
    }
}

/// Aggregated result of one resolution run, stored as the task result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionReport {
    #[serde(rename = "details")]
    pub results: Vec<QueryResult>,
    #[serde(rename = "duration")]
    pub duration_seconds: f64,
}

impl ResolutionReport {
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            duration_seconds: 0.0,
        }
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.results.len(),
            ..ReportSummary::default()
        };
        for result in &self.results {
            match result.outcome {
                OutcomeKind::Success if result.is_noerror() => summary.noerror += 1,
                OutcomeKind::Success => summary.dns_errors += 1,
                OutcomeKind::Timeout | OutcomeKind::TransportError => summary.failed += 1,
                OutcomeKind::Canceled => summary.canceled += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub noerror: usize,
    pub dns_errors: usize,
    pub failed: usize,
    pub canceled: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> Target {
        "udp://192.0.2.53".parse().unwrap()
    }

    #[test]
    fn test_rcodes_are_not_retryable() {
        assert!(!AttemptOutcome::Success(Rcode::NXDomain).is_retryable());
        assert!(!AttemptOutcome::Success(Rcode::ServFail).is_retryable());
        assert!(!AttemptOutcome::Canceled.is_retryable());
        assert!(AttemptOutcome::Timeout.is_retryable());
        assert!(AttemptOutcome::TransportError(TransportError::Io("x".into())).is_retryable());
    }

    #[test]
    fn test_transport_timeout_maps_to_timeout_outcome() {
        let outcome =
            AttemptOutcome::from_transport(Err(TransportError::Timeout(Duration::from_secs(1))));
        assert_eq!(outcome, AttemptOutcome::Timeout);
        assert_eq!(outcome.result_label(), "timeout");
    }

    #[test]
    fn test_result_payload_shape() {
        let result = QueryResult::from_outcome(
            target(),
            &AttemptOutcome::Success(Rcode::NoError),
            Duration::from_millis(20),
            1,
            DEFAULT_TIMEOUT,
        );
        let report = ResolutionReport {
            results: vec![result],
            duration_seconds: 0.02,
        };
        let value = serde_json::to_value(&report).unwrap();
        let detail = &value["details"][0];
        assert_eq!(detail["server"], "udp://192.0.2.53:53");
        assert_eq!(detail["protocol"], "udp");
        assert_eq!(detail["rcode"], "NOERROR");
        assert!(detail["error"].is_null());
        assert_eq!(value["duration"], 0.02);
    }

    #[test]
    fn test_summary_buckets() {
        let report = ResolutionReport {
            results: vec![
                QueryResult::from_outcome(
                    target(),
                    &AttemptOutcome::Success(Rcode::NoError),
                    Duration::ZERO,
                    1,
                    DEFAULT_TIMEOUT,
                ),
                QueryResult::from_outcome(
                    target(),
                    &AttemptOutcome::Success(Rcode::NXDomain),
                    Duration::ZERO,
                    1,
                    DEFAULT_TIMEOUT,
                ),
                QueryResult::from_outcome(
                    target(),
                    &AttemptOutcome::Timeout,
                    Duration::ZERO,
                    4,
                    DEFAULT_TIMEOUT,
                ),
                QueryResult::canceled(target(), 0, Duration::ZERO),
            ],
            duration_seconds: 1.0,
        };
        let summary = report.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.noerror, 1);
        assert_eq!(summary.dns_errors, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.canceled, 1);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let options = QueryOptions {
            max_concurrency: 0,
            ..QueryOptions::default()
        };
        assert!(options.validate().is_err());
    }
}
