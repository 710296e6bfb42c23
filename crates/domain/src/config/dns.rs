use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::query::{DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_RETRIES};
use crate::QueryOptions;

/// Defaults applied to every resolution run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsConfig {
    /// Per-attempt timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Upper bound on simultaneous outbound queries within one run
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Extra attempts after a transport failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Skip certificate validation for TLS based protocols
    #[serde(default)]
    pub tls_insecure: bool,
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_concurrent: default_max_concurrent(),
            max_retries: default_max_retries(),
            tls_insecure: false,
        }
    }
}

impl DnsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            timeout: self.timeout(),
            max_concurrency: self.max_concurrent,
            max_retries: self.max_retries,
            tls_insecure: self.tls_insecure,
        }
    }
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENCY
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}
