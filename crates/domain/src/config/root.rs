use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::{ApiConfig, ConfigError, DatabaseConfig, DnsConfig, LoggingConfig, WorkerConfig};
use crate::{DnsServer, DomainError, ServerSpec};

/// Longest lease a worker may hold without renewing it.
pub const MAX_LEASE_SECS: u64 = 86_400;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub worker: WorkerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Servers queried when a request does not name any
    #[serde(default)]
    pub servers: Vec<ServerSpec>,
}

/// Command line values that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_url: Option<String>,
    pub dns_timeout: Option<Duration>,
    pub max_concurrent: Option<usize>,
    pub max_retries: Option<u32>,
    pub tls_insecure: Option<bool>,
    pub worker_concurrency: Option<usize>,
    pub enable_metrics: Option<bool>,
    pub metrics_port: Option<u16>,
    pub bind_address: Option<String>,
    pub api_port: Option<u16>,
    pub log_level: Option<String>,
}

impl Config {
    /// Reads `path` when given, otherwise starts from defaults, then applies
    /// the overrides.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(Path::new(p))?,
            None => Self::default(),
        };
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, String> {
        toml::from_str(raw).map_err(|e| e.to_string())
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(url) = overrides.database_url {
            self.database.url = url;
        }
        if let Some(timeout) = overrides.dns_timeout {
            self.dns.timeout_ms = timeout.as_millis() as u64;
        }
        if let Some(max) = overrides.max_concurrent {
            self.dns.max_concurrent = max;
        }
        if let Some(retries) = overrides.max_retries {
            self.dns.max_retries = retries;
        }
        if let Some(insecure) = overrides.tls_insecure {
            self.dns.tls_insecure = insecure;
        }
        if let Some(concurrency) = overrides.worker_concurrency {
            self.worker.concurrency = concurrency;
        }
        if let Some(enable) = overrides.enable_metrics {
            self.worker.enable_metrics = enable;
        }
        if let Some(port) = overrides.metrics_port {
            self.worker.metrics_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.api.bind_address = bind;
        }
        if let Some(port) = overrides.api_port {
            self.api.port = port;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dns.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "dns.timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.dns.max_concurrent == 0 {
            return Err(ConfigError::Validation(
                "dns.max_concurrent must be at least 1".to_string(),
            ));
        }
        if self.worker.concurrency == 0 {
            return Err(ConfigError::Validation(
                "worker.concurrency must be at least 1".to_string(),
            ));
        }
        if self.worker.lease_secs == 0 || self.worker.lease_secs > MAX_LEASE_SECS {
            return Err(ConfigError::Validation(format!(
                "worker.lease_secs must be between 1 and {}",
                MAX_LEASE_SECS
            )));
        }
        if self.worker.max_deliveries == 0 {
            return Err(ConfigError::Validation(
                "worker.max_deliveries must be at least 1".to_string(),
            ));
        }
        self.default_servers()
            .map_err(|e| ConfigError::Validation(format!("servers: {}", e)))?;
        Ok(())
    }

    pub fn default_servers(&self) -> Result<Vec<DnsServer>, DomainError> {
        self.servers.iter().map(ServerSpec::normalize).collect()
    }
}
