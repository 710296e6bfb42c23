use anyhow::Context;
use dnstester_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(config_path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides).context("loading configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Logged once the subscriber is up, since loading happens before it.
pub fn log_config(config_path: Option<&str>, config: &Config) {
    info!(
        config_file = config_path.unwrap_or("default"),
        database = %config.database.url,
        dns_timeout_ms = config.dns.timeout_ms,
        max_concurrent = config.dns.max_concurrent,
        max_retries = config.dns.max_retries,
        servers = config.servers.len(),
        "Configuration loaded"
    );
}
