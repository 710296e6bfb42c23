use clap::{Args, Parser, Subcommand};
use dnstester_domain::CliOverrides;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "dnstester")]
#[command(version)]
#[command(about = "Measures DNS resolution health and latency across servers and protocols")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short = 'c', long, global = true, env = "DNSTESTER_CONFIG")]
    pub config: Option<String>,

    /// Log level or filter directive (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a name against servers right now and print the report
    Query(QueryArgs),
    /// Process queued tasks until interrupted
    Worker(WorkerArgs),
    /// Serve the HTTP API for submitting and polling tasks
    Serve(ServeArgs),
    /// Validate and enqueue a task, printing its id
    Submit(SubmitArgs),
    /// Print the status and result of a task
    Status(StatusArgs),
}

/// Resolution knobs shared by every command that runs queries.
#[derive(Args, Debug, Clone, Default)]
pub struct DnsArgs {
    /// Per-attempt timeout, e.g. `2s`, `750ms` or plain seconds
    #[arg(short = 'T', long, value_parser = parse_duration)]
    pub dns_timeout: Option<Duration>,

    /// Maximum simultaneous queries
    #[arg(short = 'C', long)]
    pub max_concurrent: Option<usize>,

    /// Extra attempts after a transport failure
    #[arg(short = 'R', long)]
    pub max_retries: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// SQLite database holding the task queue and results
    #[arg(short = 'r', long, env = "DNSTESTER_DATABASE_URL")]
    pub database_url: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Name to resolve; an IP address with `-t PTR` is reversed automatically
    pub domain: String,

    /// Record type (default: A)
    #[arg(short = 't', long)]
    pub qtype: Option<String>,

    /// Server to query; repeatable. Defaults to the configured servers
    #[arg(short = 's', long = "server")]
    pub servers: Vec<String>,

    /// Protocols to query every server over; repeatable
    #[arg(short = 'p', long = "protocol")]
    pub protocols: Vec<String>,

    /// Skip certificate validation for tls, https and quic
    #[arg(long)]
    pub insecure: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub dns: DnsArgs,
}

#[derive(Args, Debug, Clone)]
pub struct WorkerArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Simultaneous task processors
    #[arg(short = 'n', long)]
    pub concurrency: Option<usize>,

    #[command(flatten)]
    pub dns: DnsArgs,

    /// Serve /metrics and /health while working
    #[arg(short = 'M', long)]
    pub enable_metrics: bool,

    /// Port for the metrics endpoint
    #[arg(short = 'm', long)]
    pub metrics_port: Option<u16>,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Address to bind the HTTP API to
    #[arg(short = 'b', long)]
    pub bind: Option<String>,

    /// HTTP API port
    #[arg(short = 'P', long)]
    pub port: Option<u16>,
}

#[derive(Args, Debug, Clone)]
pub struct SubmitArgs {
    pub domain: String,

    #[arg(short = 't', long)]
    pub qtype: Option<String>,

    /// Server to query; repeatable. Defaults to the configured servers
    #[arg(short = 's', long = "server")]
    pub servers: Vec<String>,

    #[arg(long)]
    pub insecure: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    pub task_id: String,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides {
            log_level: self.log_level.clone(),
            ..CliOverrides::default()
        };

        match &self.command {
            Command::Query(args) => {
                apply_dns(&mut overrides, &args.dns);
                if args.insecure {
                    overrides.tls_insecure = Some(true);
                }
            }
            Command::Worker(args) => {
                apply_dns(&mut overrides, &args.dns);
                overrides.database_url = args.database.database_url.clone();
                overrides.worker_concurrency = args.concurrency;
                if args.enable_metrics {
                    overrides.enable_metrics = Some(true);
                }
                overrides.metrics_port = args.metrics_port;
            }
            Command::Serve(args) => {
                overrides.database_url = args.database.database_url.clone();
                overrides.bind_address = args.bind.clone();
                overrides.api_port = args.port;
            }
            Command::Submit(args) => {
                overrides.database_url = args.database.database_url.clone();
            }
            Command::Status(args) => {
                overrides.database_url = args.database.database_url.clone();
            }
        }

        overrides
    }
}

fn apply_dns(overrides: &mut CliOverrides, dns: &DnsArgs) {
    overrides.dns_timeout = dns.dns_timeout;
    overrides.max_concurrent = dns.max_concurrent;
    overrides.max_retries = dns.max_retries;
}

/// Accepts humantime strings (`1500ms`, `2s`) and bare seconds (`2`, `0.5`).
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<f64>() {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(format!("duration must be positive: {}", raw));
        }
        return Ok(Duration::from_secs_f64(secs));
    }
    let duration = humantime::parse_duration(raw).map_err(|e| e.to_string())?;
    if duration.is_zero() {
        return Err(format!("duration must be positive: {}", raw));
    }
    Ok(duration)
}
