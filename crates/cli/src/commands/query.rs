use anyhow::{bail, Context};
use dnstester_application::ports::NoopMetricsRecorder;
use dnstester_application::use_cases::ResolutionEngine;
use dnstester_domain::{
    normalize_domain, normalize_qtype, reverse_name, Config, DnsServer, RecordType,
    ResolutionReport, ServerSpec,
};
use dnstester_infrastructure::dns::TransportDispatcher;
use std::fmt::Write as _;
use std::net::IpAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::cli::QueryArgs;
use crate::server::shutdown_signal;

pub async fn run(args: QueryArgs, config: &Config) -> anyhow::Result<()> {
    let qtype = normalize_qtype(args.qtype.as_deref().unwrap_or_default())?;
    let domain = query_name(&args.domain, qtype)?;
    let servers = select_servers(&args, config)?;
    if servers.is_empty() {
        bail!("no servers to query: pass --server or configure [[servers]]");
    }

    let options = config.dns.query_options();
    options.validate()?;

    let engine = ResolutionEngine::new(
        Arc::new(TransportDispatcher::new()),
        Arc::new(NoopMetricsRecorder),
    );
    let cancel = CancellationToken::new();
    let run = engine.run_queries(&cancel, &domain, qtype, &servers, &options);
    tokio::pin!(run);

    let report = tokio::select! {
        report = &mut run => report,
        _ = shutdown_signal() => {
            warn!("Interrupted, canceling outstanding queries");
            cancel.cancel();
            run.await
        }
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serializing report")?
        );
    } else {
        print!("{}", render_table(&domain, qtype, &report));
    }
    Ok(())
}

/// PTR queries for a bare address go to its reverse name.
fn query_name(raw: &str, qtype: RecordType) -> anyhow::Result<String> {
    if qtype == RecordType::PTR {
        if let Ok(ip) = raw.trim().parse::<IpAddr>() {
            return Ok(normalize_domain(&reverse_name(ip))?);
        }
    }
    Ok(normalize_domain(raw)?)
}

fn select_servers(args: &QueryArgs, config: &Config) -> anyhow::Result<Vec<DnsServer>> {
    if args.servers.is_empty() {
        let mut servers = config.default_servers()?;
        if !args.protocols.is_empty() {
            let protocols = ServerSpec {
                protocols: args.protocols.clone(),
                ..ServerSpec::new("0.0.0.0")
            }
            .normalize()?
            .protocols;
            for server in &mut servers {
                server.protocols = protocols.clone();
            }
        }
        return Ok(servers);
    }

    args.servers
        .iter()
        .map(|raw| {
            ServerSpec {
                protocols: args.protocols.clone(),
                ..ServerSpec::new(raw.as_str())
            }
            .normalize()
            .with_context(|| format!("invalid server '{}'", raw))
        })
        .collect()
}

pub(crate) fn render_table(domain: &str, qtype: RecordType, report: &ResolutionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", domain, qtype);
    let width = report
        .results
        .iter()
        .map(|r| r.server.to_string().len())
        .max()
        .unwrap_or(6)
        .max(6);

    let _ = writeln!(
        out,
        "{:<width$}  {:<8}  {:<24}  {:>10}  {:>8}",
        "SERVER",
        "PROTOCOL",
        "RESULT",
        "LATENCY",
        "ATTEMPTS",
        width = width
    );
    for result in &report.results {
        let outcome = match (&result.rcode, &result.error) {
            (Some(rcode), _) => rcode.to_string(),
            (None, Some(error)) => error.clone(),
            (None, None) => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:<width$}  {:<8}  {:<24}  {:>7.1} ms  {:>8}",
            result.server.to_string(),
            result.protocol.as_str(),
            outcome,
            result.latency_seconds * 1000.0,
            result.attempts,
            width = width
        );
    }

    let summary = report.summary();
    let _ = writeln!(
        out,
        "\n{} targets: {} noerror, {} dns errors, {} failed, {} canceled in {:.3} s",
        summary.total,
        summary.noerror,
        summary.dns_errors,
        summary.failed,
        summary.canceled,
        report.duration_seconds
    );
    out
}
