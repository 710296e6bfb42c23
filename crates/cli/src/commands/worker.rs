use anyhow::Context;
use dnstester_api::create_metrics_routes;
use dnstester_domain::Config;
use dnstester_infrastructure::metrics::PrometheusMetricsRecorder;
use dnstester_jobs::{JobRunner, TaskRetentionJob, TaskWorkerJob};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::bootstrap::init_database;
use crate::di::{Repositories, UseCases};
use crate::server::{shutdown_signal, start_web_server};

pub async fn run(config: &Config) -> anyhow::Result<()> {
    let pool = init_database(&config.database).await?;
    let metrics = Arc::new(
        PrometheusMetricsRecorder::new().context("failed to register metrics")?,
    );
    let repos = Repositories::new(pool.clone(), config, metrics.clone());
    let use_cases = UseCases::new(&repos, metrics.clone(), config)?;
    let shutdown = CancellationToken::new();

    let worker = TaskWorkerJob::new(use_cases.process_task.clone(), repos.queue.clone())
        .with_concurrency(config.worker.concurrency)
        .with_poll_interval(config.worker.poll_interval())
        .with_cancellation(shutdown.clone());

    let mut runner = JobRunner::new().with_task_worker(worker);
    if config.worker.retention_hours > 0 {
        runner = runner.with_retention(
            TaskRetentionJob::new(
                use_cases.cleanup_tasks.clone(),
                Duration::from_secs(config.worker.retention_hours * 3600),
            )
            .with_cancellation(shutdown.clone()),
        );
    }
    let handles = runner.start();

    let metrics_server = if config.worker.enable_metrics {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.worker.metrics_port));
        let token = shutdown.clone();
        let app = create_metrics_routes(metrics.clone());
        Some(tokio::spawn(async move {
            start_web_server(addr, app, async move { token.cancelled().await }).await
        }))
    } else {
        None
    };

    info!(
        concurrency = config.worker.concurrency,
        metrics = config.worker.enable_metrics,
        "Worker ready! Press Ctrl+C to stop"
    );

    shutdown_signal().await;
    info!("Shutdown requested, finishing in-flight tasks");
    shutdown.cancel();

    for handle in handles {
        if let Err(e) = handle.await {
            error!(error = %e, "Background job ended abnormally");
        }
    }

    if let Some(server) = metrics_server {
        server
            .await
            .context("metrics server task panicked")?
            .context("metrics server failed")?;
    }

    pool.close().await;
    info!("Worker stopped");
    Ok(())
}
