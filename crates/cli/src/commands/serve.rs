use anyhow::Context;
use dnstester_api::{create_api_routes, AppState};
use dnstester_domain::Config;
use dnstester_infrastructure::metrics::PrometheusMetricsRecorder;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

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

    let state = AppState {
        submit_task: use_cases.submit_task.clone(),
        get_task: use_cases.get_task.clone(),
        metrics,
    };

    let addr: SocketAddr = format!("{}:{}", config.api.bind_address, config.api.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid API address {}:{}",
                config.api.bind_address, config.api.port
            )
        })?;

    info!(api = %format!("http://{}", addr), "Starting API server");
    start_web_server(addr, create_api_routes(state), shutdown_signal()).await?;

    pool.close().await;
    Ok(())
}
