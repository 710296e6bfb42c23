use anyhow::{bail, Context};
use dnstester_application::ports::NoopMetricsRecorder;
use dnstester_domain::Config;
use std::sync::Arc;

use crate::bootstrap::init_database;
use crate::cli::StatusArgs;
use crate::di::{Repositories, UseCases};

pub async fn run(args: StatusArgs, config: &Config) -> anyhow::Result<()> {
    let pool = init_database(&config.database).await?;
    let metrics = Arc::new(NoopMetricsRecorder);
    let repos = Repositories::new(pool.clone(), config, metrics.clone());
    let use_cases = UseCases::new(&repos, metrics, config)?;

    let record = use_cases.get_task.execute(&args.task_id).await?;
    pool.close().await;

    let Some(record) = record else {
        bail!("task {} not found", args.task_id);
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&record).context("serializing task")?
    );
    Ok(())
}
