use dnstester_application::ports::NoopMetricsRecorder;
use dnstester_application::use_cases::SubmitTaskRequest;
use dnstester_domain::{Config, ServerSpec};
use std::sync::Arc;

use crate::bootstrap::init_database;
use crate::cli::SubmitArgs;
use crate::di::{Repositories, UseCases};

pub async fn run(args: SubmitArgs, config: &Config) -> anyhow::Result<()> {
    let pool = init_database(&config.database).await?;
    let metrics = Arc::new(NoopMetricsRecorder);
    let repos = Repositories::new(pool.clone(), config, metrics.clone());
    let use_cases = UseCases::new(&repos, metrics, config)?;

    let request = SubmitTaskRequest {
        domain: args.domain,
        qtype: args.qtype.unwrap_or_default(),
        servers: args.servers.into_iter().map(ServerSpec::new).collect(),
        tls_insecure: args.insecure || config.dns.tls_insecure,
    };

    let submitted = use_cases.submit_task.execute(request).await?;
    println!("{}", submitted.task_id);

    pool.close().await;
    Ok(())
}
