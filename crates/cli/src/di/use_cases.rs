use dnstester_application::ports::MetricsRecorder;
use dnstester_application::use_cases::{
    CleanupFinishedTasksUseCase, GetTaskUseCase, ProcessTaskUseCase, ResolutionEngine,
    SubmitTaskUseCase,
};
use dnstester_domain::Config;
use dnstester_infrastructure::dns::TransportDispatcher;
use std::sync::Arc;

use super::Repositories;

pub struct UseCases {
    pub submit_task: Arc<SubmitTaskUseCase>,
    pub get_task: Arc<GetTaskUseCase>,
    pub process_task: Arc<ProcessTaskUseCase>,
    pub cleanup_tasks: Arc<CleanupFinishedTasksUseCase>,
}

impl UseCases {
    pub fn new(
        repos: &Repositories,
        metrics: Arc<dyn MetricsRecorder>,
        config: &Config,
    ) -> anyhow::Result<Self> {
        let default_servers = config.default_servers()?;
        let engine = Arc::new(ResolutionEngine::new(
            Arc::new(TransportDispatcher::new()),
            metrics.clone(),
        ));

        Ok(Self {
            submit_task: Arc::new(
                SubmitTaskUseCase::new(repos.queue.clone())
                    .with_default_servers(default_servers.clone()),
            ),
            get_task: Arc::new(GetTaskUseCase::new(
                repos.queue.clone(),
                repos.store.clone(),
            )),
            process_task: Arc::new(
                ProcessTaskUseCase::new(
                    engine,
                    repos.queue.clone(),
                    repos.store.clone(),
                    metrics,
                    config.dns.query_options(),
                )
                .with_default_servers(default_servers)
                .with_task_deadline(config.worker.task_deadline())
                .with_lease_renewal(Some(config.worker.lease_renewal())),
            ),
            cleanup_tasks: Arc::new(CleanupFinishedTasksUseCase::new(
                repos.queue.clone(),
                repos.store.clone(),
            )),
        })
    }
}
