use dnstester_domain::{
    DnsServer, DomainError, QueryOptions, ReportSummary, ResolutionRequest, TaskPayload,
    TaskStatus,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::ports::{Delivery, MetricsRecorder, ResultStore, TaskQueue};
use crate::use_cases::resolution::ResolutionEngine;

/// What happened to one delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Completed {
        task_id: String,
        summary: ReportSummary,
    },
    Failed {
        task_id: String,
        reason: String,
    },
}

/// Turns one queued task into one stored result.
///
/// Re-entrant per task id: a redelivered task is resolved again and its
/// stored result replaced.
pub struct ProcessTaskUseCase {
    engine: Arc<ResolutionEngine>,
    queue: Arc<dyn TaskQueue>,
    store: Arc<dyn ResultStore>,
    metrics: Arc<dyn MetricsRecorder>,
    options: QueryOptions,
    default_servers: Vec<DnsServer>,
    task_deadline: Option<Duration>,
    lease_renewal: Option<Duration>,
}

impl ProcessTaskUseCase {
    pub fn new(
        engine: Arc<ResolutionEngine>,
        queue: Arc<dyn TaskQueue>,
        store: Arc<dyn ResultStore>,
        metrics: Arc<dyn MetricsRecorder>,
        options: QueryOptions,
    ) -> Self {
        Self {
            engine,
            queue,
            store,
            metrics,
            options,
            default_servers: Vec::new(),
            task_deadline: None,
            lease_renewal: None,
        }
    }

    /// Servers used when a payload does not list any.
    pub fn with_default_servers(mut self, servers: Vec<DnsServer>) -> Self {
        self.default_servers = servers;
        self
    }

    /// Cancel resolution after `deadline` and store the partial report.
    pub fn with_task_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.task_deadline = deadline;
        self
    }

    /// Renew the delivery's lease every `every` while resolution runs.
    pub fn with_lease_renewal(mut self, every: Option<Duration>) -> Self {
        self.lease_renewal = every.filter(|d| !d.is_zero());
        self
    }

    /// Processes one delivery.
    ///
    /// Bad payloads end as `Failed` and are not retried. A failed result
    /// write hands the task back to the queue and returns the error.
    #[instrument(skip(self, delivery), fields(task_id = %delivery.task_id, attempt = delivery.attempt))]
    pub async fn execute(&self, delivery: Delivery) -> Result<TaskOutcome, DomainError> {
        let request = match self.decode(&delivery) {
            Ok(request) => request,
            Err(e) => return self.reject(&delivery, e).await,
        };

        let servers = if request.servers.is_empty() {
            &self.default_servers
        } else {
            &request.servers
        };
        if servers.is_empty() {
            warn!("Task lists no servers and none are configured");
        }

        let options = self.options.with_tls_insecure(request.tls_insecure);
        let started = Instant::now();
        let cancel = CancellationToken::new();
        let run = self
            .engine
            .run_queries(&cancel, &request.domain, request.qtype, servers, &options);
        tokio::pin!(run);

        let deadline = async {
            match self.task_deadline {
                Some(deadline) => tokio::time::sleep(deadline).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(deadline);
        let mut heartbeat = self.lease_renewal.map(|every| {
            let mut interval = tokio::time::interval_at(Instant::now() + every, every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        let report = loop {
            tokio::select! {
                report = &mut run => break report,
                _ = &mut deadline, if !cancel.is_cancelled() => {
                    warn!("Task deadline reached, canceling resolution");
                    cancel.cancel();
                }
                _ = tick(&mut heartbeat) => match self.queue.renew(&delivery).await {
                    Ok(()) => {}
                    Err(e @ DomainError::LeaseLost(_)) => {
                        warn!("Lease lost to another worker, abandoning task");
                        cancel.cancel();
                        return Err(e);
                    }
                    Err(e) => warn!(error = %e, "Failed to renew lease"),
                },
            }
        };

        if let Err(e) = self.store.put(&delivery.task_id, &report).await {
            error!(error = %e, "Failed to store task result");
            match self.queue.release(&delivery, &e.to_string()).await {
                Ok(TaskStatus::Failed) => self.metrics.record_task(TaskStatus::Failed),
                Ok(_) => {}
                Err(release_err) => {
                    error!(error = %release_err, "Failed to release task back to queue");
                }
            }
            return Err(e);
        }

        self.queue.complete(&delivery).await?;
        self.metrics.record_task(TaskStatus::Completed);

        let summary = report.summary();
        info!(
            domain = %request.domain,
            qtype = %request.qtype,
            results = summary.total,
            noerror = summary.noerror,
            failed = summary.failed,
            canceled = summary.canceled,
            duration_s = started.elapsed().as_secs_f64(),
            "Task completed"
        );

        Ok(TaskOutcome::Completed {
            task_id: delivery.task_id,
            summary,
        })
    }

    fn decode(&self, delivery: &Delivery) -> Result<ResolutionRequest, DomainError> {
        let payload = TaskPayload::decode(&delivery.payload)?;
        if payload.task_id != delivery.task_id {
            warn!(
                payload_task_id = %payload.task_id,
                "Payload task id differs from queue id, keying result by queue id"
            );
        }
        payload.validate()
    }

    async fn reject(
        &self,
        delivery: &Delivery,
        err: DomainError,
    ) -> Result<TaskOutcome, DomainError> {
        let reason = err.to_string();
        warn!(error = %reason, "Rejecting malformed task");

        self.queue.fail(delivery, &reason).await?;
        self.metrics.record_task(TaskStatus::Failed);

        Ok(TaskOutcome::Failed {
            task_id: delivery.task_id.clone(),
            reason,
        })
    }
}

async fn tick(heartbeat: &mut Option<Interval>) {
    match heartbeat {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
