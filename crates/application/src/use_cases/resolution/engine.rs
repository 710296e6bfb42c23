use dnstester_domain::{
    AttemptOutcome, DnsServer, QueryOptions, QueryResult, Rcode, RecordType, ResolutionReport,
    Target, TransportError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::ResultAggregator;
use crate::ports::{AttemptRecord, MetricsRecorder, QueryTransport};

/// Per-target retry state.
#[derive(Debug, Clone, PartialEq, Eq)]
enum TargetState {
    /// About to run attempt `n` (1-based)
    Attempting(u32),
    Succeeded(Rcode),
    /// Budget spent; holds the last failed outcome
    Exhausted(AttemptOutcome),
    Canceled,
}

/// Shared by every target task of one run.
struct RunContext {
    transport: Arc<dyn QueryTransport>,
    metrics: Arc<dyn MetricsRecorder>,
    limiter: Semaphore,
    cancel: CancellationToken,
    domain: String,
    qtype: RecordType,
    options: QueryOptions,
}

/// Fans one query out to every target under a global in-flight bound.
pub struct ResolutionEngine {
    transport: Arc<dyn QueryTransport>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl ResolutionEngine {
    pub fn new(transport: Arc<dyn QueryTransport>, metrics: Arc<dyn MetricsRecorder>) -> Self {
        Self { transport, metrics }
    }

    /// Runs `qtype` for `domain` against every target of `servers`.
    ///
    /// `domain` and `qtype` must already be normalized. Results come back in
    /// input order, one per target. Cancelling `cancel` stops pending and
    /// in-flight attempts; targets that did not finish report `canceled`.
    #[instrument(skip(self, cancel, servers, options), fields(servers = servers.len()))]
    pub async fn run_queries(
        &self,
        cancel: &CancellationToken,
        domain: &str,
        qtype: RecordType,
        servers: &[DnsServer],
        options: &QueryOptions,
    ) -> ResolutionReport {
        let started = Instant::now();
        let targets: Vec<Target> = servers.iter().flat_map(DnsServer::targets).collect();
        if targets.is_empty() {
            return ResolutionReport::empty();
        }

        let permits = options.max_concurrency.clamp(1, Semaphore::MAX_PERMITS);
        let ctx = Arc::new(RunContext {
            transport: Arc::clone(&self.transport),
            metrics: Arc::clone(&self.metrics),
            limiter: Semaphore::new(permits),
            cancel: cancel.child_token(),
            domain: domain.to_string(),
            qtype,
            options: *options,
        });
        // Stops the spawned targets if this future is dropped mid-run.
        let _guard = ctx.cancel.clone().drop_guard();

        // Handles stay in input order; completion order does not matter.
        let handles: Vec<_> = targets
            .iter()
            .cloned()
            .map(|target| {
                let ctx = Arc::clone(&ctx);
                tokio::spawn(async move { ctx.resolve_target(target).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (handle, target) in handles.into_iter().zip(targets) {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    warn!(server = %target, error = %e, "Target task aborted");
                    QueryResult::from_outcome(
                        target,
                        &AttemptOutcome::TransportError(TransportError::Io(e.to_string())),
                        Duration::ZERO,
                        0,
                        options.timeout,
                    )
                }
            };
            results.push(result);
        }

        ResultAggregator::aggregate(results, started.elapsed())
    }
}

impl RunContext {
    async fn resolve_target(&self, target: Target) -> QueryResult {
        let max_attempts = self.options.max_attempts();
        let mut state = TargetState::Attempting(1);
        let mut attempts_used = 0;
        let mut last_latency = Duration::ZERO;

        loop {
            state = match state {
                TargetState::Attempting(n) => match self.attempt(&target).await {
                    None => TargetState::Canceled,
                    Some((outcome, latency)) => {
                        attempts_used = n;
                        last_latency = latency;
                        self.record(&target, &outcome, latency);

                        debug!(
                            server = %target,
                            attempt = n,
                            result = %outcome.result_label(),
                            latency_ms = latency.as_millis() as u64,
                            "Query attempt finished"
                        );

                        match outcome {
                            AttemptOutcome::Success(rcode) => TargetState::Succeeded(rcode),
                            AttemptOutcome::Canceled => TargetState::Canceled,
                            failed if failed.is_retryable() && n < max_attempts => {
                                TargetState::Attempting(n + 1)
                            }
                            failed => TargetState::Exhausted(failed),
                        }
                    }
                },
                TargetState::Succeeded(rcode) => {
                    return QueryResult::from_outcome(
                        target,
                        &AttemptOutcome::Success(rcode),
                        last_latency,
                        attempts_used,
                        self.options.timeout,
                    );
                }
                TargetState::Exhausted(outcome) => {
                    return QueryResult::from_outcome(
                        target,
                        &outcome,
                        last_latency,
                        attempts_used,
                        self.options.timeout,
                    );
                }
                TargetState::Canceled => {
                    return QueryResult::canceled(target, attempts_used, last_latency);
                }
            };
        }
    }

    /// One bounded attempt. `None` means the run was cancelled before the
    /// attempt could finish.
    async fn attempt(&self, target: &Target) -> Option<(AttemptOutcome, Duration)> {
        let _permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return None,
            permit = self.limiter.acquire() => permit.ok()?,
        };

        let started = Instant::now();
        let call = self.transport.execute(
            target,
            &self.domain,
            self.qtype,
            self.options.tls_insecure,
            self.options.timeout,
        );

        let outcome = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return None,
            result = tokio::time::timeout(self.options.timeout, call) => match result {
                Ok(result) => AttemptOutcome::from_transport(result),
                Err(_) => AttemptOutcome::Timeout,
            },
        };

        Some((outcome, started.elapsed()))
    }

    fn record(&self, target: &Target, outcome: &AttemptOutcome, latency: Duration) {
        self.metrics.record_attempt(&AttemptRecord {
            server: target,
            protocol: target.scheme(),
            qtype: self.qtype,
            outcome,
            latency,
        });
    }
}
