use dnstester_domain::{AttemptOutcome, RecordType, Scheme, TaskStatus, Target};
use std::time::Duration;

/// One finished query attempt, as seen by metrics.
#[derive(Debug, Clone, Copy)]
pub struct AttemptRecord<'a> {
    pub server: &'a Target,
    pub protocol: Scheme,
    pub qtype: RecordType,
    pub outcome: &'a AttemptOutcome,
    pub latency: Duration,
}

/// Recording side of the metrics pipeline. Implementations must tolerate
/// concurrent calls without losing updates.
pub trait MetricsRecorder: Send + Sync {
    fn record_attempt(&self, record: &AttemptRecord<'_>);

    fn record_task(&self, status: TaskStatus);

    fn record_api_request(&self, _endpoint: &str) {}

    fn record_result_poll(&self) {}
}

/// Recorder for one-shot runs where nobody scrapes metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetricsRecorder;

impl MetricsRecorder for NoopMetricsRecorder {
    fn record_attempt(&self, _record: &AttemptRecord<'_>) {}

    fn record_task(&self, _status: TaskStatus) {}
}
