use dashmap::DashSet;
use dnstester_application::ports::{AttemptRecord, MetricsRecorder};
use dnstester_domain::{AttemptOutcome, Rcode, TaskStatus};
use prometheus::{
    Encoder, GaugeVec, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

/// Metrics backed by a `prometheus::Registry` owned by this instance.
pub struct PrometheusMetricsRecorder {
    registry: Registry,
    lookup_total: IntCounterVec,
    lookup_duration: HistogramVec,
    lookup_errors: IntCounterVec,
    tasks_total: IntCounterVec,
    api_requests: IntCounterVec,
    result_polls: IntCounter,

    // Per-server families kept for existing dashboards
    response_time: HistogramVec,
    avg_response_time: GaugeVec,
    total_queries: IntCounterVec,
    noerror_count: IntCounterVec,
    failure_count: IntCounterVec,
    query_types: IntCounterVec,
    servers: DashSet<String>,
}

fn counter_vec(
    registry: &Registry,
    name: &str,
    help: &str,
    labels: &[&str],
) -> prometheus::Result<IntCounterVec> {
    let vec = IntCounterVec::new(Opts::new(name, help), labels)?;
    registry.register(Box::new(vec.clone()))?;
    Ok(vec)
}

fn histogram_vec(
    registry: &Registry,
    name: &str,
    help: &str,
    labels: &[&str],
) -> prometheus::Result<HistogramVec> {
    let vec = HistogramVec::new(HistogramOpts::new(name, help), labels)?;
    registry.register(Box::new(vec.clone()))?;
    Ok(vec)
}

impl PrometheusMetricsRecorder {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let lookup_total = counter_vec(
            &registry,
            "dns_lookup_total",
            "Total number of DNS lookups",
            &["server", "query_type", "result"],
        )?;
        let lookup_duration = histogram_vec(
            &registry,
            "dns_lookup_duration_seconds",
            "DNS lookup duration in seconds",
            &["server", "query_type"],
        )?;
        let lookup_errors = counter_vec(
            &registry,
            "dns_lookup_errors_total",
            "Total number of DNS lookup errors",
            &["server", "error_type"],
        )?;
        let tasks_total = counter_vec(
            &registry,
            "dns_tasks_total",
            "Total number of DNS tasks",
            &["status"],
        )?;
        let api_requests = counter_vec(
            &registry,
            "dns_api_requests_total",
            "Total number of API requests to submit DNS lookups",
            &["endpoint"],
        )?;
        let result_polls = IntCounter::new(
            "dns_api_result_polls_total",
            "Total number of times clients polled for task results",
        )?;
        registry.register(Box::new(result_polls.clone()))?;

        let response_time = histogram_vec(
            &registry,
            "dns_response_time_seconds",
            "Time taken for DNS resolution",
            &["server"],
        )?;
        let avg_response_time = GaugeVec::new(
            Opts::new("dns_avg_response_time_seconds", "Average DNS response time"),
            &["server"],
        )?;
        registry.register(Box::new(avg_response_time.clone()))?;
        let total_queries = counter_vec(
            &registry,
            "dns_total_queries",
            "Total number of DNS queries",
            &["server"],
        )?;
        let noerror_count = counter_vec(
            &registry,
            "dns_noerror_count",
            "Count of successful DNS resolutions (NoError)",
            &["server"],
        )?;
        let failure_count = counter_vec(
            &registry,
            "dns_failure_count",
            "Total number of failed DNS queries",
            &["server", "rcode"],
        )?;
        let query_types = counter_vec(
            &registry,
            "dns_query_types_count",
            "Total number of DNS queries per query type",
            &["qtype"],
        )?;

        Ok(Self {
            registry,
            lookup_total,
            lookup_duration,
            lookup_errors,
            tasks_total,
            api_requests,
            result_polls,
            response_time,
            avg_response_time,
            total_queries,
            noerror_count,
            failure_count,
            query_types,
            servers: DashSet::new(),
        })
    }

    pub fn lookup_count(&self, server: &str, qtype: &str, result: &str) -> u64 {
        self.lookup_total
            .with_label_values(&[server, qtype, result])
            .get()
    }

    pub fn error_count(&self, server: &str, error_type: &str) -> u64 {
        self.lookup_errors
            .with_label_values(&[server, error_type])
            .get()
    }

    pub fn task_count(&self, status: TaskStatus) -> u64 {
        self.tasks_total.with_label_values(&[status.as_str()]).get()
    }

    pub fn api_request_count(&self, endpoint: &str) -> u64 {
        self.api_requests.with_label_values(&[endpoint]).get()
    }

    pub fn result_poll_count(&self) -> u64 {
        self.result_polls.get()
    }

    pub fn response_count(&self, server: &str) -> u64 {
        self.response_time
            .with_label_values(&[server])
            .get_sample_count()
    }

    /// Mean of every latency observed for `server`, 0 when none.
    pub fn average_response_time(&self, server: &str) -> f64 {
        let histogram = self.response_time.with_label_values(&[server]);
        match histogram.get_sample_count() {
            0 => 0.0,
            count => histogram.get_sample_sum() / count as f64,
        }
    }

    /// Prometheus text exposition of every family that has samples.
    pub fn render(&self) -> prometheus::Result<String> {
        // Averages are derived from the histograms at scrape time
        for server in self.servers.iter() {
            self.avg_response_time
                .with_label_values(&[server.as_str()])
                .set(self.average_response_time(&server));
        }

        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl std::fmt::Debug for PrometheusMetricsRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetricsRecorder")
            .field("servers", &self.servers.len())
            .finish_non_exhaustive()
    }
}

impl MetricsRecorder for PrometheusMetricsRecorder {
    fn record_attempt(&self, record: &AttemptRecord<'_>) {
        let server = record.server.to_string();
        let qtype = record.qtype.as_str();
        let result = record.outcome.result_label();
        let latency = record.latency.as_secs_f64();

        self.lookup_total
            .with_label_values(&[server.as_str(), qtype, result.as_str()])
            .inc();
        self.lookup_duration
            .with_label_values(&[server.as_str(), qtype])
            .observe(latency);

        if !matches!(record.outcome, AttemptOutcome::Success(_)) {
            self.lookup_errors
                .with_label_values(&[server.as_str(), result.as_str()])
                .inc();
        }

        self.response_time
            .with_label_values(&[server.as_str()])
            .observe(latency);
        self.total_queries.with_label_values(&[server.as_str()]).inc();
        self.query_types.with_label_values(&[qtype]).inc();

        if matches!(record.outcome, AttemptOutcome::Success(Rcode::NoError)) {
            self.noerror_count.with_label_values(&[server.as_str()]).inc();
        } else {
            self.failure_count
                .with_label_values(&[server.as_str(), result.as_str()])
                .inc();
        }

        self.servers.insert(server);
    }

    fn record_task(&self, status: TaskStatus) {
        self.tasks_total.with_label_values(&[status.as_str()]).inc();
    }

    fn record_api_request(&self, endpoint: &str) {
        self.api_requests.with_label_values(&[endpoint]).inc();
    }

    fn record_result_poll(&self) {
        self.result_polls.inc();
    }
}
