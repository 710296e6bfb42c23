use dnstester_domain::{QueryResult, ResolutionReport};
use std::time::Duration;
use tracing::debug;

/// Folds per-target results into the report committed for a task.
pub struct ResultAggregator;

impl ResultAggregator {
    /// Keeps every entry in the order given, failed ones included.
    pub fn aggregate(results: Vec<QueryResult>, elapsed: Duration) -> ResolutionReport {
        let report = ResolutionReport {
            results,
            duration_seconds: elapsed.as_secs_f64(),
        };

        let summary = report.summary();
        debug!(
            total = summary.total,
            noerror = summary.noerror,
            dns_errors = summary.dns_errors,
            failed = summary.failed,
            canceled = summary.canceled,
            duration_s = report.duration_seconds,
            "Resolution report aggregated"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnstester_domain::{AttemptOutcome, Rcode, Target};

    fn result(server: &str, outcome: AttemptOutcome) -> QueryResult {
        let target: Target = server.parse().unwrap();
        QueryResult::from_outcome(
            target,
            &outcome,
            Duration::from_millis(10),
            1,
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_aggregate_preserves_order_and_failures() {
        let results = vec![
            result("192.0.2.1", AttemptOutcome::Timeout),
            result("192.0.2.2", AttemptOutcome::Success(Rcode::NoError)),
            result("192.0.2.3", AttemptOutcome::Canceled),
        ];

        let report = ResultAggregator::aggregate(results, Duration::from_millis(1500));

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results[0].server.host(), "192.0.2.1");
        assert_eq!(report.results[1].server.host(), "192.0.2.2");
        assert_eq!(report.results[2].server.host(), "192.0.2.3");
        assert!((report.duration_seconds - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_aggregate_empty() {
        let report = ResultAggregator::aggregate(Vec::new(), Duration::ZERO);
        assert!(report.results.is_empty());
        assert_eq!(report.duration_seconds, 0.0);
    }
}
