pub mod mock_metrics;
pub mod mock_transport;

pub use mock_metrics::{RecordedAttempt, RecordingMetrics};
pub use dnstester_test_support::{InMemoryResultStore, InMemoryTaskQueue};
pub use mock_transport::{Behavior, MockTransport};

use dnstester_domain::{DnsServer, ServerSpec};

/// Single-protocol servers from plain target strings.
pub fn servers(targets: &[&str]) -> Vec<DnsServer> {
    targets
        .iter()
        .map(|t| ServerSpec::new(*t).normalize().unwrap())
        .collect()
}
