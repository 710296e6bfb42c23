use async_trait::async_trait;
use dnstester_domain::{Rcode, RecordType, Target, TransportError};
use std::time::Duration;

/// Executes exactly one query against one target.
///
/// Implementations must treat `timeout` as a hard bound on the whole call,
/// return `Ok` for any DNS response (whatever its rcode) and only apply
/// `tls_insecure` to the TLS based schemes.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    async fn execute(
        &self,
        target: &Target,
        domain: &str,
        qtype: RecordType,
        tls_insecure: bool,
        timeout: Duration,
    ) -> Result<Rcode, TransportError>;
}
