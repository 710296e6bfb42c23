use async_trait::async_trait;
use dnstester_application::ports::QueryTransport;
use dnstester_domain::{Rcode, RecordType, Scheme, Target, TransportError};
use std::time::Duration;
use tracing::{debug, instrument};

use super::forwarding::{MessageBuilder, ResponseParser};
use super::transport::create_transport;

/// Sends one query to one target over the target's scheme.
///
/// Every exchange is bounded by `timeout` end to end, including host
/// resolution and handshakes.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransportDispatcher;

impl TransportDispatcher {
    pub fn new() -> Self {
        Self
    }

    async fn exchange(
        &self,
        target: &Target,
        domain: &str,
        qtype: RecordType,
        tls_insecure: bool,
        timeout: Duration,
    ) -> Result<Rcode, TransportError> {
        let id = match target.scheme() {
            Scheme::Quic => 0,
            _ => fastrand::u16(..),
        };
        let query = MessageBuilder::build_query_with_id(domain, qtype, id)
            .map_err(|e| TransportError::Io(e.to_string()))?;

        let transport = create_transport(target, tls_insecure).await?;
        let response = transport.send(&query, timeout).await?;
        let parsed = ResponseParser::parse(&response.bytes, id)?;

        debug!(
            server = %target,
            protocol = response.protocol_used,
            rcode = %parsed.rcode,
            truncated = parsed.truncated,
            "Exchange finished"
        );

        Ok(parsed.rcode)
    }
}

#[async_trait]
impl QueryTransport for TransportDispatcher {
    #[instrument(skip_all, fields(server = %target, domain = %domain, qtype = %qtype))]
    async fn execute(
        &self,
        target: &Target,
        domain: &str,
        qtype: RecordType,
        tls_insecure: bool,
        timeout: Duration,
    ) -> Result<Rcode, TransportError> {
        tokio::time::timeout(
            timeout,
            self.exchange(target, domain, qtype, tls_insecure, timeout),
        )
        .await
        .map_err(|_| TransportError::Timeout(timeout))?
    }
}
