pub mod https;
pub mod quic;
pub mod tcp;
pub mod tls;
pub mod tls_config;
pub mod udp;

use async_trait::async_trait;
use dnstester_domain::{Scheme, Target, TransportError};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

/// Result of a raw DNS transport operation
#[derive(Debug)]
pub struct TransportResponse {
    /// Raw DNS response bytes (wire format)
    pub bytes: Vec<u8>,
    /// Which protocol was used
    pub protocol_used: &'static str,
}

/// Trait for sending raw DNS messages over the wire
#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;

    fn protocol_name(&self) -> &'static str;
}

/// Enum-dispatched transport, one variant per scheme.
pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
    Tls(tls::TlsTransport),
    Https(https::HttpsTransport),
    Quic(quic::QuicTransport),
}

impl Transport {
    /// Send a DNS query via the appropriate protocol (static dispatch).
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tls(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Https(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Quic(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    /// Protocol name for logging.
    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(t) => t.protocol_name(),
            Self::Tcp(t) => t.protocol_name(),
            Self::Tls(t) => t.protocol_name(),
            Self::Https(t) => t.protocol_name(),
            Self::Quic(t) => t.protocol_name(),
        }
    }
}

/// Create the transport for `target`, resolving its host when needed.
///
/// DoH leaves name resolution to the HTTP client.
pub async fn create_transport(
    target: &Target,
    tls_insecure: bool,
) -> Result<Transport, TransportError> {
    let server_name = target.host().to_string();

    Ok(match target.scheme() {
        Scheme::Https => Transport::Https(https::HttpsTransport::new(target.url(), tls_insecure)),
        Scheme::Udp => Transport::Udp(udp::UdpTransport::new(resolve_addr(target).await?)),
        Scheme::Tcp => Transport::Tcp(tcp::TcpTransport::new(resolve_addr(target).await?)),
        Scheme::Tls => Transport::Tls(tls::TlsTransport::new(
            resolve_addr(target).await?,
            server_name,
            tls_insecure,
        )),
        Scheme::Quic => Transport::Quic(quic::QuicTransport::new(
            resolve_addr(target).await?,
            server_name,
            tls_insecure,
        )),
    })
}

async fn resolve_addr(target: &Target) -> Result<SocketAddr, TransportError> {
    if let Some(ip) = target.ip() {
        return Ok(SocketAddr::new(ip, target.port()));
    }

    let mut addrs = tokio::net::lookup_host((target.host(), target.port()))
        .await
        .map_err(|e| TransportError::Unresolvable(format!("{}: {}", target.host(), e)))?;

    let addr = addrs
        .next()
        .ok_or_else(|| TransportError::Unresolvable(target.host().to_string()))?;

    debug!(host = %target.host(), addr = %addr, "Server host resolved");
    Ok(addr)
}
