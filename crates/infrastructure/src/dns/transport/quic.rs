use super::tls_config;
use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use dnstester_domain::TransportError;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tracing::debug;

/// DNS over QUIC (RFC 9250): one connection and one stream per query.
pub struct QuicTransport {
    server_addr: SocketAddr,
    server_name: String,
    insecure: bool,
}

impl QuicTransport {
    pub fn new(server_addr: SocketAddr, server_name: String, insecure: bool) -> Self {
        Self {
            server_addr,
            server_name,
            insecure,
        }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }

    async fn exchange(
        &self,
        endpoint: &quinn::Endpoint,
        message_bytes: &[u8],
    ) -> Result<Vec<u8>, TransportError> {
        let config = tls_config::quic_client_config(self.insecure)?;
        let connection = endpoint
            .connect_with(config, self.server_addr, &self.server_name)
            .map_err(|e| TransportError::Io(format!("QUIC connect: {}", e)))?
            .await
            .map_err(map_connection_error)?;

        debug!(
            server = %self.server_addr,
            server_name = %self.server_name,
            "QUIC connection established"
        );

        let (mut send, mut recv) = connection.open_bi().await.map_err(map_connection_error)?;

        let len = u16::try_from(message_bytes.len()).map_err(|_| {
            TransportError::Io(format!("query too large: {} bytes", message_bytes.len()))
        })?;
        let mut framed = Vec::with_capacity(message_bytes.len() + 2);
        framed.extend_from_slice(&len.to_be_bytes());
        framed.extend_from_slice(message_bytes);

        send.write_all(&framed)
            .await
            .map_err(|e| TransportError::Io(format!("QUIC write: {}", e)))?;
        // The query is complete once the send side is finished (RFC 9250 §4.2)
        let _ = send.finish();

        let mut len_buf = [0u8; 2];
        recv.read_exact(&mut len_buf)
            .await
            .map_err(|e| TransportError::Io(format!("QUIC read: {}", e)))?;
        let mut response = vec![0u8; u16::from_be_bytes(len_buf) as usize];
        recv.read_exact(&mut response)
            .await
            .map_err(|e| TransportError::Io(format!("QUIC read: {}", e)))?;

        connection.close(0u32.into(), b"");
        Ok(response)
    }
}

fn map_connection_error(e: quinn::ConnectionError) -> TransportError {
    match e {
        quinn::ConnectionError::TimedOut => TransportError::Timeout(Duration::ZERO),
        quinn::ConnectionError::TransportError(inner) => TransportError::Tls(inner.to_string()),
        other => TransportError::Io(other.to_string()),
    }
}

#[async_trait]
impl DnsTransport for QuicTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let endpoint = quinn::Endpoint::client(self.bind_addr()).map_err(TransportError::from_io)?;

        let result = tokio::time::timeout(timeout, self.exchange(&endpoint, message_bytes))
            .await
            .map_err(|_| TransportError::Timeout(timeout));
        endpoint.close(0u32.into(), b"");

        let bytes = result??;
        debug!(
            server = %self.server_addr,
            bytes_received = bytes.len(),
            "QUIC response received"
        );

        Ok(TransportResponse {
            bytes,
            protocol_used: "QUIC",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "QUIC"
    }
}
