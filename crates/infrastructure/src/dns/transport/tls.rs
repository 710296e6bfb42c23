use super::tcp::{connect, exchange_framed};
use super::tls_config;
use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use dnstester_domain::TransportError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// DNS over TLS (RFC 7858), one TLS session per query.
pub struct TlsTransport {
    server_addr: SocketAddr,
    server_name: String,
    insecure: bool,
}

impl TlsTransport {
    pub fn new(server_addr: SocketAddr, server_name: String, insecure: bool) -> Self {
        Self {
            server_addr,
            server_name,
            insecure,
        }
    }
}

#[async_trait]
impl DnsTransport for TlsTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let server_name = tls_config::server_name(&self.server_name)?;
        let connector = TlsConnector::from(tls_config::client_config(self.insecure));

        let tcp = connect(self.server_addr, timeout).await?;
        let mut stream = tokio::time::timeout(timeout, connector.connect(server_name, tcp))
            .await
            .map_err(|_| TransportError::Timeout(timeout))?
            .map_err(|e| TransportError::Tls(e.to_string()))?;

        debug!(
            server = %self.server_addr,
            server_name = %self.server_name,
            insecure = self.insecure,
            "TLS session established"
        );

        let bytes = exchange_framed(&mut stream, message_bytes, timeout).await?;

        Ok(TransportResponse {
            bytes,
            protocol_used: "TLS",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TLS"
    }
}
