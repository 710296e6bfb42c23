use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use dnstester_domain::TransportError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// DNS over TCP (RFC 7766), one connection per query.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }
}

/// Opens a TCP connection with a bounded wait.
pub(crate) async fn connect(addr: SocketAddr, timeout: Duration) -> Result<TcpStream, TransportError> {
    let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| TransportError::Timeout(timeout))?
        .map_err(TransportError::from_io)?;
    let _ = stream.set_nodelay(true);
    Ok(stream)
}

/// Writes one length-prefixed message and reads one length-prefixed reply.
///
/// Shared by TCP and DoT, which use the same 2-byte framing.
pub(crate) async fn exchange_framed<S>(
    stream: &mut S,
    message_bytes: &[u8],
    timeout: Duration,
) -> Result<Vec<u8>, TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let len = u16::try_from(message_bytes.len()).map_err(|_| {
        TransportError::Io(format!("query too large: {} bytes", message_bytes.len()))
    })?;

    let mut framed = Vec::with_capacity(message_bytes.len() + 2);
    framed.extend_from_slice(&len.to_be_bytes());
    framed.extend_from_slice(message_bytes);

    tokio::time::timeout(timeout, async {
        stream.write_all(&framed).await?;
        stream.flush().await?;

        let mut len_buf = [0u8; 2];
        stream.read_exact(&mut len_buf).await?;
        let response_len = u16::from_be_bytes(len_buf) as usize;

        let mut response = vec![0u8; response_len];
        stream.read_exact(&mut response).await?;
        Ok::<Vec<u8>, std::io::Error>(response)
    })
    .await
    .map_err(|_| TransportError::Timeout(timeout))?
    .map_err(TransportError::from_io)
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        let mut stream = connect(self.server_addr, timeout).await?;
        let bytes = exchange_framed(&mut stream, message_bytes, timeout).await?;

        debug!(
            server = %self.server_addr,
            bytes_received = bytes.len(),
            "TCP response received"
        );

        Ok(TransportResponse {
            bytes,
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}
