#![allow(dead_code)]
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::task::JoinHandle;

/// How the mock answers each query.
#[derive(Debug, Clone, Copy)]
pub enum MockReply {
    /// Well-formed response carrying this rcode
    Rcode(u8),
    /// Read the query and never answer
    Silent,
    /// Valid response with a different message id
    WrongId,
    /// Bytes that are not a DNS message
    Garbage,
}

/// Loopback DNS server answering over UDP and TCP.
///
/// The two listeners use independent ephemeral ports.
pub struct MockDnsServer {
    udp_addr: SocketAddr,
    tcp_addr: SocketAddr,
    tasks: Vec<JoinHandle<()>>,
}

impl MockDnsServer {
    pub async fn start(reply: MockReply) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let udp_addr = socket.local_addr()?;
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let tcp_addr = listener.local_addr()?;

        let udp_task = tokio::spawn(async move {
            let mut buf = vec![0u8; 512];
            while let Ok((len, peer)) = socket.recv_from(&mut buf).await {
                if let Some(response) = Self::build_response(&buf[..len], reply) {
                    let _ = socket.send_to(&response, peer).await;
                }
            }
        });

        let tcp_task = tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut len_buf = [0u8; 2];
                    if stream.read_exact(&mut len_buf).await.is_err() {
                        return;
                    }
                    let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                    if stream.read_exact(&mut query).await.is_err() {
                        return;
                    }
                    match Self::build_response(&query, reply) {
                        Some(response) => {
                            let len = (response.len() as u16).to_be_bytes();
                            let _ = stream.write_all(&len).await;
                            let _ = stream.write_all(&response).await;
                        }
                        // Keep the connection open so the client has to time out
                        None => std::future::pending::<()>().await,
                    }
                });
            }
        });

        Ok(Self {
            udp_addr,
            tcp_addr,
            tasks: vec![udp_task, tcp_task],
        })
    }

    pub fn udp_addr(&self) -> SocketAddr {
        self.udp_addr
    }

    pub fn tcp_addr(&self) -> SocketAddr {
        self.tcp_addr
    }

    pub fn udp_target(&self) -> String {
        format!("udp://{}", self.udp_addr)
    }

    pub fn tcp_target(&self) -> String {
        format!("tcp://{}", self.tcp_addr)
    }

    /// Builds the reply for `query`, or `None` to stay silent.
    pub fn build_response(query: &[u8], reply: MockReply) -> Option<Vec<u8>> {
        if query.len() < 12 {
            return None;
        }

        let rcode = match reply {
            MockReply::Silent => return None,
            MockReply::Garbage => return Some(vec![0xde, 0xad, 0xbe, 0xef]),
            MockReply::Rcode(rcode) => rcode,
            MockReply::WrongId => 0,
        };

        let mut response = Vec::with_capacity(512);

        let id = u16::from_be_bytes([query[0], query[1]]);
        let id = match reply {
            MockReply::WrongId => id.wrapping_add(1),
            _ => id,
        };
        response.extend_from_slice(&id.to_be_bytes());

        // QR=1, RD=1 / RA=1, RCODE
        response.push(0x81);
        response.push(0x80 | (rcode & 0x0f));

        // Question count copied from the query
        response.extend_from_slice(&query[4..6]);

        // One A record on NOERROR, nothing otherwise
        let answers: u16 = if rcode == 0 { 1 } else { 0 };
        response.extend_from_slice(&answers.to_be_bytes());
        response.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        response.extend_from_slice(&query[12..]);

        if answers == 1 {
            response.extend_from_slice(&[
                0xc0, 0x0c, // Name pointer to question
                0x00, 0x01, // Type A
                0x00, 0x01, // Class IN
                0x00, 0x00, 0x00, 0x3c, // TTL: 60 seconds
                0x00, 0x04, // Data length: 4 bytes
                93, 184, 216, 34,
            ]);
        }

        Some(response)
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
