use dnstester_domain::{Rcode, TransportError};
use hickory_proto::op::Message;
use tracing::debug;

/// DNS header length in bytes.
const HEADER_LEN: usize = 12;

/// The parts of a reply the tester reports on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsResponse {
    pub id: u16,
    pub rcode: Rcode,
    pub truncated: bool,
    pub answer_count: usize,
}

pub struct ResponseParser;

impl ResponseParser {
    /// Parses a reply and checks it answers the query with `expected_id`.
    ///
    /// Anything that is not a well-formed response to that query is a
    /// `MalformedResponse` transport error, not a DNS result.
    pub fn parse(response_bytes: &[u8], expected_id: u16) -> Result<DnsResponse, TransportError> {
        if response_bytes.len() < HEADER_LEN {
            return Err(TransportError::MalformedResponse(format!(
                "response too short: {} bytes",
                response_bytes.len()
            )));
        }

        let id = u16::from_be_bytes([response_bytes[0], response_bytes[1]]);
        if id != expected_id {
            return Err(TransportError::MalformedResponse(format!(
                "message id mismatch: expected {}, got {}",
                expected_id, id
            )));
        }

        if response_bytes[2] & 0x80 == 0 {
            return Err(TransportError::MalformedResponse(
                "QR bit not set".to_string(),
            ));
        }

        let message = Message::from_vec(response_bytes).map_err(|e| {
            TransportError::MalformedResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let rcode = Rcode::from_u16(u16::from(message.response_code()));
        let truncated = message.truncated();
        let answer_count = message.answers().len();

        debug!(
            rcode = %rcode,
            answers = answer_count,
            truncated = truncated,
            "DNS response parsed"
        );

        Ok(DnsResponse {
            id,
            rcode,
            truncated,
            answer_count,
        })
    }
}
