//! DNS Message Builder
//!
//! Constructs test queries in wire format using `hickory-proto`.

use super::record_type_map::RecordTypeMapper;
use dnstester_domain::{DomainError, RecordType};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive query with a random message id.
    ///
    /// Returns the id alongside the bytes so the reply can be matched.
    pub fn build_query(
        domain: &str,
        record_type: RecordType,
    ) -> Result<(u16, Vec<u8>), DomainError> {
        let id = fastrand::u16(..);
        let bytes = Self::build_query_with_id(domain, record_type, id)?;
        Ok((id, bytes))
    }

    /// Build a recursive query with a fixed message id.
    ///
    /// DNS over QUIC requires id 0 (RFC 9250 §4.2.1).
    pub fn build_query_with_id(
        domain: &str,
        record_type: RecordType,
        id: u16,
    ) -> Result<Vec<u8>, DomainError> {
        let name = Name::from_str(&Self::fqdn(domain)).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(DNSClass::IN);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        Self::serialize_message(&message)
    }

    /// Queries always go out fully qualified so no search list applies.
    fn fqdn(domain: &str) -> String {
        if domain.ends_with('.') {
            domain.to_string()
        } else {
            format!("{}.", domain)
        }
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::SerializationError(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
