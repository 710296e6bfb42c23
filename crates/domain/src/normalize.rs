//! Input normalization for domains, query types and host names.
//!
//! Everything that reaches the resolution engine has gone through these
//! functions first, so the engine never re-validates.

use crate::{DomainError, RecordType};
use std::net::IpAddr;
use std::str::FromStr;

const MAX_NAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

fn has_control_chars(s: &str) -> bool {
    s.chars().any(|c| c.is_control())
}

/// Lowercases, trims one trailing dot and validates a query name.
pub fn normalize_domain(raw: &str) -> Result<String, DomainError> {
    let lowered = raw.trim().to_lowercase();
    let normalized = lowered.strip_suffix('.').unwrap_or(&lowered);

    if normalized.is_empty() {
        return Err(DomainError::InvalidDomainName(
            "domain cannot be empty".to_string(),
        ));
    }

    if has_control_chars(normalized) || normalized.contains(' ') {
        return Err(DomainError::InvalidDomainName(format!(
            "domain contains invalid characters: {:?}",
            normalized
        )));
    }

    if !is_valid_hostname(normalized) {
        return Err(DomainError::InvalidDomainName(format!(
            "invalid domain format: {}",
            normalized
        )));
    }

    Ok(normalized.to_string())
}

/// Uppercases and validates a query type; empty input means `A`.
pub fn normalize_qtype(raw: &str) -> Result<RecordType, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(RecordType::A);
    }
    RecordType::from_str(trimmed)
}

/// RFC 1035 style host name check: dot separated labels of letters, digits,
/// hyphens and underscores. A single trailing dot is accepted.
pub fn is_valid_hostname(name: &str) -> bool {
    let name = name.strip_suffix('.').unwrap_or(name);
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return false;
    }

    name.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    })
}

/// Builds the `in-addr.arpa` / `ip6.arpa` name for a PTR lookup.
pub fn reverse_name(ip: IpAddr) -> String {
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            format!("{}.{}.{}.{}.in-addr.arpa", o[3], o[2], o[1], o[0])
        }
        IpAddr::V6(v6) => {
            let mut labels = Vec::with_capacity(34);
            for byte in v6.octets().iter().rev() {
                labels.push(format!("{:x}", byte & 0x0f));
                labels.push(format!("{:x}", byte >> 4));
            }
            labels.push("ip6".to_string());
            labels.push("arpa".to_string());
            labels.join(".")
        }
    }
}
