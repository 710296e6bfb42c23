use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DNS query types accepted by the tester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[allow(clippy::upper_case_acronyms)]
pub enum RecordType {
    A,
    AAAA,
    ANY,
    CAA,
    CDNSKEY,
    CDS,
    CNAME,
    DNSKEY,
    DS,
    HINFO,
    HTTPS,
    MX,
    NAPTR,
    NS,
    NSEC,
    NSEC3,
    NULL,
    OPENPGPKEY,
    PTR,
    RRSIG,
    SOA,
    SRV,
    SSHFP,
    SVCB,
    TLSA,
    TXT,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AAAA => "AAAA",
            Self::ANY => "ANY",
            Self::CAA => "CAA",
            Self::CDNSKEY => "CDNSKEY",
            Self::CDS => "CDS",
            Self::CNAME => "CNAME",
            Self::DNSKEY => "DNSKEY",
            Self::DS => "DS",
            Self::HINFO => "HINFO",
            Self::HTTPS => "HTTPS",
            Self::MX => "MX",
            Self::NAPTR => "NAPTR",
            Self::NS => "NS",
            Self::NSEC => "NSEC",
            Self::NSEC3 => "NSEC3",
            Self::NULL => "NULL",
            Self::OPENPGPKEY => "OPENPGPKEY",
            Self::PTR => "PTR",
            Self::RRSIG => "RRSIG",
            Self::SOA => "SOA",
            Self::SRV => "SRV",
            Self::SSHFP => "SSHFP",
            Self::SVCB => "SVCB",
            Self::TLSA => "TLSA",
            Self::TXT => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let record_type = match upper.as_str() {
            "A" => Self::A,
            "AAAA" => Self::AAAA,
            "ANY" => Self::ANY,
            "CAA" => Self::CAA,
            "CDNSKEY" => Self::CDNSKEY,
            "CDS" => Self::CDS,
            "CNAME" => Self::CNAME,
            "DNSKEY" => Self::DNSKEY,
            "DS" => Self::DS,
            "HINFO" => Self::HINFO,
            "HTTPS" => Self::HTTPS,
            "MX" => Self::MX,
            "NAPTR" => Self::NAPTR,
            "NS" => Self::NS,
            "NSEC" => Self::NSEC,
            "NSEC3" => Self::NSEC3,
            "NULL" => Self::NULL,
            "OPENPGPKEY" => Self::OPENPGPKEY,
            "PTR" => Self::PTR,
            "RRSIG" => Self::RRSIG,
            "SOA" => Self::SOA,
            "SRV" => Self::SRV,
            "SSHFP" => Self::SSHFP,
            "SVCB" => Self::SVCB,
            "TLSA" => Self::TLSA,
            "TXT" => Self::TXT,
            _ => {
                return Err(DomainError::InvalidQueryType(format!(
                    "{} (must be a valid DNS record type)",
                    s
                )))
            }
        };
        Ok(record_type)
    }
}

impl TryFrom<String> for RecordType {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}
