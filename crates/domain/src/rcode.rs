use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DNS response code of a completed query.
///
/// Serialized as its mnemonic (`"NOERROR"`, `"NXDOMAIN"`, ...). Codes without
/// a mnemonic render as `RCODE<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rcode {
    NoError,
    FormErr,
    ServFail,
    NXDomain,
    NotImp,
    Refused,
    YXDomain,
    YXRRSet,
    NXRRSet,
    NotAuth,
    NotZone,
    Other(u16),
}

impl Rcode {
    pub fn from_u16(code: u16) -> Self {
        match code {
            0 => Self::NoError,
            1 => Self::FormErr,
            2 => Self::ServFail,
            3 => Self::NXDomain,
            4 => Self::NotImp,
            5 => Self::Refused,
            6 => Self::YXDomain,
            7 => Self::YXRRSet,
            8 => Self::NXRRSet,
            9 => Self::NotAuth,
            10 => Self::NotZone,
            other => Self::Other(other),
        }
    }

    pub fn code(&self) -> u16 {
        match self {
            Self::NoError => 0,
            Self::FormErr => 1,
            Self::ServFail => 2,
            Self::NXDomain => 3,
            Self::NotImp => 4,
            Self::Refused => 5,
            Self::YXDomain => 6,
            Self::YXRRSet => 7,
            Self::NXRRSet => 8,
            Self::NotAuth => 9,
            Self::NotZone => 10,
            Self::Other(code) => *code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::NoError)
    }
}

impl fmt::Display for Rcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoError => f.write_str("NOERROR"),
            Self::FormErr => f.write_str("FORMERR"),
            Self::ServFail => f.write_str("SERVFAIL"),
            Self::NXDomain => f.write_str("NXDOMAIN"),
            Self::NotImp => f.write_str("NOTIMP"),
            Self::Refused => f.write_str("REFUSED"),
            Self::YXDomain => f.write_str("YXDOMAIN"),
            Self::YXRRSet => f.write_str("YXRRSET"),
            Self::NXRRSet => f.write_str("NXRRSET"),
            Self::NotAuth => f.write_str("NOTAUTH"),
            Self::NotZone => f.write_str("NOTZONE"),
            Self::Other(code) => write!(f, "RCODE{}", code),
        }
    }
}

impl FromStr for Rcode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let rcode = match upper.as_str() {
            "NOERROR" => Self::NoError,
            "FORMERR" => Self::FormErr,
            "SERVFAIL" => Self::ServFail,
            "NXDOMAIN" => Self::NXDomain,
            "NOTIMP" => Self::NotImp,
            "REFUSED" => Self::Refused,
            "YXDOMAIN" => Self::YXDomain,
            "YXRRSET" => Self::YXRRSet,
            "NXRRSET" => Self::NXRRSet,
            "NOTAUTH" => Self::NotAuth,
            "NOTZONE" => Self::NotZone,
            other => other
                .strip_prefix("RCODE")
                .and_then(|n| n.parse().ok())
                .map(Self::from_u16)
                .unwrap_or(Self::Other(u16::MAX)),
        };
        Ok(rcode)
    }
}

impl From<String> for Rcode {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(rcode) => rcode,
            Err(never) => match never {},
        }
    }
}

impl From<Rcode> for String {
    fn from(value: Rcode) -> Self {
        value.to_string()
    }
}
