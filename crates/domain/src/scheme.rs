use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wire protocol used to reach a DNS server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Udp,
    Tcp,
    Tls,
    Https,
    Quic,
}

impl Scheme {
    pub const ALL: [Scheme; 5] = [
        Scheme::Udp,
        Scheme::Tcp,
        Scheme::Tls,
        Scheme::Https,
        Scheme::Quic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Udp => "udp",
            Self::Tcp => "tcp",
            Self::Tls => "tls",
            Self::Https => "https",
            Self::Quic => "quic",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Self::Udp | Self::Tcp => 53,
            Self::Tls | Self::Quic => 853,
            Self::Https => 443,
        }
    }

    /// Protocol family name shown in reports (Do53, DoT, DoH, DoQ).
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Udp | Self::Tcp => "Do53",
            Self::Tls => "DoT",
            Self::Https => "DoH",
            Self::Quic => "DoQ",
        }
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Tls | Self::Https | Self::Quic)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "udp" | "do53" => Ok(Self::Udp),
            "tcp" => Ok(Self::Tcp),
            "tls" | "dot" => Ok(Self::Tls),
            "https" | "doh" => Ok(Self::Https),
            "quic" | "doq" => Ok(Self::Quic),
            other => Err(DomainError::UnsupportedScheme(other.to_string())),
        }
    }
}
