use crate::{DomainError, Scheme, Target};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Server entry as it appears in task payloads and the config file.
///
/// `ip` accepts anything the target normalizer accepts: a bare address, a
/// host name or a full `scheme://host:port` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSpec {
    pub ip: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub protocols: Vec<String>,
}

impl ServerSpec {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            port: None,
            tags: Vec::new(),
            protocols: Vec::new(),
        }
    }

    pub fn normalize(&self) -> Result<DnsServer, DomainError> {
        let mut target = Target::from_str(&self.ip)?;
        if let Some(port) = self.port {
            target = target.with_port(port)?;
        }

        let mut protocols = Vec::with_capacity(self.protocols.len());
        for raw in &self.protocols {
            let scheme = Scheme::from_str(raw)?;
            if !protocols.contains(&scheme) {
                protocols.push(scheme);
            }
        }

        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        Ok(DnsServer {
            target,
            tags,
            protocols,
        })
    }
}

impl From<&DnsServer> for ServerSpec {
    fn from(server: &DnsServer) -> Self {
        Self {
            ip: server.target.to_string(),
            port: None,
            tags: server.tags.clone(),
            protocols: server
                .protocols
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
        }
    }
}

/// A validated server with the protocols it should be queried over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsServer {
    pub target: Target,
    pub tags: Vec<String>,
    pub protocols: Vec<Scheme>,
}

impl DnsServer {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            tags: Vec::new(),
            protocols: Vec::new(),
        }
    }

    pub fn with_protocols(mut self, protocols: Vec<Scheme>) -> Self {
        self.protocols.clear();
        for scheme in protocols {
            if !self.protocols.contains(&scheme) {
                self.protocols.push(scheme);
            }
        }
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// One target per declared protocol, in declaration order.
    /// Without declared protocols the server is queried over its own scheme.
    pub fn targets(&self) -> Vec<Target> {
        if self.protocols.is_empty() {
            return vec![self.target.clone()];
        }
        self.protocols
            .iter()
            .map(|scheme| self.target.with_scheme(*scheme))
            .collect()
    }
}

impl FromStr for DnsServer {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(Target::from_str(s)?))
    }
}
