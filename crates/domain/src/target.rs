use crate::normalize::is_valid_hostname;
use crate::{DomainError, Scheme};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

const DOH_DEFAULT_PATH: &str = "/dns-query";

/// Canonical `scheme://host:port[/path]` descriptor of one DNS endpoint.
///
/// Only constructed through [`FromStr`] or [`Target::with_scheme`], so every
/// instance has a supported scheme, a valid host and a non-zero port.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    scheme: Scheme,
    host: String,
    port: u16,
    path: Option<String>,
}

impl Target {
    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Host parsed as an IP literal, if it is one.
    pub fn ip(&self) -> Option<IpAddr> {
        self.host.parse().ok()
    }

    /// Same host reached over another protocol.
    ///
    /// Keeps port and path when the scheme is unchanged, otherwise falls back
    /// to the new scheme's defaults.
    pub fn with_scheme(&self, scheme: Scheme) -> Target {
        if scheme == self.scheme {
            return self.clone();
        }
        Target {
            scheme,
            host: self.host.clone(),
            port: scheme.default_port(),
            path: (scheme == Scheme::Https).then(|| DOH_DEFAULT_PATH.to_string()),
        }
    }

    pub fn with_port(mut self, port: u16) -> Result<Target, DomainError> {
        if port == 0 {
            return Err(DomainError::InvalidTarget("port cannot be 0".to_string()));
        }
        self.port = port;
        Ok(self)
    }

    /// `host:port` form for socket APIs, IPv6 bracketed.
    pub fn authority(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Request URL for DNS-over-HTTPS targets.
    pub fn url(&self) -> String {
        format!(
            "https://{}{}",
            self.authority(),
            self.path.as_deref().unwrap_or(DOH_DEFAULT_PATH)
        )
    }
}

fn split_host_port(authority: &str) -> Result<(String, Option<&str>), DomainError> {
    if let Some(rest) = authority.strip_prefix('[') {
        let (host, after) = rest.split_once(']').ok_or_else(|| {
            DomainError::InvalidTarget(format!("unterminated IPv6 literal: {}", authority))
        })?;
        if host.parse::<Ipv6Addr>().is_err() {
            return Err(DomainError::InvalidTarget(format!(
                "bracketed host is not an IPv6 address: {}",
                host
            )));
        }
        let port = match after {
            "" => None,
            p => Some(p.strip_prefix(':').ok_or_else(|| {
                DomainError::InvalidTarget(format!("unexpected text after IPv6 literal: {}", p))
            })?),
        };
        return Ok((host.to_string(), port));
    }

    // Bare IPv6 literal without a port
    if authority.parse::<Ipv6Addr>().is_ok() {
        return Ok((authority.to_string(), None));
    }

    match authority.rsplit_once(':') {
        Some((host, port)) => Ok((host.to_string(), Some(port))),
        None => Ok((authority.to_string(), None)),
    }
}

impl FromStr for Target {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::InvalidTarget("empty target".to_string()));
        }
        if raw.chars().any(|c| c.is_control()) {
            return Err(DomainError::InvalidTarget(
                "target contains invalid control characters".to_string(),
            ));
        }

        let (scheme, rest) = match raw.split_once("://") {
            Some((scheme, rest)) => (Scheme::from_str(scheme)?, rest),
            None => (Scheme::Udp, raw),
        };

        let (authority, path) = match rest.find('/') {
            Some(idx) => (&rest[..idx], Some(&rest[idx..])),
            None => (rest, None),
        };

        if authority.is_empty() || authority.contains('@') {
            return Err(DomainError::InvalidTarget(format!(
                "target host cannot be empty or carry credentials: {}",
                raw
            )));
        }

        let (host, port) = split_host_port(authority)?;
        if host.is_empty() {
            return Err(DomainError::InvalidTarget(
                "target host cannot be empty".to_string(),
            ));
        }
        if host.parse::<IpAddr>().is_err() && !is_valid_hostname(&host) {
            return Err(DomainError::InvalidTarget(format!(
                "target host is not a valid domain name: {}",
                host
            )));
        }

        let port = match port {
            None => scheme.default_port(),
            Some(p) => match p.parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => {
                    return Err(DomainError::InvalidTarget(format!("invalid port: {}", p)));
                }
            },
        };

        let path = match (scheme, path) {
            (Scheme::Https, None) | (Scheme::Https, Some("")) => {
                Some(DOH_DEFAULT_PATH.to_string())
            }
            (Scheme::Https, Some(p)) => Some(p.to_string()),
            (_, None) | (_, Some("/")) => None,
            (_, Some(p)) => {
                return Err(DomainError::InvalidTarget(format!(
                    "path '{}' is only meaningful for https targets",
                    p
                )));
            }
        };

        Ok(Target {
            scheme,
            host: host.trim_end_matches('.').to_ascii_lowercase(),
            port,
            path,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority())?;
        if let Some(path) = &self.path {
            f.write_str(path)?;
        }
        Ok(())
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Target {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Target::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(raw: &str) -> String {
        raw.parse::<Target>().unwrap().to_string()
    }

    #[test]
    fn test_bare_address_defaults_to_udp() {
        assert_eq!(canonical("8.8.8.8"), "udp://8.8.8.8:53");
    }

    #[test]
    fn test_explicit_schemes_keep_port() {
        assert_eq!(canonical("udp://9.9.9.9:53"), "udp://9.9.9.9:53");
        assert_eq!(canonical("tcp://8.8.8.8:5353"), "tcp://8.8.8.8:5353");
        assert_eq!(canonical("tls://dns.quad9.net"), "tls://dns.quad9.net:853");
        assert_eq!(canonical("quic://dns.adguard.com"), "quic://dns.adguard.com:853");
    }

    #[test]
    fn test_https_gets_default_path() {
        assert_eq!(canonical("https://dns.google"), "https://dns.google:443/dns-query");
        assert_eq!(
            canonical("https://dns.google/resolve"),
            "https://dns.google:443/resolve"
        );
    }

    #[test]
    fn test_ipv6_forms() {
        assert_eq!(
            canonical("2001:4860:4860::8888"),
            "udp://[2001:4860:4860::8888]:53"
        );
        assert_eq!(
            canonical("[2001:4860:4860::8888]:853"),
            "udp://[2001:4860:4860::8888]:853"
        );
        let target: Target = "tls://[2606:4700:4700::1111]".parse().unwrap();
        assert_eq!(target.host(), "2606:4700:4700::1111");
        assert_eq!(target.port(), 853);
    }

    #[test]
    fn test_rejections() {
        assert!("".parse::<Target>().is_err());
        assert!("   ".parse::<Target>().is_err());
        assert!("ftp://example.com".parse::<Target>().is_err());
        assert!("http://invalid".parse::<Target>().is_err());
        assert!("udp://8.8.8.8:0".parse::<Target>().is_err());
        assert!("udp://8.8.8.8:99999".parse::<Target>().is_err());
        assert!("udp://bad host".parse::<Target>().is_err());
        assert!("udp://8.8\t.8.8".parse::<Target>().is_err());
        assert!("[::1".parse::<Target>().is_err());
        assert!("udp://user@8.8.8.8".parse::<Target>().is_err());
    }

    #[test]
    fn test_with_scheme_switches_defaults() {
        let target: Target = "udp://1.1.1.1:5300".parse().unwrap();
        assert_eq!(target.with_scheme(Scheme::Udp).port(), 5300);

        let doh = target.with_scheme(Scheme::Https);
        assert_eq!(doh.to_string(), "https://1.1.1.1:443/dns-query");
        assert_eq!(doh.url(), "https://1.1.1.1:443/dns-query");

        let dot = target.with_scheme(Scheme::Tls);
        assert_eq!(dot.port(), 853);
        assert_eq!(dot.path(), None);
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let target: Target = "https://dns.google".parse().unwrap();
        let json = serde_json::to_string(&target).unwrap();
        assert_eq!(json, "\"https://dns.google:443/dns-query\"");
        let back: Target = serde_json::from_str(&json).unwrap();
        assert_eq!(back, target);
    }
}
