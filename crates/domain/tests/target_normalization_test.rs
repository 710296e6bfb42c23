use dnstester_domain::{normalize_domain, normalize_qtype, RecordType, Scheme, Target};

// ============================================================================
// Target normalization table
// ============================================================================

#[test]
fn test_target_table() {
    let cases: Vec<(&str, &str, Option<&str>)> = vec![
        ("plain IPv4", "8.8.8.8", Some("udp://8.8.8.8:53")),
        ("udp explicit", "udp://9.9.9.9:53", Some("udp://9.9.9.9:53")),
        ("https default path", "https://dns.google", Some("https://dns.google:443/dns-query")),
        ("https with path", "https://dns.google/dns-query", Some("https://dns.google:443/dns-query")),
        ("quic default port", "quic://dns.adguard.com", Some("quic://dns.adguard.com:853")),
        ("ipv6 plain", "2001:4860:4860::8888", Some("udp://[2001:4860:4860::8888]:53")),
        ("ipv6 bracketed with port", "[2001:4860:4860::8888]:853", Some("udp://[2001:4860:4860::8888]:853")),
        ("tcp scheme", "tcp://8.8.8.8:53", Some("tcp://8.8.8.8:53")),
        ("tls with hostname", "tls://dns.quad9.net", Some("tls://dns.quad9.net:853")),
        ("uppercase scheme", "TLS://1.1.1.1", Some("tls://1.1.1.1:853")),
        ("unsupported scheme", "ftp://example.com", None),
        ("plain http", "http://invalid", None),
        ("empty input", "", None),
        ("control characters", "udp://8.8.8.8\r", None),
    ];

    for (name, input, expected) in cases {
        let got = input.parse::<Target>().map(|t| t.to_string());
        match expected {
            Some(want) => assert_eq!(got.as_deref(), Ok(want), "case: {}", name),
            None => assert!(got.is_err(), "case {} should fail, got {:?}", name, got),
        }
    }
}

#[test]
fn test_target_accessors() {
    let target: Target = "https://cloudflare-dns.com/dns-query".parse().unwrap();
    assert_eq!(target.scheme(), Scheme::Https);
    assert_eq!(target.host(), "cloudflare-dns.com");
    assert_eq!(target.port(), 443);
    assert_eq!(target.path(), Some("/dns-query"));
    assert!(target.ip().is_none());
    assert_eq!(target.scheme().display_name(), "DoH");
}

// ============================================================================
// Domain and query type normalization
// ============================================================================

#[test]
fn test_domain_normalization() {
    assert_eq!(normalize_domain("WWW.Example.COM.").unwrap(), "www.example.com");
    assert_eq!(normalize_domain("_dmarc.example.com").unwrap(), "_dmarc.example.com");
    assert!(normalize_domain("-bad.example.com").is_err());
    assert!(normalize_domain("bad\0.example.com").is_err());
}

#[test]
fn test_qtype_normalization() {
    assert_eq!(normalize_qtype("txt").unwrap(), RecordType::TXT);
    assert_eq!(normalize_qtype(" ptr ").unwrap(), RecordType::PTR);
    assert_eq!(normalize_qtype("").unwrap(), RecordType::A);
    assert!(normalize_qtype("A6X").is_err());
}
