//! Splits free-form host identifiers into DNS names and IP addresses for the SAN extension.

use std::net::IpAddr;

use crate::cert::extensions::SubjectAltName;

/// Classifies each identifier as an IPv4 address, an IPv6 address, or a DNS name.
///
/// Anything that parses as an IP address becomes one, with IPv4-mapped IPv6 addresses
/// narrowed to their 4-byte IPv4 form. Everything else is taken as a DNS name without
/// further validation. Order is preserved within each group and duplicates are kept.
pub fn classify_hosts<I, S>(hosts: I) -> SubjectAltName
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut san = SubjectAltName::default();
    for host in hosts {
        let host = host.as_ref();
        match host.parse::<IpAddr>() {
            Ok(IpAddr::V6(v6)) => match v6.to_ipv4_mapped() {
                Some(v4) => san.ip_addresses.push(IpAddr::V4(v4)),
                None => san.ip_addresses.push(IpAddr::V6(v6)),
            },
            Ok(ip) => san.ip_addresses.push(ip),
            Err(_) => san.dns_names.push(host.to_string()),
        }
    }
    san
}
