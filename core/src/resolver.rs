//! Best-effort reverse name lookups.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait NameResolver: Send + Sync {
    /// Returns the PTR name of `address`, or `None` when nothing resolves.
    async fn reverse_lookup(&self, address: Ipv4Addr) -> Option<String>;
}

/// Uses the system resolver (`getnameinfo`) on a blocking worker thread.
#[derive(Debug, Clone)]
pub struct DnsResolver {
    timeout: Duration,
}

impl DnsResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl NameResolver for DnsResolver {
    async fn reverse_lookup(&self, address: Ipv4Addr) -> Option<String> {
        let ip = IpAddr::V4(address);
        let lookup = tokio::task::spawn_blocking(move || dns_lookup::lookup_addr(&ip).ok());

        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(Some(name))) => normalise_name(&name, ip),
            Ok(Ok(None)) => {
                debug!("No reverse name for {address}");
                None
            }
            Ok(Err(e)) => {
                debug!("Reverse lookup task for {address} failed: {e}");
                None
            }
            Err(_) => {
                debug!("Reverse lookup for {address} timed out");
                None
            }
        }
    }
}

/// Skips lookups entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResolver;

#[async_trait]
impl NameResolver for NoResolver {
    async fn reverse_lookup(&self, _address: Ipv4Addr) -> Option<String> {
        None
    }
}

// getnameinfo falls back to the numeric form when no PTR record exists.
fn normalise_name(name: &str, ip: IpAddr) -> Option<String> {
    let name = name.trim().trim_end_matches('.');
    if name.is_empty() || name.parse::<IpAddr>().is_ok_and(|parsed| parsed == ip) {
        return None;
    }
    Some(name.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_fallback_is_not_a_name() {
        let ip = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 9));
        assert_eq!(normalise_name("192.168.1.9", ip), None);
        assert_eq!(normalise_name("", ip), None);
        assert_eq!(
            normalise_name("HP-LaserJet.lan.", ip).as_deref(),
            Some("hp-laserjet.lan")
        );
    }

    #[tokio::test]
    async fn no_resolver_returns_nothing() {
        assert_eq!(NoResolver.reverse_lookup(Ipv4Addr::new(10, 0, 0, 1)).await, None);
    }
}
