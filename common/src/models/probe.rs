use std::net::Ipv4Addr;
use std::time::Duration;

use serde::Serialize;

/// Outcome of one TCP connection attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub address: Ipv4Addr,
    pub port: u16,
    pub reachable: bool,
    /// Text the service sent on its own right after the handshake.
    pub banner: Option<String>,
    /// Time spent until the handshake completed or the attempt gave up.
    pub latency: Duration,
}

impl ProbeResult {
    pub fn reachable(address: Ipv4Addr, port: u16, latency: Duration) -> Self {
        Self {
            address,
            port,
            reachable: true,
            banner: None,
            latency,
        }
    }

    pub fn unreachable(address: Ipv4Addr, port: u16, latency: Duration) -> Self {
        Self {
            address,
            port,
            reachable: false,
            banner: None,
            latency,
        }
    }

    pub fn with_banner(mut self, banner: Option<String>) -> Self {
        self.banner = banner;
        self
    }
}
