use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One IPv4 address bound to a local interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceAddress {
    pub interface: String,
    pub address: Ipv4Addr,
    pub prefix: u8,
    pub netmask: Ipv4Addr,
    /// Absent on loopback and point-to-point links.
    pub broadcast: Option<Ipv4Addr>,
    pub up: bool,
}

/// Bytes moved through all local interfaces during one sampling interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficSample {
    pub timestamp: DateTime<Utc>,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub upload_kib_s: f64,
    pub download_kib_s: f64,
}
