use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Tcp,
    Udp,
}

/// Socket state as reported by the OS. UDP sockets have none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Established,
    Listen,
    Other(String),
    Stateless,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Established => f.write_str("ESTABLISHED"),
            ConnectionStatus::Listen => f.write_str("LISTEN"),
            ConnectionStatus::Other(state) => f.write_str(&state.to_ascii_uppercase()),
            ConnectionStatus::Stateless => f.write_str("NONE"),
        }
    }
}

/// One row of the OS connection table at the time it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionRecord {
    pub transport: Transport,
    pub local_addr: Ipv4Addr,
    pub local_port: u16,
    pub remote_addr: Option<Ipv4Addr>,
    pub remote_port: Option<u16>,
    pub status: ConnectionStatus,
    pub pid: Option<u32>,
}

impl ConnectionRecord {
    pub fn local_endpoint(&self) -> String {
        format!("{}:{}", self.local_addr, self.local_port)
    }

    pub fn remote_endpoint(&self) -> Option<String> {
        match (self.remote_addr, self.remote_port) {
            (Some(addr), Some(port)) => Some(format!("{addr}:{port}")),
            (Some(addr), None) => Some(addr.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Remote port above the high-port threshold.
    HighPort,
    /// Private-range peer outside the local network.
    UnusualIp,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::HighPort => f.write_str("high_port"),
            AlertKind::UnusualIp => f.write_str("unusual_ip"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub process: Option<String>,
    pub pid: Option<u32>,
    pub local: String,
    pub remote_addr: Ipv4Addr,
    pub remote_port: Option<u16>,
}

/// Passive view of one connection to a watched port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionSummary {
    pub process: Option<String>,
    pub local: String,
    pub remote: String,
    pub status: ConnectionStatus,
}

/// Established connections of a single process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessActivity {
    pub connections: usize,
    pub remote_addrs: BTreeSet<Ipv4Addr>,
    pub remote_ports: BTreeSet<u16>,
}
