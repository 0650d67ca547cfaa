use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::device::DeviceProfile;

/// What one scan run learned about a single reachable host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRecord {
    pub address: Ipv4Addr,
    pub reachable: bool,
    /// Open port to banner text. Empty text when the service stayed silent.
    pub open_ports: BTreeMap<u16, String>,
    /// When discovery confirmed the host, not when its ports were scanned.
    pub discovered_at: DateTime<Utc>,
}

impl HostRecord {
    pub fn new(address: Ipv4Addr, discovered_at: DateTime<Utc>) -> Self {
        Self {
            address,
            reachable: true,
            open_ports: BTreeMap::new(),
            discovered_at,
        }
    }

    /// Marks `port` as open. Ports are never removed from a record.
    pub fn record_open(&mut self, port: u16, banner: Option<String>) {
        let banner = banner.unwrap_or_default();
        self.open_ports
            .entry(port)
            .and_modify(|existing| {
                if existing.is_empty() {
                    existing.clone_from(&banner);
                }
            })
            .or_insert(banner);
    }
}

/// An open port paired with the service it usually carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VulnerabilityFinding {
    pub address: Ipv4Addr,
    pub port: u16,
    pub service_label: String,
    /// Why the service deserves attention, when the lookup table knows.
    pub risk: Option<String>,
    pub banner: String,
}

/// Everything gathered about one host during an assessment.
#[derive(Debug, Clone, Serialize)]
pub struct HostProfile {
    pub record: HostRecord,
    pub findings: Vec<VulnerabilityFinding>,
    pub device: DeviceProfile,
}

/// Result of a full discovery, scan and classification pass over a subnet.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkReport {
    pub subnet: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub hosts: BTreeMap<Ipv4Addr, HostProfile>,
}

impl NetworkReport {
    pub fn findings(&self) -> impl Iterator<Item = &VulnerabilityFinding> {
        self.hosts.values().flat_map(|host| host.findings.iter())
    }
}
