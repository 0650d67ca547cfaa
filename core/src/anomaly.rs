//! # Connection Anomaly Detection
//!
//! Reads one snapshot of this machine's connection table per call and flags
//! two patterns:
//!
//! * **high port**: the remote port is above the configured threshold.
//! * **unusual IP**: the peer is in `10.0.0.0/8` or `192.168.0.0/16` but not
//!   inside the local network.
//!
//! The table and the process list are read through [`ConnectionSource`] and
//! [`ProcessLookup`], with [`system`] providing the OS-backed versions.

use std::collections::{BTreeMap, HashMap};

use lanscope_common::ScanError;
use lanscope_common::config::HIGH_PORT_THRESHOLD;
use lanscope_common::models::{
    Alert, AlertKind, ConnectionRecord, ConnectionStatus, ConnectionSummary, ProcessActivity,
};
use lanscope_common::network::range::is_watched_private;
use pnet::ipnetwork::Ipv4Network;
use tracing::{debug, info};

pub mod system;

/// Supplies a fresh copy of the connection table.
pub trait ConnectionSource: Send + Sync {
    fn connections(&self) -> Result<Vec<ConnectionRecord>, ScanError>;
}

/// Maps process ids to names, read after the connection snapshot.
pub trait ProcessLookup: Send + Sync {
    fn process_names(&self) -> HashMap<u32, String>;
}

pub struct AnomalyDetector {
    source: Box<dyn ConnectionSource>,
    processes: Box<dyn ProcessLookup>,
    local_network: Option<Ipv4Network>,
    high_port_threshold: u16,
}

struct Snapshot {
    connections: Vec<ConnectionRecord>,
    names: HashMap<u32, String>,
}

impl Snapshot {
    fn process_of(&self, conn: &ConnectionRecord) -> Option<String> {
        conn.pid.and_then(|pid| self.names.get(&pid).cloned())
    }
}

impl AnomalyDetector {
    /// Detector without a local boundary. Port monitoring and process
    /// activity work as is; [`detect`](Self::detect) needs
    /// [`with_local_network`](Self::with_local_network) first.
    pub fn new(source: Box<dyn ConnectionSource>, processes: Box<dyn ProcessLookup>) -> Self {
        Self {
            source,
            processes,
            local_network: None,
            high_port_threshold: HIGH_PORT_THRESHOLD,
        }
    }

    /// Detector over the live OS tables.
    pub fn system() -> Self {
        Self::new(
            Box::new(system::SystemConnections),
            Box::new(system::SystemProcesses),
        )
    }

    /// Network treated as local by the unusual-IP rule.
    pub fn with_local_network(mut self, local_network: Ipv4Network) -> Self {
        self.local_network = Some(local_network);
        self
    }

    pub fn with_high_port_threshold(mut self, threshold: u16) -> Self {
        self.high_port_threshold = threshold;
        self
    }

    fn snapshot(&self) -> Result<Snapshot, ScanError> {
        let connections = self.source.connections()?;
        let names = self.processes.process_names();
        debug!(
            "Read {} connection(s) and {} process name(s)",
            connections.len(),
            names.len()
        );
        Ok(Snapshot { connections, names })
    }

    /// Builds a fresh alert list from the current table.
    ///
    /// High-port alerts need a resolvable process and skip connections whose
    /// owner cannot be named. Unusual-IP alerts are raised either way, with
    /// the process left empty when unknown.
    pub fn detect(&self) -> Result<Vec<Alert>, ScanError> {
        let local_network = self.local_network.ok_or_else(|| {
            ScanError::NoLocalNetwork("no local network set for the unusual-IP rule".into())
        })?;
        let snapshot = self.snapshot()?;
        let mut alerts: Vec<Alert> = Vec::new();

        for conn in &snapshot.connections {
            let Some(remote_addr) = conn.remote_addr else {
                continue;
            };
            let process = snapshot.process_of(conn);

            if conn.remote_port.is_some_and(|port| port > self.high_port_threshold) {
                match &process {
                    Some(name) => alerts.push(alert(AlertKind::HighPort, conn, Some(name.clone()))),
                    None => debug!(
                        "Skipping high-port connection to {remote_addr}: owner not resolvable"
                    ),
                }
            }

            if is_watched_private(remote_addr) && !local_network.contains(remote_addr) {
                alerts.push(alert(AlertKind::UnusualIp, conn, process));
            }
        }

        info!("{} alert(s) raised", alerts.len());
        Ok(alerts)
    }

    /// Groups connections whose remote port is in `watch_list`.
    ///
    /// Every watched port gets an entry, empty when nothing is connected.
    pub fn monitor_ports(
        &self,
        watch_list: &[u16],
    ) -> Result<BTreeMap<u16, Vec<ConnectionSummary>>, ScanError> {
        let snapshot = self.snapshot()?;
        let mut activity: BTreeMap<u16, Vec<ConnectionSummary>> =
            watch_list.iter().map(|&port| (port, Vec::new())).collect();

        for conn in &snapshot.connections {
            let (Some(port), Some(remote)) = (conn.remote_port, conn.remote_endpoint()) else {
                continue;
            };
            if let Some(bucket) = activity.get_mut(&port) {
                bucket.push(ConnectionSummary {
                    process: snapshot.process_of(conn),
                    local: conn.local_endpoint(),
                    remote,
                    status: conn.status.clone(),
                });
            }
        }

        Ok(activity)
    }

    /// Established connections aggregated per owning process.
    pub fn process_activity(&self) -> Result<BTreeMap<String, ProcessActivity>, ScanError> {
        let snapshot = self.snapshot()?;
        let mut by_process: BTreeMap<String, ProcessActivity> = BTreeMap::new();

        for conn in &snapshot.connections {
            if conn.status != ConnectionStatus::Established {
                continue;
            }
            let Some(name) = snapshot.process_of(conn) else {
                continue;
            };

            let entry = by_process.entry(name).or_default();
            entry.connections += 1;
            if let Some(addr) = conn.remote_addr {
                entry.remote_addrs.insert(addr);
            }
            if let Some(port) = conn.remote_port {
                entry.remote_ports.insert(port);
            }
        }

        Ok(by_process)
    }
}

fn alert(kind: AlertKind, conn: &ConnectionRecord, process: Option<String>) -> Alert {
    Alert {
        kind,
        process,
        pid: conn.pid,
        local: conn.local_endpoint(),
        remote_addr: conn.remote_addr.unwrap_or(conn.local_addr),
        remote_port: conn.remote_port,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
