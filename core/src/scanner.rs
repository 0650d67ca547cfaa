//! Per-host port and banner scanning.
//!
//! One probe per requested port, bounded by the caller's concurrency limit.
//! Open ports end up in the host's [`HostRecord`] together with whatever
//! greeting the service sent, and are then labelled through the static
//! [`services`] table.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use lanscope_common::ScanError;
use lanscope_common::models::{HostRecord, VulnerabilityFinding};
use tracing::{debug, info_span, Instrument};

use crate::discovery::check_limits;
use crate::probe::{self, Prober};

pub mod services;

pub struct PortScanner {
    prober: Arc<dyn Prober>,
}

impl PortScanner {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }

    /// Probes `ports` on `address` and records every one that accepted.
    ///
    /// There are no retries: a failed probe means the port is not listed.
    /// Without a prior discovery pass the host counts as discovered when this
    /// scan starts.
    pub async fn scan_host(
        &self,
        address: Ipv4Addr,
        ports: &[u16],
        timeout: Duration,
        concurrency: usize,
    ) -> Result<HostRecord, ScanError> {
        self.scan_discovered(HostRecord::new(address, Utc::now()), ports, timeout, concurrency)
            .await
    }

    /// Fills the open ports of a record created when discovery found its host.
    pub async fn scan_discovered(
        &self,
        mut record: HostRecord,
        ports: &[u16],
        timeout: Duration,
        concurrency: usize,
    ) -> Result<HostRecord, ScanError> {
        check_limits(ports, concurrency)?;

        let address = record.address;
        let span = info_span!("scan", %address, ports = ports.len());
        let targets: Vec<(Ipv4Addr, u16)> = ports.iter().map(|&port| (address, port)).collect();

        let results = probe::probe_all(Arc::clone(&self.prober), targets, timeout, concurrency)
            .instrument(span)
            .await;

        for result in results.into_iter().filter(|r| r.reachable) {
            debug!("{}:{} is open", address, result.port);
            record.record_open(result.port, result.banner);
        }
        Ok(record)
    }
}

/// One finding per open port, labelled through the service table.
///
/// Ports the table does not know are still reported, under
/// [`services::UNKNOWN_SERVICE`].
pub fn findings(record: &HostRecord) -> Vec<VulnerabilityFinding> {
    record
        .open_ports
        .iter()
        .map(|(&port, banner)| {
            let entry = services::lookup(port);
            VulnerabilityFinding {
                address: record.address,
                port,
                service_label: entry
                    .map(|e| e.label)
                    .unwrap_or(services::UNKNOWN_SERVICE)
                    .to_string(),
                risk: entry.map(|e| e.risk.to_string()),
                banner: banner.clone(),
            }
        })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
