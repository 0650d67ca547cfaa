use std::time::Duration;

use pnet::ipnetwork::Ipv4Network;

use crate::error::ScanError;

/// Ports tried against every address during discovery. SMB first, since
/// Windows hosts rarely answer anything else.
pub const DISCOVERY_PORTS: &[u16] = &[445, 80, 443, 22];

/// Ports probed on each discovered host.
pub const COMMON_SERVICE_PORTS: &[u16] = &[
    21, 22, 23, 25, 53, 80, 110, 139, 143, 443, 445, 515, 631, 1883, 3306, 3389, 5900, 8080,
    8443, 9100,
];

/// Remote ports whose live connections are summarised by the monitor.
pub const WATCH_PORTS: &[u16] = &[80, 443, 22, 3389];

pub const HIGH_PORT_THRESHOLD: u16 = 50_000;

/// Runtime settings shared by the scanners and the connection detector.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Per-probe connect timeout.
    pub timeout: Duration,
    /// How long an open port is given to volunteer a banner.
    pub banner_wait: Duration,
    /// Upper bound on banner bytes read per port.
    pub banner_limit: usize,
    pub discovery_ports: Vec<u16>,
    pub scan_ports: Vec<u16>,
    /// Maximum probes in flight for one discovery or scan call.
    pub concurrency: usize,
    /// Remote ports strictly above this raise a high-port alert.
    pub high_port_threshold: u16,
    /// Boundary of "our" network for the unusual-IP rule.
    ///
    /// `None` means the caller has to resolve it (usually from the primary
    /// interface) before running the detector.
    pub local_network: Option<Ipv4Network>,
    pub watch_ports: Vec<u16>,
    /// Disables reverse lookups during classification.
    pub no_dns: bool,
    pub dns_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(1),
            banner_wait: Duration::from_millis(500),
            banner_limit: 1024,
            discovery_ports: DISCOVERY_PORTS.to_vec(),
            scan_ports: COMMON_SERVICE_PORTS.to_vec(),
            concurrency: 64,
            high_port_threshold: HIGH_PORT_THRESHOLD,
            local_network: None,
            watch_ports: WATCH_PORTS.to_vec(),
            no_dns: false,
            dns_timeout: Duration::from_secs(2),
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.concurrency == 0 {
            return Err(ScanError::InvalidConfig(
                "concurrency limit must be at least 1".into(),
            ));
        }
        if self.discovery_ports.is_empty() {
            return Err(ScanError::InvalidConfig("no discovery ports given".into()));
        }
        if self.scan_ports.is_empty() {
            return Err(ScanError::InvalidConfig("no scan ports given".into()));
        }
        if self.timeout.is_zero() {
            return Err(ScanError::InvalidConfig("probe timeout must be non-zero".into()));
        }
        Ok(())
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
