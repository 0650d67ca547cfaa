//! # Network Assessment
//!
//! Chains the engines into one pass over a subnet: discovery first, then a
//! port scan of every live host, then findings and a device profile per host.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Arc;

use chrono::Utc;
use lanscope_common::ScanConfig;
use lanscope_common::ScanError;
use lanscope_common::models::{HostProfile, HostRecord, NetworkReport};
use lanscope_common::network::range;
use tracing::{info, info_span, Instrument};

use crate::discovery::HostDiscovery;
use crate::fingerprint::DeviceClassifier;
use crate::probe::{Prober, TcpProber};
use crate::resolver::{DnsResolver, NameResolver, NoResolver};
use crate::scanner::{self, PortScanner};

pub struct Assessment {
    config: ScanConfig,
    discovery: HostDiscovery,
    scanner: PortScanner,
    classifier: DeviceClassifier,
}

impl Assessment {
    /// Assessment wired to real TCP probes and the system resolver.
    pub fn new(config: ScanConfig) -> Self {
        let resolver: Arc<dyn NameResolver> = if config.no_dns {
            Arc::new(NoResolver)
        } else {
            Arc::new(DnsResolver::new(config.dns_timeout))
        };
        let discovery_prober: Arc<dyn Prober> = Arc::new(TcpProber::handshake());
        let scan_prober: Arc<dyn Prober> = Arc::new(TcpProber::with_banner(
            config.banner_wait,
            config.banner_limit,
        ));
        Self::with_components(config, discovery_prober, scan_prober, resolver)
    }

    pub fn with_components(
        config: ScanConfig,
        discovery_prober: Arc<dyn Prober>,
        scan_prober: Arc<dyn Prober>,
        resolver: Arc<dyn NameResolver>,
    ) -> Self {
        Self {
            config,
            discovery: HostDiscovery::new(discovery_prober),
            scanner: PortScanner::new(scan_prober),
            classifier: DeviceClassifier::new(resolver),
        }
    }

    /// Runs discovery, scanning and classification over `subnet`.
    ///
    /// Fails only on invalid input or configuration; once hosts are known,
    /// per-host work always produces a profile.
    pub async fn run(&self, subnet: &str) -> Result<NetworkReport, ScanError> {
        self.config.validate()?;
        let network = range::parse_subnet(subnet)?;
        let started_at = Utc::now();
        let span = info_span!("assessment", %network);

        async move {
            let cfg = &self.config;
            let live = self
                .discovery
                .discover_network(&network, &cfg.discovery_ports, cfg.timeout, cfg.concurrency)
                .await?;

            let discovered_at = Utc::now();

            let mut hosts: BTreeMap<Ipv4Addr, HostProfile> = BTreeMap::new();
            for address in live {
                let record = HostRecord::new(address, discovered_at);
                let profile = self.profile_record(record).await?;
                hosts.insert(address, profile);
            }

            info!("Assessment of {network} finished with {} host(s)", hosts.len());
            Ok::<_, ScanError>(NetworkReport {
                subnet: network.to_string(),
                started_at,
                finished_at: Utc::now(),
                hosts,
            })
        }
        .instrument(span)
        .await
    }

    /// Scans, labels and classifies one discovered host.
    async fn profile_record(&self, record: HostRecord) -> Result<HostProfile, ScanError> {
        let cfg = &self.config;
        let record = self
            .scanner
            .scan_discovered(record, &cfg.scan_ports, cfg.timeout, cfg.concurrency)
            .await?;
        let findings = scanner::findings(&record);
        let device = self.classifier.classify(record.address, &record.open_ports).await;

        Ok(HostProfile {
            record,
            findings,
            device,
        })
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
