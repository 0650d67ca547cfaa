//! # Host Discovery
//!
//! Finds the live addresses of an IPv4 block by trying a handful of common
//! TCP ports on every usable address. An address is live as soon as any of
//! its probes completes a handshake.
//!
//! All probes of one call share a single concurrency budget, so a /24 with
//! four probe ports never opens more than `concurrency` sockets at once.

use std::collections::BTreeSet;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use lanscope_common::network::range;
use lanscope_common::ScanError;
use pnet::ipnetwork::Ipv4Network;
use tracing::{debug, info, info_span, Instrument};

use crate::probe::{self, Prober};

pub struct HostDiscovery {
    prober: Arc<dyn Prober>,
}

impl HostDiscovery {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }

    /// Probes every usable address of `subnet` and returns those that answered.
    ///
    /// `subnet` is `a.b.c.d/n` or a bare base address (taken as its /24).
    /// Malformed input fails the whole call; individual probe failures never do.
    pub async fn discover(
        &self,
        subnet: &str,
        probe_ports: &[u16],
        timeout: Duration,
        concurrency: usize,
    ) -> Result<BTreeSet<Ipv4Addr>, ScanError> {
        let network = range::parse_subnet(subnet)?;
        self.discover_network(&network, probe_ports, timeout, concurrency)
            .await
    }

    pub async fn discover_network(
        &self,
        network: &Ipv4Network,
        probe_ports: &[u16],
        timeout: Duration,
        concurrency: usize,
    ) -> Result<BTreeSet<Ipv4Addr>, ScanError> {
        check_limits(probe_ports, concurrency)?;

        let hosts = range::usable_hosts(network);
        let ports: Vec<u16> = probe_ports.to_vec();
        let total = hosts.size() * ports.len();
        let span = info_span!("discovery", %network, probes = total);

        async move {
            info!("Probing {} address(es) on ports {:?}", hosts.size(), ports);

            let targets = hosts
                .to_iter()
                .flat_map(move |addr| ports.clone().into_iter().map(move |port| (addr, port)));

            let results =
                probe::probe_all(Arc::clone(&self.prober), targets, timeout, concurrency).await;

            let live: BTreeSet<Ipv4Addr> = results
                .into_iter()
                .filter(|result| result.reachable)
                .map(|result| {
                    debug!("{} answered on port {}", result.address, result.port);
                    result.address
                })
                .collect();

            info!("{} live host(s) found", live.len());
            Ok::<_, ScanError>(live)
        }
        .instrument(span)
        .await
    }
}

pub(crate) fn check_limits(ports: &[u16], concurrency: usize) -> Result<(), ScanError> {
    if concurrency == 0 {
        return Err(ScanError::InvalidConfig(
            "concurrency limit must be at least 1".into(),
        ));
    }
    if ports.is_empty() {
        return Err(ScanError::InvalidConfig("no ports to probe".into()));
    }
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::tests::{GaugeProber, TableProber};
    use std::sync::atomic::Ordering;

    const PROBE_PORTS: &[u16] = &[445, 80, 443, 22];

    #[tokio::test]
    async fn finds_exactly_the_hosts_that_accept() {
        let a = Ipv4Addr::new(192, 168, 1, 10);
        let b = Ipv4Addr::new(192, 168, 1, 20);
        let prober = Arc::new(TableProber::with_open(&[(a, 80, None), (b, 80, None)]));
        let discovery = HostDiscovery::new(prober.clone());

        let found = discovery
            .discover("192.168.1.0/24", PROBE_PORTS, Duration::from_secs(1), 64)
            .await
            .unwrap();

        assert_eq!(found, BTreeSet::from([a, b]));
        assert_eq!(prober.calls.load(Ordering::SeqCst), 254 * PROBE_PORTS.len());
    }

    #[tokio::test]
    async fn never_probes_network_or_broadcast() {
        let network = Ipv4Addr::new(10, 0, 0, 0);
        let broadcast = Ipv4Addr::new(10, 0, 0, 7);
        let host = Ipv4Addr::new(10, 0, 0, 3);
        let prober = Arc::new(TableProber::with_open(&[
            (network, 80, None),
            (broadcast, 80, None),
            (host, 22, None),
        ]));

        let found = HostDiscovery::new(prober)
            .discover("10.0.0.0/29", PROBE_PORTS, Duration::from_secs(1), 8)
            .await
            .unwrap();

        assert_eq!(found, BTreeSet::from([host]));
    }

    #[tokio::test]
    async fn single_address_block() {
        let host = Ipv4Addr::new(172, 16, 4, 4);
        let prober = Arc::new(TableProber::with_open(&[(host, 443, None)]));

        let found = HostDiscovery::new(prober)
            .discover("172.16.4.4/32", PROBE_PORTS, Duration::from_secs(1), 2)
            .await
            .unwrap();

        assert_eq!(found, BTreeSet::from([host]));
    }

    #[tokio::test]
    async fn concurrency_is_bounded_across_the_whole_block() {
        let gauge = Arc::new(GaugeProber::default());

        let found = HostDiscovery::new(gauge.clone())
            .discover("10.1.1.0/27", PROBE_PORTS, Duration::from_millis(50), 6)
            .await
            .unwrap();

        assert!(found.is_empty());
        assert!(gauge.peak.load(Ordering::SeqCst) <= 6);
    }

    #[tokio::test]
    async fn bad_input_fails_the_call() {
        let discovery = HostDiscovery::new(Arc::new(TableProber::default()));

        let err = discovery
            .discover("192.168.1.0/40", PROBE_PORTS, Duration::from_secs(1), 8)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidCidr { .. }));

        let err = discovery
            .discover("192.168.1.0/24", PROBE_PORTS, Duration::from_secs(1), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));

        let err = discovery
            .discover("192.168.1.0/24", &[], Duration::from_secs(1), 8)
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }
}
