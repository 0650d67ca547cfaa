use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use lanscope_common::ScanError;
use lanscope_core::probe::Prober;
use lanscope_core::{HostDiscovery, TcpProber};

use crate::utils::{LOOPBACK, PROBE_TIMEOUT, closed_port, spawn_service};

#[tokio::test]
async fn handshake_probe_reports_open_and_refused_ports() {
    let open = spawn_service("").await;
    let closed = closed_port().await;
    let prober = TcpProber::handshake();

    let hit = prober.probe(LOOPBACK, open, PROBE_TIMEOUT).await;
    assert!(hit.reachable);
    assert_eq!(hit.banner, None);

    let miss = prober.probe(LOOPBACK, closed, PROBE_TIMEOUT).await;
    assert!(!miss.reachable, "a refused connection is not a live port");
}

#[tokio::test]
async fn silent_address_times_out_like_a_refusal() {
    // Reserved for private use and not expected to answer from a test host.
    let blackhole = Ipv4Addr::new(10, 255, 255, 1);
    let wait = Duration::from_millis(300);
    let prober = TcpProber::with_banner(PROBE_TIMEOUT, 1024);

    let result = prober.probe(blackhole, 80, wait).await;

    assert!(!result.reachable);
    assert_eq!(result.banner, None);
    assert!(
        result.latency < wait + Duration::from_millis(200),
        "probe outlived its timeout: {:?}",
        result.latency
    );
}

#[tokio::test]
async fn banner_probe_reads_the_greeting() {
    let port = spawn_service("220 files.lan FTP server ready\r\n").await;
    let prober = TcpProber::with_banner(PROBE_TIMEOUT, 1024);

    let result = prober.probe(LOOPBACK, port, PROBE_TIMEOUT).await;
    assert!(result.reachable);
    assert_eq!(
        result.banner.as_deref(),
        Some("220 files.lan FTP server ready")
    );
}

#[tokio::test]
async fn discovers_loopback_single_address() {
    let open = spawn_service("").await;
    let discovery = HostDiscovery::new(Arc::new(TcpProber::handshake()));

    let hosts = discovery
        .discover("127.0.0.1/32", &[open], PROBE_TIMEOUT, 4)
        .await
        .expect("discovery over /32");

    assert_eq!(hosts.into_iter().collect::<Vec<_>>(), vec![LOOPBACK]);
}

#[tokio::test]
async fn loopback_without_listeners_is_not_live() {
    let closed = closed_port().await;
    let discovery = HostDiscovery::new(Arc::new(TcpProber::handshake()));

    let hosts = discovery
        .discover("127.0.0.1/32", &[closed], PROBE_TIMEOUT, 4)
        .await
        .expect("discovery over /32");

    assert!(hosts.is_empty(), "unexpected hosts: {hosts:?}");
}

#[tokio::test]
async fn malformed_subnet_is_rejected() {
    let discovery = HostDiscovery::new(Arc::new(TcpProber::handshake()));

    let err = discovery
        .discover("not-a-subnet", &[80], PROBE_TIMEOUT, 4)
        .await
        .unwrap_err();

    assert!(matches!(err, ScanError::InvalidCidr { .. }), "got {err:?}");
}
