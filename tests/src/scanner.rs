use std::sync::Arc;

use lanscope_common::models::DeviceCategory;
use lanscope_core::resolver::NoResolver;
use lanscope_core::scanner::{self, PortScanner, services};
use lanscope_core::{DeviceClassifier, TcpProber};

use crate::utils::{LOOPBACK, PROBE_TIMEOUT, closed_port, spawn_service};

fn banner_scanner() -> PortScanner {
    PortScanner::new(Arc::new(TcpProber::with_banner(PROBE_TIMEOUT, 1024)))
}

#[tokio::test]
async fn scan_lists_only_open_ports_with_their_banners() {
    let talking = spawn_service("SSH-2.0-OpenSSH_9.6\r\n").await;
    let silent = spawn_service("").await;
    let closed = closed_port().await;

    let record = banner_scanner()
        .scan_host(LOOPBACK, &[talking, silent, closed], PROBE_TIMEOUT, 8)
        .await
        .expect("scan loopback");

    assert!(record.reachable);
    assert_eq!(record.open_ports.len(), 2);
    assert_eq!(record.open_ports[&talking], "SSH-2.0-OpenSSH_9.6");
    assert_eq!(record.open_ports[&silent], "");
    assert!(!record.open_ports.contains_key(&closed));
}

#[tokio::test]
async fn findings_cover_every_open_port() {
    let first = spawn_service("hello").await;
    let second = spawn_service("").await;

    let record = banner_scanner()
        .scan_host(LOOPBACK, &[first, second], PROBE_TIMEOUT, 8)
        .await
        .expect("scan loopback");
    let findings = scanner::findings(&record);

    assert_eq!(findings.len(), 2);
    for finding in &findings {
        assert_eq!(finding.address, LOOPBACK);
        assert_eq!(finding.service_label, services::label(finding.port));
    }
}

#[tokio::test]
async fn scanned_banner_drives_classification() {
    let port = spawn_service("Canon imageRUNNER ready").await;

    let record = banner_scanner()
        .scan_host(LOOPBACK, &[port], PROBE_TIMEOUT, 1)
        .await
        .expect("scan loopback");

    let classifier = DeviceClassifier::new(Arc::new(NoResolver));
    let profile = classifier.classify(LOOPBACK, &record.open_ports).await;

    assert_eq!(profile.category, DeviceCategory::Printer);
    assert_eq!(profile.confidence, 20);
    assert_eq!(profile.hostname, None);
}
