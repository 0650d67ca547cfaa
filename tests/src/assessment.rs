use lanscope_common::ScanConfig;
use lanscope_common::models::DeviceCategory;
use lanscope_core::Assessment;

use crate::utils::{LOOPBACK, PROBE_TIMEOUT, closed_port, spawn_service};

#[tokio::test]
async fn assessment_profiles_loopback_end_to_end() {
    let printer = spawn_service("Brother HL-L2350DW\r\n").await;
    let closed = closed_port().await;

    let config = ScanConfig {
        timeout: PROBE_TIMEOUT,
        discovery_ports: vec![printer],
        scan_ports: vec![printer, closed],
        concurrency: 4,
        no_dns: true,
        ..ScanConfig::default()
    };

    let report = Assessment::new(config)
        .run("127.0.0.1/32")
        .await
        .expect("assessment over loopback");

    assert_eq!(report.hosts.len(), 1);
    let host = &report.hosts[&LOOPBACK];
    assert_eq!(host.findings.len(), 1);
    assert_eq!(host.findings[0].port, printer);
    assert_eq!(host.device.category, DeviceCategory::Printer);
    assert!(report.finished_at >= report.started_at);
}

#[tokio::test]
async fn invalid_configuration_fails_before_probing() {
    let config = ScanConfig {
        concurrency: 0,
        ..ScanConfig::default()
    };

    let result = Assessment::new(config).run("127.0.0.1/32").await;
    assert!(result.is_err());
}
