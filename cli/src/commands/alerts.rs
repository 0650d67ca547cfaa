use colored::*;
use lanscope_common::ScanConfig;
use lanscope_common::models::AlertKind;
use lanscope_core::AnomalyDetector;

use crate::terminal::print;

pub fn alerts(cfg: &ScanConfig, threshold: Option<u16>, json: bool) -> anyhow::Result<()> {
    let local = super::local_boundary(cfg)?;
    let detector = AnomalyDetector::system()
        .with_local_network(local)
        .with_high_port_threshold(threshold.unwrap_or(cfg.high_port_threshold));

    let alerts = detector.detect()?;

    if json {
        return print::json(&alerts);
    }

    print::header("connection alerts");
    if alerts.is_empty() {
        print::no_results("suspicious connections");
        return Ok(());
    }

    for alert in &alerts {
        let kind = match alert.kind {
            AlertKind::HighPort => "HIGH PORT".yellow().bold(),
            AlertKind::UnusualIp => "UNUSUAL IP".red().bold(),
        };
        let process = alert.process.as_deref().unwrap_or("unknown process");
        let remote = match alert.remote_port {
            Some(port) => format!("{}:{port}", alert.remote_addr),
            None => alert.remote_addr.to_string(),
        };
        println!("{kind} {process} {} -> {remote}", alert.local);
    }
    Ok(())
}
