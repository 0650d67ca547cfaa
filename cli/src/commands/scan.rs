use std::net::Ipv4Addr;
use std::sync::Arc;

use colored::*;
use lanscope_common::ScanConfig;
use lanscope_common::models::{HostRecord, VulnerabilityFinding};
use lanscope_core::scanner::{self, PortScanner};
use lanscope_core::TcpProber;
use serde::Serialize;

use crate::terminal::{print, spinner};

#[derive(Serialize)]
struct ScanOutput<'a> {
    record: &'a HostRecord,
    findings: &'a [VulnerabilityFinding],
}

pub async fn scan(address: Ipv4Addr, ports: &[u16], cfg: &ScanConfig, json: bool) -> anyhow::Result<()> {
    let scanner = PortScanner::new(Arc::new(TcpProber::with_banner(
        cfg.banner_wait,
        cfg.banner_limit,
    )));

    let spinner = spinner::start(format!("Probing {} port(s) on {address}", ports.len()), !json);
    let record = scanner
        .scan_host(address, ports, cfg.timeout, cfg.concurrency)
        .await;
    drop(spinner);
    let record = record?;
    let findings = scanner::findings(&record);

    if json {
        return print::json(&ScanOutput {
            record: &record,
            findings: &findings,
        });
    }

    print::header(&format!("services on {address}"));
    print_findings(&findings);
    Ok(())
}

pub fn print_findings(findings: &[VulnerabilityFinding]) {
    if findings.is_empty() {
        print::no_results("open ports");
        return;
    }

    let details: Vec<(String, ColoredString)> = findings
        .iter()
        .map(|finding| {
            let mut value = finding.service_label.clone();
            if let Some(risk) = &finding.risk {
                value.push_str(&format!(" ({risk})"));
            }
            if !finding.banner.is_empty() {
                value.push_str(&format!(" | {}", finding.banner));
            }
            (format!("{}/tcp", finding.port), value.normal())
        })
        .collect();

    print::as_tree_one_level(&details);
}
