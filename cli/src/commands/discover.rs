use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use colored::*;
use lanscope_common::ScanConfig;
use lanscope_core::{HostDiscovery, TcpProber};

use crate::terminal::{print, spinner};

pub async fn discover(subnet: &str, ports: &[u16], cfg: &ScanConfig, json: bool) -> anyhow::Result<()> {
    let discovery = HostDiscovery::new(Arc::new(TcpProber::handshake()));

    let start_time = Instant::now();
    let spinner = spinner::start(format!("Discovering hosts in {subnet}"), !json);
    let hosts = discovery
        .discover(subnet, ports, cfg.timeout, cfg.concurrency)
        .await;
    drop(spinner);
    let hosts = hosts.with_context(|| format!("discovery of {subnet} failed"))?;

    if json {
        return print::json(&hosts);
    }

    if hosts.is_empty() {
        print::header("zero hosts detected");
        print::no_results("live hosts");
        return Ok(());
    }

    print::header("network discovery");
    for (idx, host) in hosts.iter().enumerate() {
        print::tree_head(idx, &host.to_string());
    }

    let active_hosts = format!("{} active hosts", hosts.len()).bold().green();
    let total_time = format!("{:.2}s", start_time.elapsed().as_secs_f64()).bold().yellow();
    print::fat_separator();
    println!("Discovery complete: {active_hosts} identified in {total_time}");
    Ok(())
}
