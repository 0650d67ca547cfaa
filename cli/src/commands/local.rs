use std::time::Duration;

use colored::*;
use lanscope_common::network::interface;
use lanscope_core::TrafficMonitor;

use crate::terminal::print;

pub fn interfaces(json: bool) -> anyhow::Result<()> {
    let addresses = interface::interface_addresses();

    if json {
        return print::json(&addresses);
    }

    print::header("network interfaces");
    if addresses.is_empty() {
        print::no_results("IPv4 interfaces");
        return Ok(());
    }

    for (idx, entry) in addresses.iter().enumerate() {
        let state = if entry.up { "up".green() } else { "down".red() };
        print::tree_head(idx, &format!("{} ({state})", entry.interface));

        let mut details = vec![
            (
                "IPv4".to_string(),
                format!("{}{}{}", entry.address, "/".bright_black(), entry.prefix).normal(),
            ),
            ("Netmask".to_string(), entry.netmask.to_string().normal()),
        ];
        if let Some(broadcast) = entry.broadcast {
            details.push(("Broadcast".to_string(), broadcast.to_string().normal()));
        }
        print::as_tree_one_level(&details);
    }
    Ok(())
}

pub async fn traffic(seconds: u64, interval_ms: u64, json: bool) -> anyhow::Result<()> {
    let monitor = TrafficMonitor::system();

    if !json {
        print::header("traffic");
    }
    let samples = monitor
        .sample(
            Duration::from_secs(seconds),
            Duration::from_millis(interval_ms),
            |sample| {
                if !json {
                    println!(
                        "{} {:>10.2} KiB/s  {} {:>10.2} KiB/s",
                        "up".bright_black(),
                        sample.upload_kib_s,
                        "down".bright_black(),
                        sample.download_kib_s
                    );
                }
            },
        )
        .await?;

    if json {
        return print::json(&samples);
    }

    let count = samples.len().max(1) as f64;
    let upload: f64 = samples.iter().map(|s| s.upload_kib_s).sum::<f64>() / count;
    let download: f64 = samples.iter().map(|s| s.download_kib_s).sum::<f64>() / count;
    print::fat_separator();
    println!(
        "Average over {} sample(s): {} up, {} down",
        samples.len(),
        format!("{upload:.2} KiB/s").bold().green(),
        format!("{download:.2} KiB/s").bold().green()
    );
    Ok(())
}
