use colored::*;
use lanscope_common::ScanConfig;
use lanscope_common::models::DeviceCategory;
use lanscope_core::Assessment;

use super::scan::print_findings;
use crate::terminal::{print, spinner};

pub async fn profile(subnet: &str, cfg: ScanConfig, json: bool) -> anyhow::Result<()> {
    let assessment = Assessment::new(cfg);

    let spinner = spinner::start(format!("Assessing {subnet}"), !json);
    let report = assessment.run(subnet).await;
    drop(spinner);
    let report = report?;

    if json {
        return print::json(&report);
    }

    if report.hosts.is_empty() {
        print::header("zero hosts detected");
        print::no_results("live hosts");
        return Ok(());
    }

    print::header("device profiles");
    for (idx, (address, host)) in report.hosts.iter().enumerate() {
        let device = &host.device;
        let name = device.hostname.as_deref().unwrap_or("No hostname");
        let category = match device.category {
            DeviceCategory::Unknown => device.category.to_string().dimmed(),
            _ => device.category.to_string().bold().cyan(),
        };

        print::tree_head(idx, &format!("{address} ({name})"));
        println!("    type: {category}, confidence {}", device.confidence);
        for evidence in &device.evidence {
            println!("    {} {}", "·".bright_black(), evidence);
        }
        print_findings(&host.findings);
        println!();
    }

    print::fat_separator();
    let elapsed = (report.finished_at - report.started_at).num_milliseconds() as f64 / 1000.0;
    println!(
        "Profiled {} host(s) with {} open service(s) in {:.2}s",
        report.hosts.len().to_string().bold().green(),
        report.findings().count().to_string().bold(),
        elapsed
    );
    Ok(())
}
