use colored::*;
use lanscope_core::AnomalyDetector;

use crate::terminal::print;

pub fn monitor(ports: &[u16], json: bool) -> anyhow::Result<()> {
    let detector = AnomalyDetector::system();
    let activity = detector.monitor_ports(ports)?;

    if json {
        return print::json(&activity);
    }

    print::header("watched ports");
    for (port, connections) in &activity {
        println!("{} {}", format!("port {port}").bold(), format!("({})", connections.len()).bright_black());
        for conn in connections {
            let process = conn.process.as_deref().unwrap_or("-");
            println!("  {process:<20} {} -> {} [{}]", conn.local, conn.remote, conn.status);
        }
    }
    Ok(())
}

pub fn activity(json: bool) -> anyhow::Result<()> {
    let detector = AnomalyDetector::system();
    let by_process = detector.process_activity()?;

    if json {
        return print::json(&by_process);
    }

    print::header("process activity");
    if by_process.is_empty() {
        print::no_results("established connections");
        return Ok(());
    }

    for (idx, (name, activity)) in by_process.iter().enumerate() {
        print::tree_head(idx, name);
        let ports: Vec<String> = activity.remote_ports.iter().map(u16::to_string).collect();
        let details = vec![
            ("Connections".to_string(), activity.connections.to_string().green()),
            ("Remote IPs".to_string(), activity.remote_addrs.len().to_string().normal()),
            ("Remote ports".to_string(), ports.join(", ").normal()),
        ];
        print::as_tree_one_level(&details);
    }
    Ok(())
}
