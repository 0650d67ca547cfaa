mod commands;
mod terminal;

use commands::{CommandLine, Commands, alerts, discover, local, monitor, profile, scan};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    terminal::logging::init(commands.verbose);

    let cfg = commands.scan_config()?;
    let json = commands.json;

    match commands.command {
        Commands::Discover { subnet, ports } => {
            let subnet = commands::subnet_or_local(subnet)?;
            let ports = commands::port_list(ports.as_deref(), &cfg.discovery_ports)?;
            discover::discover(&subnet, &ports, &cfg, json).await
        }
        Commands::Scan { address, ports } => {
            let ports = commands::port_list(ports.as_deref(), &cfg.scan_ports)?;
            scan::scan(address, &ports, &cfg, json).await
        }
        Commands::Profile { subnet } => {
            let subnet = commands::subnet_or_local(subnet)?;
            profile::profile(&subnet, cfg, json).await
        }
        Commands::Alerts { threshold } => alerts::alerts(&cfg, threshold, json),
        Commands::Monitor { ports } => {
            let ports = commands::port_list(ports.as_deref(), &cfg.watch_ports)?;
            monitor::monitor(&ports, json)
        }
        Commands::Activity => monitor::activity(json),
        Commands::Interfaces => local::interfaces(json),
        Commands::Traffic {
            seconds,
            interval_ms,
        } => local::traffic(seconds, interval_ms, json).await,
    }
}
