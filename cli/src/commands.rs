pub mod alerts;
pub mod discover;
pub mod local;
pub mod monitor;
pub mod profile;
pub mod scan;

use std::net::Ipv4Addr;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use lanscope_common::ScanConfig;
use lanscope_common::network::{interface, ports, range};
use pnet::ipnetwork::Ipv4Network;
use tracing::info;

#[derive(Parser)]
#[command(name = "lanscope")]
#[command(about = "Local network discovery, service probing and connection triage.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Per-probe connect timeout in milliseconds
    #[arg(long, global = true, default_value_t = 1000)]
    pub timeout_ms: u64,

    /// Maximum number of probes in flight
    #[arg(long, global = true, default_value_t = 64)]
    pub concurrency: usize,

    /// Network treated as local by the unusual-IP rule (e.g. 192.168.1.0/24)
    #[arg(long, global = true)]
    pub local_net: Option<String>,

    /// Skip reverse DNS lookups
    #[arg(long, global = true)]
    pub no_dns: bool,

    /// Print results as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find live hosts in a subnet (defaults to the local network)
    #[command(alias = "d")]
    Discover {
        subnet: Option<String>,
        /// Ports tried on every address
        #[arg(long, short)]
        ports: Option<String>,
    },
    /// Probe the ports of one host and label its services
    #[command(alias = "s")]
    Scan {
        address: Ipv4Addr,
        /// Ports to probe, e.g. 22,80,8000-8100
        #[arg(long, short)]
        ports: Option<String>,
    },
    /// Discover, scan and fingerprint every host in a subnet
    #[command(alias = "p")]
    Profile { subnet: Option<String> },
    /// Flag suspicious entries in this machine's connection table
    #[command(alias = "a")]
    Alerts {
        /// Remote ports above this value are flagged
        #[arg(long)]
        threshold: Option<u16>,
    },
    /// Show live connections to watched remote ports
    #[command(alias = "m")]
    Monitor {
        #[arg(long, short)]
        ports: Option<String>,
    },
    /// Summarise established connections per process
    Activity,
    /// List the IPv4 addresses bound to local interfaces
    #[command(alias = "i")]
    Interfaces,
    /// Sample upload and download rates of the local interfaces
    #[command(alias = "t")]
    Traffic {
        /// How long to sample for
        #[arg(long, default_value_t = 10)]
        seconds: u64,
        /// Time between samples in milliseconds
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn scan_config(&self) -> anyhow::Result<ScanConfig> {
        let local_network: Option<Ipv4Network> = self
            .local_net
            .as_deref()
            .map(range::parse_subnet)
            .transpose()
            .context("invalid --local-net")?;

        let cfg = ScanConfig {
            timeout: Duration::from_millis(self.timeout_ms),
            concurrency: self.concurrency,
            local_network,
            no_dns: self.no_dns,
            ..ScanConfig::default()
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

pub fn port_list(spec: Option<&str>, default: &[u16]) -> anyhow::Result<Vec<u16>> {
    match spec {
        Some(spec) => Ok(ports::parse_port_spec(spec)?),
        None => Ok(default.to_vec()),
    }
}

/// The subnet given on the command line, or the one this machine is on.
pub fn subnet_or_local(subnet: Option<String>) -> anyhow::Result<String> {
    match subnet {
        Some(subnet) => Ok(subnet),
        None => {
            let network = interface::local_network()
                .context("no subnet given and the local network could not be determined")?;
            info!("Using local network {network}");
            Ok(network.to_string())
        }
    }
}

/// The configured local boundary, or the detected interface network.
pub fn local_boundary(cfg: &ScanConfig) -> anyhow::Result<Ipv4Network> {
    match cfg.local_network {
        Some(network) => Ok(network),
        None => interface::local_network()
            .context("pass --local-net; the local network could not be determined"),
    }
}
