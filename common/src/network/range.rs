//! IPv4 blocks and the host addresses inside them.

use std::net::{IpAddr, Ipv4Addr};

use pnet::ipnetwork::Ipv4Network;

use crate::error::ScanError;

/// Prefix assumed when a bare base address is given instead of a CIDR block.
pub const DEFAULT_PREFIX: u8 = 24;

/// An inclusive span of IPv4 addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn to_iter(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).map(Ipv4Addr::from)
    }

    /// Number of addresses in the span.
    pub fn size(&self) -> usize {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        if start > end {
            0
        } else {
            (end - start) as usize + 1
        }
    }

}

/// Parses `a.b.c.d/n`, or a bare `a.b.c.d` taken as the /24 that contains it.
///
/// The result is normalised to its network address, so `192.168.1.77/24`
/// becomes `192.168.1.0/24`.
pub fn parse_subnet(input: &str) -> Result<Ipv4Network, ScanError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ScanError::invalid_cidr(input, "empty input"));
    }

    let (ip_str, prefix_str) = match input.split_once('/') {
        Some((ip, prefix)) => (ip, Some(prefix)),
        None => (input, None),
    };

    let ip: Ipv4Addr = match ip_str.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => v4,
        Ok(IpAddr::V6(_)) => return Err(ScanError::UnsupportedAddress(input.to_string())),
        Err(e) => return Err(ScanError::invalid_cidr(input, e)),
    };

    let prefix: u8 = match prefix_str {
        Some(p) => p
            .parse::<u8>()
            .map_err(|e| ScanError::invalid_cidr(input, format!("bad prefix: {e}")))?,
        None => DEFAULT_PREFIX,
    };

    let network = Ipv4Network::new(ip, prefix).map_err(|e| ScanError::invalid_cidr(input, e))?;
    Ipv4Network::new(network.network(), prefix).map_err(|e| ScanError::invalid_cidr(input, e))
}

/// The addresses of `network` that may belong to a host.
///
/// Network and broadcast addresses are stripped for prefixes up to /30. A /31
/// is a point-to-point link where both addresses are hosts, and a /32 is the
/// single host itself.
pub fn usable_hosts(network: &Ipv4Network) -> Ipv4Range {
    let first: u32 = network.network().into();
    let last: u32 = network.broadcast().into();

    if network.prefix() >= 31 {
        return Ipv4Range::new(Ipv4Addr::from(first), Ipv4Addr::from(last));
    }

    Ipv4Range::new(Ipv4Addr::from(first + 1), Ipv4Addr::from(last - 1))
}

/// True for the RFC 1918 blocks the unusual-IP rule cares about:
/// `10.0.0.0/8` and `192.168.0.0/16`.
pub fn is_watched_private(addr: Ipv4Addr) -> bool {
    let [a, b, _, _] = addr.octets();
    a == 10 || (a == 192 && b == 168)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
