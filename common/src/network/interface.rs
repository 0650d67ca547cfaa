//! Local interface selection and inventory.
//!
//! Used to find the network this machine sits on, which serves as the
//! default discovery target and as the "local" boundary for connection
//! anomaly detection, and to list every IPv4 address bound locally.

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use tracing::debug;

#[cfg(target_os = "linux")]
use linux_impl::{is_physical, is_wireless};
#[cfg(not(target_os = "linux"))]
use fallback_impl::{is_physical, is_wireless};

use crate::error::ScanError;
use crate::models::InterfaceAddress;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// The interface was filtered out as "not physical" by the provided logic.
    NotPhysical,
    /// The interface does not have a MAC address.
    NoMacAddress,
    /// The interface does not support broadcast.
    NotBroadcast,
    /// The interface is a point-to-point link (e.g., a VPN).
    IsPointToPoint,
    /// The interface has no private IPv4 address.
    NoPrivateIpv4,
}

/// Finds the primary LAN interface and returns its IPv4 network.
pub fn local_network() -> Result<Ipv4Network, ScanError> {
    let interfaces: Vec<NetworkInterface> = pnet::datalink::interfaces();
    debug!("Identified {} network interface(s)", interfaces.len());
    select_local_network(interfaces, is_physical, is_wired)
}

/// Every IPv4 address on every local interface, in interface order.
pub fn interface_addresses() -> Vec<InterfaceAddress> {
    addresses_of(&pnet::datalink::interfaces())
}

fn addresses_of(interfaces: &[NetworkInterface]) -> Vec<InterfaceAddress> {
    interfaces
        .iter()
        .flat_map(|interface| {
            interface.ips.iter().filter_map(move |net| match net {
                IpNetwork::V4(v4) => Some(InterfaceAddress {
                    interface: interface.name.clone(),
                    address: v4.ip(),
                    prefix: v4.prefix(),
                    netmask: v4.mask(),
                    broadcast: (interface.is_broadcast() && v4.prefix() < 31)
                        .then(|| v4.broadcast()),
                    up: interface.is_up(),
                }),
                IpNetwork::V6(_) => None,
            })
        })
        .collect()
}

fn select_local_network(
    interfaces: Vec<NetworkInterface>,
    is_physical: impl Fn(&NetworkInterface) -> bool,
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> Result<Ipv4Network, ScanError> {
    let viable: Vec<NetworkInterface> = interfaces
        .into_iter()
        .filter(|interface| match is_viable_lan_interface(interface, &is_physical) {
            Ok(()) => true,
            Err(reason) => {
                debug!("Skipping interface {}: {:?}", interface.name, reason);
                false
            }
        })
        .collect();

    let interface = select_best_lan_interface(viable, is_wired)
        .ok_or_else(|| ScanError::NoLocalNetwork("no viable LAN interface".into()))?;

    let network = private_ipv4_network(&interface).ok_or_else(|| {
        ScanError::NoLocalNetwork(format!("{} has no private IPv4 network", interface.name))
    })?;

    Ipv4Network::new(network.network(), network.prefix())
        .map_err(|e| ScanError::NoLocalNetwork(e.to_string()))
}

fn private_ipv4_network(interface: &NetworkInterface) -> Option<Ipv4Network> {
    interface.ips.iter().find_map(|net| match net {
        IpNetwork::V4(v4) if v4.ip().is_private() => Some(*v4),
        _ => None,
    })
}

fn is_viable_lan_interface(
    interface: &NetworkInterface,
    is_physical: impl Fn(&NetworkInterface) -> bool,
) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() || !is_physical(interface) {
        return Err(ViabilityError::NotPhysical);
    }
    if interface.mac.is_none() {
        return Err(ViabilityError::NoMacAddress);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }
    if private_ipv4_network(interface).is_none() {
        return Err(ViabilityError::NoPrivateIpv4);
    }
    Ok(())
}

fn select_best_lan_interface(
    interfaces: Vec<NetworkInterface>,
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> Option<NetworkInterface> {
    let wired = interfaces.iter().position(&is_wired);
    match wired {
        Some(idx) => interfaces.into_iter().nth(idx),
        None => interfaces.into_iter().next(),
    }
}

fn is_wired(interface: &NetworkInterface) -> bool {
    is_physical(interface) && !is_wireless(interface)
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::path::Path;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/device", interface.name)).exists()
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/wireless", interface.name)).exists()
    }
}

#[cfg(not(target_os = "linux"))]
mod fallback_impl {
    use super::*;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        !interface.is_loopback()
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        interface.name.starts_with("wl") || interface.name.starts_with("wifi")
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use pnet::util::MacAddr;
    use std::net::Ipv4Addr;

    const IFF_UP: u32 = 1;
    const IFF_BROADCAST: u32 = 1 << 1;
    const IFF_LOOPBACK: u32 = 1 << 3;
    const IFF_POINTTOPOINT: u32 = 1 << 4;

    fn mock_interface(name: &str, mac: Option<MacAddr>, ips: Vec<IpNetwork>, flags: u32) -> NetworkInterface {
        NetworkInterface {
            name: name.to_string(),
            description: "An interface".to_string(),
            index: 0,
            mac,
            ips,
            flags,
        }
    }

    fn default_mac() -> Option<MacAddr> {
        Some(MacAddr(0x1, 0x2, 0x3, 0x4, 0x5, 0x6))
    }

    fn v4(s: &str) -> IpNetwork {
        IpNetwork::V4(s.parse().unwrap())
    }

    #[test]
    fn viable_interface_passes() {
        let interface = mock_interface("eth0", default_mac(), vec![v4("192.168.1.100/24")], IFF_UP | IFF_BROADCAST);
        assert_eq!(is_viable_lan_interface(&interface, |_| true), Ok(()));
    }

    #[test]
    fn viability_failures() {
        let down = mock_interface("eth0", default_mac(), vec![v4("192.168.1.100/24")], IFF_BROADCAST);
        assert_eq!(is_viable_lan_interface(&down, |_| true), Err(ViabilityError::IsDown));

        let lo = mock_interface("lo", default_mac(), vec![v4("127.0.0.1/8")], IFF_UP | IFF_LOOPBACK);
        assert_eq!(is_viable_lan_interface(&lo, |_| true), Err(ViabilityError::NotPhysical));

        let no_mac = mock_interface("eth0", None, vec![v4("192.168.1.100/24")], IFF_UP | IFF_BROADCAST);
        assert_eq!(is_viable_lan_interface(&no_mac, |_| true), Err(ViabilityError::NoMacAddress));

        let tun = mock_interface(
            "tun0",
            default_mac(),
            vec![v4("10.8.0.2/24")],
            IFF_UP | IFF_BROADCAST | IFF_POINTTOPOINT,
        );
        assert_eq!(is_viable_lan_interface(&tun, |_| true), Err(ViabilityError::IsPointToPoint));

        let public = mock_interface("eth0", default_mac(), vec![v4("8.8.8.8/24")], IFF_UP | IFF_BROADCAST);
        assert_eq!(is_viable_lan_interface(&public, |_| true), Err(ViabilityError::NoPrivateIpv4));
    }

    #[test]
    fn wired_interface_is_preferred() {
        let wlan = mock_interface("wlan0", default_mac(), vec![v4("192.168.1.42/24")], IFF_UP | IFF_BROADCAST);
        let eth = mock_interface("eth1", default_mac(), vec![v4("10.0.0.15/16")], IFF_UP | IFF_BROADCAST);

        let network = select_local_network(vec![wlan, eth], |_| true, |i| i.name.starts_with("eth")).unwrap();
        assert_eq!(network.network(), Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(network.prefix(), 16);
    }

    #[test]
    fn no_viable_interface_is_an_error() {
        let lo = mock_interface("lo", default_mac(), vec![v4("127.0.0.1/8")], IFF_UP | IFF_LOOPBACK);
        let result = select_local_network(vec![lo], |_| true, |_| true);
        assert!(matches!(result, Err(ScanError::NoLocalNetwork(_))));
    }

    #[test]
    fn inventory_lists_ipv4_addresses_only() {
        let lo = mock_interface("lo", None, vec![v4("127.0.0.1/8")], IFF_UP | IFF_LOOPBACK);
        let eth = mock_interface(
            "eth0",
            default_mac(),
            vec![v4("192.168.1.100/24"), IpNetwork::V6("fe80::1/64".parse().unwrap())],
            IFF_UP | IFF_BROADCAST,
        );
        let down = mock_interface("eth1", default_mac(), vec![v4("10.0.0.5/16")], IFF_BROADCAST);

        let inventory = addresses_of(&[lo, eth, down]);

        assert_eq!(inventory.len(), 3);
        assert_eq!(inventory[0].interface, "lo");
        assert_eq!(inventory[0].broadcast, None);
        assert_eq!(inventory[1].address, Ipv4Addr::new(192, 168, 1, 100));
        assert_eq!(inventory[1].netmask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(inventory[1].broadcast, Some(Ipv4Addr::new(192, 168, 1, 255)));
        assert!(inventory[1].up);
        assert_eq!(inventory[2].prefix, 16);
        assert_eq!(inventory[2].broadcast, Some(Ipv4Addr::new(10, 0, 255, 255)));
        assert!(!inventory[2].up);
    }
}
