//! Discover the address senders should use to reach this receiver.

use std::net::{IpAddr, Ipv4Addr};

use tracing::debug;

/// Non-loopback IPv4 address senders on the LAN can reach this host at.
/// Prefers the default-route address and otherwise scans the interfaces, so a
/// receiver on a gateway-less LAN still finds its link address.
pub fn lan_ipv4() -> Option<Ipv4Addr> {
    match local_ip_address::local_ip() {
        Ok(IpAddr::V4(ip)) if usable(ip) => return Some(ip),
        Ok(_) => {}
        Err(e) => debug!(error = %e, "no default-route address"),
    }
    match local_ip_address::list_afinet_netifas() {
        Ok(interfaces) => first_lan_ipv4(interfaces),
        Err(e) => {
            debug!(error = %e, "listing network interfaces failed");
            None
        }
    }
}

fn first_lan_ipv4<I>(interfaces: I) -> Option<Ipv4Addr>
where
    I: IntoIterator<Item = (String, IpAddr)>,
{
    interfaces.into_iter().find_map(|(name, addr)| match addr {
        IpAddr::V4(ip) if usable(ip) => {
            debug!(interface = %name, %ip, "lan address");
            Some(ip)
        }
        _ => None,
    })
}

fn usable(ip: Ipv4Addr) -> bool {
    !ip.is_loopback() && !ip.is_unspecified()
}

/// Human-facing line describing where the receiver is listening.
pub fn listening_banner(ip: Option<Ipv4Addr>, port: u16) -> String {
    match ip {
        Some(ip) => format!("Cast receiver running on http://{}:{}", ip, port),
        None => format!("Cast receiver running on port {}", port),
    }
}

/// URL a sender posts cast requests to.
pub fn cast_endpoint(ip: Ipv4Addr, port: u16) -> String {
    format!("http://{}:{}/cast", ip, port)
}
