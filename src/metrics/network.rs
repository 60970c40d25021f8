use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

use super::MetricFault;

/// Find the source address the kernel would route `target` through.
///
/// Connecting a UDP socket only runs a local route lookup; no datagram is
/// sent and nothing waits on the network, so the probe returns in well under
/// a millisecond whether or not a route exists.
pub fn probe_local_ip(target: SocketAddr) -> Result<IpAddr, MetricFault> {
    let bind_addr: SocketAddr = match target {
        SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
        SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
    };
    let socket = UdpSocket::bind(bind_addr).map_err(|e| MetricFault::NoRoute(e.to_string()))?;
    socket
        .connect(target)
        .map_err(|e| MetricFault::NoRoute(format!("{target}: {e}")))?;
    let local = socket
        .local_addr()
        .map_err(|e| MetricFault::NoRoute(e.to_string()))?
        .ip();
    if local.is_unspecified() {
        return Err(MetricFault::NoRoute(format!("no source address for {target}")));
    }
    Ok(local)
}
