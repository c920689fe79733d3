use std::fmt;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

/// The peer the client expects datagrams from.
///
/// Recorded at bind time for display and logging. It only restricts
/// incoming traffic when source filtering is enabled in
/// [`ReceiverConfig`](super::receiver_config::ReceiverConfig).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// First address `host` resolves to. May hit DNS for host names.
    #[must_use]
    pub fn resolve(&self) -> Option<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut it| it.next())
    }

    /// IP that incoming datagrams must come from when filtering, or `None`
    /// when the host is a wildcard (`0.0.0.0`, `::`) and cannot restrict.
    #[must_use]
    pub fn source_filter(&self) -> Option<IpAddr> {
        self.resolve()
            .map(|a| a.ip())
            .filter(|ip| !ip.is_unspecified())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
