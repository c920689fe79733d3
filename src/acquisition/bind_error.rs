use std::{fmt, io, net::SocketAddr};

use super::receiver_state::ReceiverState;

/// Failure to open the receive socket. The caller may retry with other
/// parameters.
#[derive(Debug)]
pub enum BindError {
    /// Local or remote address cannot be parsed or resolved.
    InvalidAddress(String),
    /// Local port is taken by another socket.
    AddrInUse(SocketAddr),
    /// Receiver already holds a socket (or was closed).
    AlreadyBound(ReceiverState),
    Io(io::Error),
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::InvalidAddress(a) => write!(f, "invalid address: {a}"),
            BindError::AddrInUse(a) => write!(f, "local address {a} already in use"),
            BindError::AlreadyBound(s) => write!(f, "cannot bind while {s}"),
            BindError::Io(e) => write!(f, "bind failed: {e}"),
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BindError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BindError {
    fn from(e: io::Error) -> Self {
        BindError::Io(e)
    }
}
