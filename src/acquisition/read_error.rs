use std::{fmt, io};

/// Failure of a single `recv_from`.
#[derive(Debug)]
pub enum ReadError {
    /// Transient; the loop logs it and keeps reading.
    Transport(io::Error),
    /// The socket is gone; the loop ends.
    Closed(io::Error),
}

impl ReadError {
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, ReadError::Closed(_))
    }
}

impl From<io::Error> for ReadError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionAborted => ReadError::Closed(e),
            _ if is_bad_descriptor(&e) => ReadError::Closed(e),
            _ => ReadError::Transport(e),
        }
    }
}

#[cfg(unix)]
fn is_bad_descriptor(e: &io::Error) -> bool {
    // EBADF
    e.raw_os_error() == Some(9)
}

#[cfg(windows)]
fn is_bad_descriptor(e: &io::Error) -> bool {
    // WSAENOTSOCK
    e.raw_os_error() == Some(10038)
}

#[cfg(not(any(unix, windows)))]
fn is_bad_descriptor(_e: &io::Error) -> bool {
    false
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Transport(e) => write!(f, "receive failed: {e}"),
            ReadError::Closed(e) => write!(f, "socket closed: {e}"),
        }
    }
}

impl std::error::Error for ReadError {}
