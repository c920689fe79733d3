use std::{fmt, io};

/// Misuse of `start`; always recoverable by fixing the state and retrying.
#[derive(Debug)]
pub enum StartError {
    NotBound,
    AlreadyRunning,
    Closed,
    /// The worker thread could not be spawned.
    Spawn(io::Error),
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use StartError::*;
        match self {
            NotBound => write!(f, "receiver is not bound"),
            AlreadyRunning => write!(f, "receiver is already running"),
            Closed => write!(f, "receiver is closed"),
            Spawn(e) => write!(f, "failed to spawn receive worker: {e}"),
        }
    }
}

impl std::error::Error for StartError {}
