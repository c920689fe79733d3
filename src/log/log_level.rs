use std::fmt;

/// Severity of a log record, ordered from most to least verbose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Per-datagram detail (every delivered sample).
    Trace,
    /// Diagnostic detail useful while debugging acquisition.
    Debug,
    /// Lifecycle progress: bind, start, stop, close.
    Info,
    /// Recoverable failures: malformed datagrams, single failed reads.
    Warn,
    /// Failures that end a worker or an operation.
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
