use std::time::Duration;

use crate::config::Config;

const SECTION: &str = "Acquisition";

/// Local port the reference client always bound to.
pub const DEFAULT_LOCAL_PORT: u16 = 8080;
pub const DEFAULT_LOCAL_HOST: &str = "0.0.0.0";
/// Poll interval for observing stop requests while blocked in a read.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 100;
/// Datagrams longer than this are discarded as oversized.
pub const DEFAULT_RECV_BUFFER_SIZE: usize = 1024;

/// Socket and worker settings for a [`Receiver`](super::receiver::Receiver).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiverConfig {
    pub local_host: String,
    /// `0` asks the OS for an ephemeral port.
    pub local_port: u16,
    pub read_timeout: Duration,
    pub recv_buffer_size: usize,
    /// Drop datagrams whose source IP differs from the bound endpoint.
    pub filter_source: bool,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            local_host: DEFAULT_LOCAL_HOST.to_string(),
            local_port: DEFAULT_LOCAL_PORT,
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
            filter_source: false,
        }
    }
}

impl ReceiverConfig {
    /// Reads the `[Acquisition]` section; absent or unparseable keys keep
    /// their defaults.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let read_timeout_ms = config
            .get_parsed_or(SECTION, "read_timeout_ms", DEFAULT_READ_TIMEOUT_MS)
            .max(1);
        Self {
            local_host: config
                .get_non_empty_or_default(SECTION, "local_host", DEFAULT_LOCAL_HOST)
                .to_string(),
            local_port: config.get_parsed_or(SECTION, "local_port", DEFAULT_LOCAL_PORT),
            read_timeout: Duration::from_millis(read_timeout_ms),
            recv_buffer_size: config
                .get_parsed_or(SECTION, "recv_buffer_size", DEFAULT_RECV_BUFFER_SIZE)
                .max(1),
            filter_source: config.get_parsed_or(SECTION, "filter_source", false),
        }
    }

    /// Loopback, ephemeral port. Used by tests and local tooling.
    #[must_use]
    pub fn loopback_ephemeral() -> Self {
        Self {
            local_host: "127.0.0.1".to_string(),
            local_port: 0,
            ..Self::default()
        }
    }
}
