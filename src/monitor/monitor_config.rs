use std::time::Duration;

use crate::{config::Config, history::MAX_HISTORY};

const SECTION: &str = "Monitor";

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 100;
pub const DEFAULT_REMOTE_HOST: &str = "0.0.0.0";
pub const DEFAULT_REMOTE_PORT: u16 = 8080;

/// Consumer-side settings: history size, chart cadence and the peer
/// pre-filled in the connect form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub history_capacity: usize,
    pub refresh_interval: Duration,
    pub remote_host: String,
    pub remote_port: u16,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            history_capacity: MAX_HISTORY,
            refresh_interval: Duration::from_millis(DEFAULT_REFRESH_INTERVAL_MS),
            remote_host: DEFAULT_REMOTE_HOST.to_string(),
            remote_port: DEFAULT_REMOTE_PORT,
        }
    }
}

impl MonitorConfig {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let refresh_ms = config
            .get_parsed_or(SECTION, "refresh_interval_ms", DEFAULT_REFRESH_INTERVAL_MS)
            .max(1);
        Self {
            history_capacity: config
                .get_parsed_or(SECTION, "history_capacity", MAX_HISTORY)
                .max(1),
            refresh_interval: Duration::from_millis(refresh_ms),
            remote_host: config
                .get_non_empty_or_default(SECTION, "remote_host", DEFAULT_REMOTE_HOST)
                .to_string(),
            remote_port: config.get_parsed_or(SECTION, "remote_port", DEFAULT_REMOTE_PORT),
        }
    }
}
