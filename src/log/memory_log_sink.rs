use std::sync::{Arc, Mutex};

use crate::log::{log_level::LogLevel, log_msg::LogMsg, log_sink::LogSink};
use crate::utils::now_millis;

/// Sink that keeps every record in memory.
///
/// Clones share the same storage, so one clone can be handed to a
/// component while another is inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogSink {
    records: Arc<Mutex<Vec<LogMsg>>>,
}

impl MemoryLogSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> Vec<LogMsg> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of records at `level` whose text contains `needle`.
    #[must_use]
    pub fn count_matching(&self, level: LogLevel, needle: &str) -> usize {
        self.records()
            .iter()
            .filter(|m| m.level == level && m.text.contains(needle))
            .count()
    }
}

impl LogSink for MemoryLogSink {
    fn log(&self, level: LogLevel, msg: &str, target: &'static str) {
        let record = LogMsg::new(level, msg, target, now_millis());
        match self.records.lock() {
            Ok(mut guard) => guard.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }
}
