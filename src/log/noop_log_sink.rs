use crate::log::{log_level::LogLevel, log_sink::LogSink};

/// Discards every record. Handed to receivers and clients that should not
/// log, mostly in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    fn log(&self, _: LogLevel, _: &str, _: &'static str) {}
}
