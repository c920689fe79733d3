use crate::log::log_level::LogLevel;

/// Destination for log records. Acquisition workers report every
/// non-fatal failure through one of these instead of returning it.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, msg: &str, target: &'static str);
}
