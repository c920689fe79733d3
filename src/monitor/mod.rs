//! Consumer of acquired samples: history recording and periodic snapshots.

pub mod history_recorder;
pub mod monitor_config;
pub mod sensor_monitor;
pub mod snapshot;

pub use history_recorder::HistoryRecorder;
pub use monitor_config::MonitorConfig;
pub use sensor_monitor::SensorMonitor;
pub use snapshot::Snapshot;
