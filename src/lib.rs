//! Sensorlink receives four-channel sensor readings sent as comma-separated
//! text over UDP and keeps a bounded history of them for display.
//!
//! It provides two binaries:
//! - `sensor_monitor`: a GUI that binds, starts/stops acquisition and charts the readings.
//! - `sensor_emitter`: a small sender producing frames, for testing without hardware.

/// Socket lifecycle, background receive loop and frame parsing.
pub mod acquisition;
/// GUI front end built on `eframe`.
pub mod app;
/// Configuration file loading.
pub mod config;
/// Frame sender used as a test peer and demo data source.
pub mod emitter;
/// Bounded per-channel sample history.
pub mod history;
/// Logging utilities.
pub mod log;
/// Consumer glue: records samples into history and produces periodic snapshots.
pub mod monitor;
/// Small shared helpers (wall-clock milliseconds).
pub mod utils;
