//! Monitor window: binds the receiver and charts incoming sensor readings.

use sensorlink::{app::monitor_app::MonitorApp, config::Config};
use std::env;
use std::sync::Arc;

fn main() -> eframe::Result<()> {
    let args: Vec<String> = env::args().collect();

    let config = if let Some(path) = args.get(1) {
        println!("Loading configuration from {path}");
        Config::load(path).unwrap_or_else(|e| {
            eprintln!("Error loading config: {e}. Using defaults.");
            Config::empty()
        })
    } else {
        let (config, used) =
            Config::load_first(&["sensor_monitor.conf", "sensor_monitor_default.conf"]);
        if used.is_none() {
            eprintln!("No configuration file found. Using defaults.");
        }
        config
    };

    let config = Arc::new(config);
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Sensor monitor",
        native_options,
        Box::new(|cc| {
            let app = MonitorApp::new(cc, config);
            Ok(Box::new(app))
        }),
    )
}
