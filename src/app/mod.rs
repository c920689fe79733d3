//! eframe front end: connection controls, live values and trend charts.

pub mod conn_state;
pub mod gui_error;
pub mod monitor_app;
pub mod trend_chart;
