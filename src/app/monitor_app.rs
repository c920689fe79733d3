use super::{conn_state::ConnState, gui_error::GuiError, trend_chart::TrendChart};
use crate::{
    acquisition::{
        CHANNEL_COUNT, ClientEvent, ReceiverConfig, SensorClient, sample::Sample,
    },
    config::Config,
    log::{log_sink::LogSink, logger::Logger},
    monitor::{MonitorConfig, SensorMonitor},
    sink_info, sink_warn,
};
use eframe::{App, Frame, egui};
use std::{
    collections::VecDeque,
    sync::{
        Arc,
        mpsc::{Receiver, Sender, channel},
    },
    time::Instant,
};

pub const SENSOR_NAMES: [&str; CHANNEL_COUNT] =
    ["Alcohol", "Air quality", "Humidity", "Radiation"];

const SENSOR_COLORS: [egui::Color32; CHANNEL_COUNT] = [
    egui::Color32::from_rgb(255, 100, 100),
    egui::Color32::from_rgb(100, 255, 100),
    egui::Color32::from_rgb(100, 100, 255),
    egui::Color32::from_rgb(255, 200, 50),
];

const UI_LOG_LINES: usize = 256;

/// Sensor monitor window: connect form, four live values and trend charts.
///
/// Samples arrive on the receive worker and go straight into the shared
/// history; this type only reads the history on its refresh cadence.
pub struct MonitorApp {
    receiver_config: ReceiverConfig,
    monitor_config: MonitorConfig,
    logger: Logger,
    log_sink: Arc<dyn LogSink>,

    client: Option<SensorClient>,
    events_tx: Sender<ClientEvent>,
    events_rx: Receiver<ClientEvent>,

    monitor: SensorMonitor,
    charts: [TrendChart; CHANNEL_COUNT],
    last_refresh: Instant,

    host_input: String,
    port_input: String,
    conn_state: ConnState,
    status_line: String,
    ui_logs: VecDeque<String>,
}

impl MonitorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Arc<Config>) -> Self {
        let receiver_config = ReceiverConfig::from_config(&config);
        let monitor_config = MonitorConfig::from_config(&config);
        let logger = Logger::start_monitor(4_096, 256, 20, &config);
        let log_sink: Arc<dyn LogSink> = Arc::new(logger.handle());
        sink_info!(log_sink, "[MonitorApp] logging to {}", logger.file_path().display());

        let (events_tx, events_rx) = channel();
        let capacity = monitor_config.history_capacity;

        Self {
            host_input: monitor_config.remote_host.clone(),
            port_input: monitor_config.remote_port.to_string(),
            monitor: SensorMonitor::new(capacity),
            charts: std::array::from_fn(|i| TrendChart::new(capacity, SENSOR_COLORS[i])),
            last_refresh: Instant::now(),
            receiver_config,
            monitor_config,
            logger,
            log_sink,
            client: None,
            events_tx,
            events_rx,
            conn_state: ConnState::Disconnected,
            status_line: "Ready.".into(),
            ui_logs: VecDeque::with_capacity(UI_LOG_LINES),
        }
    }

    fn push_log<T: Into<String>>(&mut self, s: T) {
        if self.ui_logs.len() == UI_LOG_LINES {
            self.ui_logs.pop_front();
        }
        self.ui_logs.push_back(s.into());
    }

    fn connect(&mut self) -> Result<(), GuiError> {
        let port: u16 = self
            .port_input
            .trim()
            .parse()
            .map_err(|_| GuiError::InvalidPort(self.port_input.clone()))?;

        let client = SensorClient::new(self.receiver_config.clone(), Arc::clone(&self.log_sink))
            .with_events(self.events_tx.clone());
        client.bind(&self.host_input, port)?;
        self.status_line = match client.local_addr() {
            Some(local) => format!("Listening on {local}."),
            None => "Connected.".into(),
        };
        self.client = Some(client);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<(), GuiError> {
        let client = self.client.take().ok_or(GuiError::NotConnected)?;
        client.stop_receiving()?;
        client.close()?;
        self.status_line = "Disconnected.".into();
        Ok(())
    }

    fn start(&mut self, ctx: &egui::Context) -> Result<(), GuiError> {
        let client = self.client.as_ref().ok_or(GuiError::NotConnected)?;
        let repaint = ctx.clone();
        client.start_receiving(self.monitor.recorder_with_notify(move || repaint.request_repaint()))?;
        self.last_refresh = Instant::now();
        self.status_line = "Monitoring.".into();
        Ok(())
    }

    fn stop(&mut self) -> Result<(), GuiError> {
        let client = self.client.as_ref().ok_or(GuiError::NotConnected)?;
        client.stop_receiving()?;
        let stats = client.stats();
        self.status_line = format!(
            "Stopped. {} samples, {} malformed, {} read errors.",
            stats.delivered, stats.parse_failures, stats.read_errors
        );
        Ok(())
    }

    fn report(&mut self, action: &str, result: Result<(), GuiError>) {
        if let Err(e) = result {
            sink_warn!(self.log_sink, "[MonitorApp] {action} failed: {e}");
            self.status_line = format!("{action} failed: {e}");
        }
    }

    fn poll_events(&mut self) {
        while let Ok(ev) = self.events_rx.try_recv() {
            self.conn_state = match ev {
                ClientEvent::Connected(_) => ConnState::Connected,
                ClientEvent::MonitoringStarted => ConnState::Monitoring,
                ClientEvent::MonitoringStopped => ConnState::Connected,
                ClientEvent::Disconnected => ConnState::Disconnected,
            };
        }
        while let Some(line) = self.logger.try_recv_ui() {
            self.push_log(line);
        }
    }

    fn refresh_charts(&mut self) {
        if self.conn_state != ConnState::Monitoring
            || self.last_refresh.elapsed() < self.monitor_config.refresh_interval
        {
            return;
        }
        self.last_refresh = Instant::now();
        if let Some(snapshot) = self.monitor.tick() {
            for (chart, &value) in self.charts.iter_mut().zip(snapshot.values.values()) {
                chart.push(snapshot.tick, value);
            }
        }
    }

    fn connection_panel(&mut self, ui: &mut egui::Ui) {
        let disconnected = self.conn_state == ConnState::Disconnected;
        ui.horizontal(|ui| {
            ui.label("Host:");
            ui.add_enabled(
                disconnected,
                egui::TextEdit::singleline(&mut self.host_input).desired_width(140.0),
            );
            ui.add_space(10.0);
            ui.label("Port:");
            ui.add_enabled(
                disconnected,
                egui::TextEdit::singleline(&mut self.port_input).desired_width(60.0),
            );
        });
        ui.horizontal(|ui| {
            if ui.add_enabled(disconnected, egui::Button::new("Connect")).clicked() {
                let r = self.connect();
                self.report("Connect", r);
            }
            if ui
                .add_enabled(!disconnected, egui::Button::new("Disconnect"))
                .clicked()
            {
                let r = self.disconnect();
                self.report("Disconnect", r);
            }
            if ui
                .add_enabled(
                    self.conn_state == ConnState::Connected,
                    egui::Button::new("Start monitoring"),
                )
                .clicked()
            {
                let r = self.start(ui.ctx());
                self.report("Start", r);
            }
            if ui
                .add_enabled(
                    self.conn_state == ConnState::Monitoring,
                    egui::Button::new("Stop monitoring"),
                )
                .clicked()
            {
                let r = self.stop();
                self.report("Stop", r);
            }
            ui.label(format!("State: {:?}", self.conn_state));
        });
    }

    fn sensor_grid(&self, ui: &mut egui::Ui, latest: Option<Sample>) {
        let cell = egui::vec2(
            (ui.available_width() / 2.0 - 12.0).max(200.0),
            (ui.available_height() / 2.0 - 60.0).max(120.0),
        );
        egui::Grid::new("sensor_grid")
            .num_columns(2)
            .spacing([12.0, 12.0])
            .show(ui, |ui| {
                for (i, chart) in self.charts.iter().enumerate() {
                    ui.vertical(|ui| {
                        ui.label(format!("{} current value:", SENSOR_NAMES[i]));
                        let text = latest
                            .and_then(|s| s.channel(i))
                            .map_or_else(|| "0.00".to_string(), |v| format!("{v:.2}"));
                        ui.label(egui::RichText::new(text).size(20.0).strong());
                        chart.show(ui, cell);
                    });
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });
    }
}

impl App for MonitorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_events();
        self.refresh_charts();

        egui::TopBottomPanel::top("connection").show(ctx, |ui| {
            ui.heading("Sensor monitor");
            self.connection_panel(ui);
            ui.label(&self.status_line);
        });

        egui::TopBottomPanel::bottom("logs")
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .max_height(120.0)
                    .show(ui, |ui| {
                        for line in &self.ui_logs {
                            ui.monospace(line);
                        }
                    });
            });

        let latest = self.monitor.history().latest();
        egui::CentralPanel::default().show(ctx, |ui| {
            self.sensor_grid(ui, latest);
        });

        if self.conn_state == ConnState::Monitoring {
            ctx.request_repaint_after(self.monitor_config.refresh_interval);
        }
    }
}
