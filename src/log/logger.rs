use crate::{
    config::Config,
    log::{log_level::LogLevel, log_msg::LogMsg, logger_handle::LoggerHandle},
};

use std::{
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, SyncSender, TrySendError},
    thread::{self, JoinHandle},
    time::{SystemTime, UNIX_EPOCH},
};

/// Flush every 100 lines when debugging so a crash leaves recent lines on disk.
#[cfg(feature = "log-debug")]
const FLUSH_BATCH_SIZE: u32 = 100;

/// Flush every 1000 lines otherwise; per-datagram warnings can be frequent.
#[cfg(not(feature = "log-debug"))]
const FLUSH_BATCH_SIZE: u32 = 1_000;

const LOGGING_SECTION: &str = "Logging";
const FALLBACK_FILE: &str = "sensorlink-fallback.log";

/// Bounded, non-blocking logger writing to a per-process log file.
///
/// Producers enqueue through [`LoggerHandle`]; a dedicated `logger-worker`
/// thread writes and flushes. Warn/error lines, plus one in every
/// `sample_every` of the rest, are also forwarded to a small UI channel so the
/// monitor window can show recent activity without being flooded.
pub struct Logger {
    handle: LoggerHandle,
    ui_log_rx: Receiver<String>,
    _thread: Option<JoinHandle<()>>,
    file_path: PathBuf,
}

impl Logger {
    /// Starts the logger for the monitor application.
    ///
    /// Reads `monitor_log_filename` and `monitor_log_path` from `[Logging]`;
    /// without a path the file goes to `logs/` next to the executable.
    #[must_use]
    pub fn start_monitor(cap: usize, ui_cap: usize, sample_every: u32, config: &Config) -> Self {
        let app_name = config
            .get_non_empty(LOGGING_SECTION, "monitor_log_filename")
            .or(Some("sensor-monitor"));

        match config.get_non_empty(LOGGING_SECTION, "monitor_log_path") {
            Some(dir) => Self::start_in_dir(expand_path(dir), app_name, cap, ui_cap, sample_every),
            None => Self::start_in_dir(
                exe_dir_fallback_cwd().join("logs"),
                app_name,
                cap,
                ui_cap,
                sample_every,
            ),
        }
    }

    /// Starts the logger in `dir`, creating it if missing.
    ///
    /// The file is named `<app>-<YYYYMMDD_HHMMSS>-pid<PID>.log`. If it cannot
    /// be opened the worker falls back to a temp file, then to a null sink.
    pub fn start_in_dir<D: AsRef<Path>>(
        dir: D,
        app_name: Option<&str>,
        cap: usize,
        ui_cap: usize,
        sample_every: u32,
    ) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let _ = fs::create_dir_all(&dir);

        let sample_every = sample_every.max(1);
        let stamp = format!("{}-pid{}", timestamp_for_filename(), std::process::id());
        let fname = match app_name {
            Some(name) => format!("{name}-{stamp}.log"),
            None => format!("{stamp}.log"),
        };
        let file_path = dir.join(fname);

        let (tx, rx) = mpsc::sync_channel::<LogMsg>(cap);
        let (ui_tx, ui_rx) = mpsc::sync_channel::<String>(ui_cap);

        let worker_path = file_path.clone();
        let _thread = thread::Builder::new()
            .name("logger-worker".into())
            .spawn(move || write_loop(&worker_path, &rx, &ui_tx, sample_every))
            .ok();

        Self {
            handle: LoggerHandle { tx },
            ui_log_rx: ui_rx,
            _thread,
            file_path,
        }
    }

    /// Enqueues a record without blocking; a full queue drops it.
    ///
    /// # Errors
    /// Returns the rejected record when the queue is full or the worker is gone.
    pub fn try_log<S: Into<String>>(
        &self,
        level: LogLevel,
        text: S,
        target: &'static str,
    ) -> Result<(), TrySendError<LogMsg>> {
        self.handle.try_log(level, text, target)
    }

    /// Cloneable sink for other components and threads.
    #[must_use]
    pub fn handle(&self) -> LoggerHandle {
        self.handle.clone()
    }

    /// One sampled line for UI display, if any is pending.
    #[must_use]
    pub fn try_recv_ui(&self) -> Option<String> {
        self.ui_log_rx.try_recv().ok()
    }

    #[must_use]
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

fn open_writer(path: &Path) -> Box<dyn Write + Send> {
    let open = |p: &Path| OpenOptions::new().create(true).append(true).open(p);
    if let Ok(f) = open(path) {
        return Box::new(f);
    }
    match open(&std::env::temp_dir().join(FALLBACK_FILE)) {
        Ok(f) => Box::new(f),
        Err(_) => Box::new(io::sink()),
    }
}

fn write_loop(path: &Path, rx: &Receiver<LogMsg>, ui_tx: &SyncSender<String>, sample_every: u32) {
    let mut out = BufWriter::new(open_writer(path));
    let mut sampled: u32 = 0;
    let mut lines_written: u32 = 0;
    let mut dropped_to_ui: usize = 0;

    while let Ok(m) = rx.recv() {
        let _ = writeln!(&mut out, "{}", m.file_line());
        lines_written = lines_written.wrapping_add(1);
        if lines_written.is_multiple_of(FLUSH_BATCH_SIZE) {
            let _ = out.flush();
        }

        let forward = matches!(m.level, LogLevel::Warn | LogLevel::Error) || {
            sampled = sampled.wrapping_add(1);
            sampled.is_multiple_of(sample_every)
        };
        if forward && ui_tx.try_send(format!("[{}] {}", m.level, m.text)).is_err() {
            dropped_to_ui += 1;
        }
        if dropped_to_ui >= 10 {
            let _ = ui_tx.try_send(format!("(logger) UI log queue dropped {dropped_to_ui} lines"));
            dropped_to_ui = 0;
        }
    }

    let _ = out.flush();
}

/// Directory of the running executable, or the working directory.
fn exe_dir_fallback_cwd() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// `YYYYMMDD_HHMMSS` in UTC, or `unix_<secs>` if the date does not fit.
fn timestamp_for_filename() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format_utc(secs)
}

fn format_utc(secs: u64) -> String {
    match civil_from_unix(secs) {
        Some((year, mon, day)) => {
            let tod = secs % 86_400;
            format!(
                "{year:04}{mon:02}{day:02}_{:02}{:02}{:02}",
                tod / 3_600,
                (tod / 60) % 60,
                tod % 60
            )
        }
        None => format!("unix_{secs}"),
    }
}

/// Gregorian (year, month, day) for a UNIX timestamp.
#[allow(clippy::many_single_char_names)]
fn civil_from_unix(secs: u64) -> Option<(i32, u32, u32)> {
    let z = i128::from(secs / 86_400) + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = yoe + era * 400 + i128::from(m <= 2);

    Some((
        i32::try_from(y).ok()?,
        u32::try_from(m).ok()?,
        u32::try_from(d).ok()?,
    ))
}

/// Expands a leading `~` to the user's home directory.
fn expand_path(path_str: &str) -> PathBuf {
    let home = || {
        std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok()
            .map(PathBuf::from)
    };
    if path_str == "~" {
        if let Some(h) = home() {
            return h;
        }
    }
    if let Some(rest) = path_str
        .strip_prefix("~/")
        .or_else(|| path_str.strip_prefix("~\\"))
    {
        if let Some(h) = home() {
            return h.join(rest);
        }
    }
    PathBuf::from(path_str)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn formats_known_timestamps() {
        assert_eq!(format_utc(0), "19700101_000000");
        // 2024-02-29 12:34:56 UTC
        assert_eq!(format_utc(1_709_210_096), "20240229_123456");
    }

    #[test]
    fn expand_path_leaves_plain_paths() {
        assert_eq!(expand_path("/var/log/x"), PathBuf::from("/var/log/x"));
        assert_eq!(expand_path("logs"), PathBuf::from("logs"));
    }

    #[test]
    fn warnings_are_forwarded_to_ui() {
        let dir = std::env::temp_dir().join("sensorlink_logger_test");
        let logger = Logger::start_in_dir(&dir, Some("unit"), 16, 16, 1_000);
        assert!(logger.file_path().starts_with(&dir));
        assert!(
            logger
                .file_path()
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("unit-") && n.ends_with(".log"))
        );

        logger
            .try_log(LogLevel::Info, "sampled away", "test::target")
            .expect("queue has room");
        logger
            .try_log(LogLevel::Warn, "bad datagram", "test::target")
            .expect("queue has room");

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut seen = None;
        while Instant::now() < deadline {
            if let Some(line) = logger.try_recv_ui() {
                seen = Some(line);
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(seen.as_deref(), Some("[WARN] bad datagram"));
    }
}
