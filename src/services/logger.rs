//! Leveled file logger with rotation
//!
//! [`Logger`] owns the active log file and the rotation state behind a single
//! reader/writer lock:
//! - writes take the lock shared and append one complete line per call
//! - rotation takes it exclusively and re-checks whether it is still due
//! - a size-bounded logger runs a [`RotationMonitor`] thread that checks once
//!   per interval; a daily logger checks inline on every write
//!
//! Nothing downstream of construction is reported to the caller. Failed or
//! panicking writes and failed rotations are emitted as `tracing` events and
//! the line is dropped.

use parking_lot::{Mutex, RwLock};
use std::fmt::{self, Display};
use std::fs::File;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe, Location};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::rotation_engine::{LogState, RotationEngine};
use super::rotation_monitor::{RotationMonitor, DEFAULT_MONITOR_INTERVAL};
use crate::domain::errors::{LoggerError, LoggerResult};
use crate::domain::models::{Level, LoggerConfig, RotationMode, SizeUnit};
use crate::domain::ports::{Clock, FileSystem};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::fs::StdFileSystem;
use crate::infrastructure::logging::ConsoleSink;

/// Timestamp prefix of every line, e.g. `2024/03/01 14:03:27`
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// State shared between the logger handle and its monitor thread
#[derive(Debug)]
struct Shared {
    engine: RotationEngine,
    state: RwLock<LogState>,
    level: AtomicU8,
    console_enabled: AtomicBool,
    console: ConsoleSink,
}

impl Shared {
    /// Probe under the read lock, rotate under the write lock.
    fn check_rotation(&self) -> bool {
        let due = {
            let state = self.state.read();
            self.engine.must_rotate(&state)
        };
        if !due {
            return false;
        }

        let mut state = self.state.write();
        match self.engine.rotate(&mut state) {
            Ok(rotated) => rotated,
            Err(e) => {
                debug!(error = %e, "log rotation finished with errors");
                true
            }
        }
    }

    fn append(
        &self,
        level: Level,
        location: &Location<'_>,
        message: &dyn Display,
    ) -> LoggerResult<()> {
        let timestamp = self.engine.clock().now().format(TIMESTAMP_FORMAT).to_string();
        let caller = format!("{}:{}", short_file(location.file()), location.line());
        let body = message.to_string();
        let line = format_line(&timestamp, level, &caller, &body);

        let state = self.state.read();
        if state.closed {
            return Err(LoggerError::Closed);
        }
        let mut file: &File = state.file.as_ref().ok_or(LoggerError::NoActiveFile)?;
        file.write_all(line.as_bytes()).map_err(LoggerError::Write)?;

        if self.console_enabled.load(Ordering::Relaxed) {
            self.console
                .echo(&timestamp, level, &caller, body.trim_end_matches('\n'));
        }
        Ok(())
    }
}

/// A leveled logger writing to `directory/filename` with optional rotation.
///
/// The handle is `Send + Sync`; share it between threads behind an `Arc`.
///
/// # Examples
///
/// ```no_run
/// use rollover::{log_at, Level, Logger, SizeUnit};
///
/// # fn main() -> rollover::LoggerResult<()> {
/// let logger = Logger::open_size_bounded("/var/log/myapp", "myapp.log", 10, 100, SizeUnit::Mb)?;
/// logger.set_level(Level::Info);
///
/// logger.info("service started");
/// logger.warningln(&[&"disk usage at", &93, &"percent"]);
/// log_at!(logger, Level::Error, "request {} failed after {}ms", 42, 1500);
///
/// logger.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Logger {
    shared: Arc<Shared>,
    monitor: Mutex<Option<RotationMonitor>>,
}

impl Logger {
    /// Open `dir/name` without rotation
    pub fn open_plain(dir: impl Into<PathBuf>, name: impl Into<String>) -> LoggerResult<Self> {
        LoggerBuilder::new(dir, name).open()
    }

    /// Open `dir/name`, archiving it once per calendar day as `name.<YYYY-MM-DD>`
    pub fn open_daily(dir: impl Into<PathBuf>, name: impl Into<String>) -> LoggerResult<Self> {
        LoggerBuilder::new(dir, name)
            .rotation(RotationMode::Daily)
            .open()
    }

    /// Open `dir/name`, rotating into `name.1 ..= name.<max_backups>` once the
    /// file reaches `max_size` `unit`s
    pub fn open_size_bounded(
        dir: impl Into<PathBuf>,
        name: impl Into<String>,
        max_backups: u32,
        max_size: u64,
        unit: SizeUnit,
    ) -> LoggerResult<Self> {
        LoggerBuilder::new(dir, name)
            .rotation(RotationMode::size_bounded(max_backups, max_size, unit)?)
            .open()
    }

    /// Open a logger from loaded configuration
    pub fn from_config(config: &LoggerConfig) -> LoggerResult<Self> {
        LoggerBuilder::new(config.directory.clone(), config.filename.clone())
            .rotation(config.rotation.to_mode()?)
            .level(config.level)
            .console(config.console)
            .monitor_interval(config.monitor_interval())
            .open()
    }

    /// Start building a logger for `dir/name`
    pub fn builder(dir: impl Into<PathBuf>, name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(dir, name)
    }

    /// Current level threshold
    pub fn level(&self) -> Level {
        Level::from_u8(self.shared.level.load(Ordering::Relaxed))
    }

    /// Set the minimum level that is written
    pub fn set_level(&self, level: Level) {
        let _state = self.shared.state.write();
        self.shared.level.store(level as u8, Ordering::Relaxed);
    }

    /// Whether lines are mirrored to stderr
    pub fn console(&self) -> bool {
        self.shared.console_enabled.load(Ordering::Relaxed)
    }

    /// Enable or disable the stderr mirror
    pub fn set_console(&self, enabled: bool) {
        let _state = self.shared.state.write();
        self.shared.console_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Path of the active log file
    pub fn active_path(&self) -> &Path {
        self.shared.engine.active_path()
    }

    /// Rotation mode fixed at construction
    pub fn rotation_mode(&self) -> RotationMode {
        self.shared.engine.mode()
    }

    /// Existing backups of the active file, sorted by path
    pub fn backups(&self) -> Vec<PathBuf> {
        let _state = self.shared.state.read();
        self.shared.engine.backups()
    }

    /// Whether the active file is due for rotation right now
    pub fn must_rotate(&self) -> bool {
        let state = self.shared.state.read();
        self.shared.engine.must_rotate(&state)
    }

    /// Run one rotation check, the same one the monitor runs on each tick.
    ///
    /// Returns whether a rotation was attempted. Does nothing, and touches no
    /// file, when rotation is not due.
    pub fn check_rotation(&self) -> bool {
        let shared = &self.shared;
        panic::catch_unwind(AssertUnwindSafe(|| shared.check_rotation())).unwrap_or_else(|_| {
            error!("rotation check panicked");
            false
        })
    }

    /// Stop the monitor and close the active file.
    ///
    /// Later writes are dropped. Calling `close` again has no effect.
    pub fn close(&self) {
        if let Some(monitor) = self.monitor.lock().take() {
            monitor.stop();
        }

        let mut state = self.shared.state.write();
        if state.closed {
            return;
        }
        state.closed = true;
        state.file.take();
        debug!(path = %self.active_path().display(), "log file closed");
    }

    /// Write `message` at `level`.
    ///
    /// `All` and `Off` are thresholds, not write levels; such lines are dropped.
    #[track_caller]
    pub fn log(&self, level: Level, message: impl Display) {
        self.write_at(level, Location::caller(), &message);
    }

    /// Write a debug line
    #[track_caller]
    pub fn debug(&self, message: impl Display) {
        self.write_at(Level::Debug, Location::caller(), &message);
    }

    /// Write an info line
    #[track_caller]
    pub fn info(&self, message: impl Display) {
        self.write_at(Level::Info, Location::caller(), &message);
    }

    /// Write a warning line
    #[track_caller]
    pub fn warning(&self, message: impl Display) {
        self.write_at(Level::Warning, Location::caller(), &message);
    }

    /// Write an error line
    #[track_caller]
    pub fn error(&self, message: impl Display) {
        self.write_at(Level::Error, Location::caller(), &message);
    }

    /// Write a fatal line. The process is not terminated.
    #[track_caller]
    pub fn fatal(&self, message: impl Display) {
        self.write_at(Level::Fatal, Location::caller(), &message);
    }

    /// Write `values` joined by spaces at debug level
    #[track_caller]
    pub fn debugln(&self, values: &[&dyn Display]) {
        self.write_at(Level::Debug, Location::caller(), &Joined(values));
    }

    /// Write `values` joined by spaces at info level
    #[track_caller]
    pub fn infoln(&self, values: &[&dyn Display]) {
        self.write_at(Level::Info, Location::caller(), &Joined(values));
    }

    /// Write `values` joined by spaces at warning level
    #[track_caller]
    pub fn warningln(&self, values: &[&dyn Display]) {
        self.write_at(Level::Warning, Location::caller(), &Joined(values));
    }

    /// Write `values` joined by spaces at error level
    #[track_caller]
    pub fn errorln(&self, values: &[&dyn Display]) {
        self.write_at(Level::Error, Location::caller(), &Joined(values));
    }

    /// Write `values` joined by spaces at fatal level
    #[track_caller]
    pub fn fatalln(&self, values: &[&dyn Display]) {
        self.write_at(Level::Fatal, Location::caller(), &Joined(values));
    }

    fn write_at(&self, level: Level, location: &Location<'_>, message: &dyn Display) {
        if !level.is_writable() {
            warn!(
                error = %LoggerError::UnwritableLevel(level.to_string()),
                "dropping log line"
            );
            return;
        }
        if level < self.level() {
            return;
        }

        let shared = &self.shared;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            if shared.engine.mode().is_daily() {
                shared.check_rotation();
            }
            shared.append(level, location, message)
        }));

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(path = %self.active_path().display(), error = %e, "dropping log line");
            }
            Err(payload) => {
                let e = LoggerError::WritePanicked(panic_message(payload.as_ref()));
                error!(path = %self.active_path().display(), error = %e, "dropping log line");
            }
        }
    }
}

/// Builder for [`Logger`]
///
/// Defaults: no rotation, `Debug` threshold, console mirror on, one-second
/// monitor tick, `std::fs` and the system clock.
#[derive(Debug)]
#[must_use = "call open() to create the logger"]
pub struct LoggerBuilder {
    directory: PathBuf,
    filename: String,
    rotation: RotationMode,
    level: Level,
    console: bool,
    monitor_interval: Duration,
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
}

impl LoggerBuilder {
    /// Builder for `dir/name`
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            directory: dir.into(),
            filename: name.into(),
            rotation: RotationMode::None,
            level: Level::default(),
            console: true,
            monitor_interval: DEFAULT_MONITOR_INTERVAL,
            fs: Arc::new(StdFileSystem::new()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Rotation policy
    pub const fn rotation(mut self, mode: RotationMode) -> Self {
        self.rotation = mode;
        self
    }

    /// Initial level threshold
    pub const fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Initial console mirror setting
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Tick of the background monitor (size-bounded mode only)
    pub const fn monitor_interval(mut self, interval: Duration) -> Self {
        self.monitor_interval = interval;
        self
    }

    /// File system the engine operates on
    pub fn file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Clock used for daily rotation and line timestamps
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Open the active file and, for size-bounded rotation, start the monitor
    pub fn open(self) -> LoggerResult<Logger> {
        self.rotation.validate()?;
        if self.monitor_interval.is_zero() {
            return Err(LoggerError::InvalidRotation(
                "monitor interval must be greater than 0".to_string(),
            ));
        }

        let engine = RotationEngine::new(
            self.rotation,
            self.directory,
            self.filename,
            self.fs,
            self.clock,
        );
        let state = engine.open()?;

        let shared = Arc::new(Shared {
            engine,
            state: RwLock::new(state),
            level: AtomicU8::new(self.level as u8),
            console_enabled: AtomicBool::new(self.console),
            console: ConsoleSink::stderr(),
        });

        let monitor = if self.rotation.is_size_bounded() {
            let checked = Arc::clone(&shared);
            Some(RotationMonitor::spawn(
                "rollover-monitor",
                self.monitor_interval,
                move || {
                    checked.check_rotation();
                },
            )?)
        } else {
            None
        };

        info!(
            path = %shared.engine.active_path().display(),
            rotation = ?self.rotation,
            "log file opened"
        );

        Ok(Logger {
            shared,
            monitor: Mutex::new(monitor),
        })
    }
}

/// Write a formatted line at a given level.
///
/// ```no_run
/// # use rollover::{log_at, Level, Logger};
/// # let logger = Logger::open_plain("logs", "app.log").unwrap();
/// log_at!(logger, Level::Info, "loaded {} entries in {:.1}s", 120, 0.4);
/// ```
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, ::std::format_args!($($arg)+))
    };
}

/// Values joined by single spaces
struct Joined<'a>(&'a [&'a dyn Display]);

impl Display for Joined<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            value.fmt(f)?;
        }
        Ok(())
    }
}

/// `<timestamp> [LEVEL] <file>:<line>: <message>` terminated by one newline
fn format_line(timestamp: &str, level: Level, caller: &str, message: &str) -> String {
    let mut line = format!("{timestamp} {} {caller}: {message}", level.tag());
    if !line.ends_with('\n') {
        line.push('\n');
    }
    line
}

fn short_file(file: &str) -> &str {
    file.rsplit(['/', '\\']).next().unwrap_or(file)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
