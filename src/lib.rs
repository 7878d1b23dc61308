//! Rollover - leveled file logging with rotation
//!
//! A process-local logger that appends timestamped, leveled lines to a single
//! active file and archives that file by calendar day or by size.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **Domain Layer** (`domain`): levels, rotation modes, configuration and errors,
//!   plus the `FileSystem` and `Clock` ports
//! - **Service Layer** (`services`): the rotation engine, the background monitor
//!   and the [`Logger`] façade
//! - **Infrastructure Layer** (`infrastructure`): `std::fs` and system clock
//!   adapters, figment configuration loading, console echo and the `tracing`
//!   fallback sink for errors the logger cannot report to its caller
//!
//! # Example
//!
//! ```no_run
//! use rollover::{FallbackConfig, FallbackSink, Level, Logger};
//!
//! fn main() -> anyhow::Result<()> {
//!     // Where rotation failures and dropped lines get reported
//!     let _fallback = FallbackSink::init(&FallbackConfig::default())?;
//!
//!     let logger = Logger::open_daily("/var/log/myapp", "myapp.log")?;
//!     logger.set_level(Level::Info);
//!     logger.info("service started");
//!     logger.close();
//!     Ok(())
//! }
//! ```

pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::models::{
    FallbackConfig, Level, LogFormat, LoggerConfig, RotationConfig, RotationMode, SizeUnit,
    DATE_FORMAT,
};
pub use domain::ports::{Clock, FileSystem};
pub use domain::{LoggerError, LoggerResult};
pub use infrastructure::clock::{ManualClock, SystemClock};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::fs::StdFileSystem;
pub use infrastructure::logging::{ConsoleSink, FallbackSink};
pub use services::{LogState, Logger, LoggerBuilder, RotationEngine, RotationMonitor};
