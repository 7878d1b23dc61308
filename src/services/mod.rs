//! Service layer: rotation engine, background monitor and the logger façade

pub mod logger;
pub mod rotation_engine;
pub mod rotation_monitor;

pub use logger::{Logger, LoggerBuilder, TIMESTAMP_FORMAT};
pub use rotation_engine::{LogState, RotationEngine};
pub use rotation_monitor::{RotationMonitor, DEFAULT_MONITOR_INTERVAL};
