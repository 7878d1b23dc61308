//! Domain models: levels, rotation modes and configuration

pub mod config;
pub mod level;
pub mod rotation;

pub use config::{FallbackConfig, LogFormat, LoggerConfig, RotationConfig};
pub use level::Level;
pub use rotation::{RotationMode, SizeUnit, DATE_FORMAT};
