//! Serde configuration of a logger and its fallback sink

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::level::Level;
use super::rotation::{RotationMode, SizeUnit};
use crate::domain::errors::LoggerResult;

/// Main configuration structure for a rollover logger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggerConfig {
    /// Directory holding the active file and its backups
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Name of the active log file inside `directory`
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Minimum level that is written
    #[serde(default)]
    pub level: Level,

    /// Mirror every line to stderr
    #[serde(default = "default_true")]
    pub console: bool,

    /// Rotation policy
    #[serde(default)]
    pub rotation: RotationConfig,

    /// Tick of the background size monitor, in milliseconds
    #[serde(default = "default_monitor_interval_ms")]
    pub monitor_interval_ms: u64,

    /// Where the logger reports its own failures
    #[serde(default)]
    pub fallback: FallbackConfig,
}

fn default_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_filename() -> String {
    "app.log".to_string()
}

const fn default_true() -> bool {
    true
}

const fn default_monitor_interval_ms() -> u64 {
    1000
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            filename: default_filename(),
            level: Level::default(),
            console: true,
            rotation: RotationConfig::default(),
            monitor_interval_ms: default_monitor_interval_ms(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl LoggerConfig {
    /// Monitor tick as a `Duration`
    pub const fn monitor_interval(&self) -> Duration {
        Duration::from_millis(self.monitor_interval_ms)
    }
}

/// Rotation policy as written in configuration files
///
/// ```yaml
/// rotation:
///   mode: size
///   max_backups: 10
///   max_size: 100
///   unit: mb
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RotationConfig {
    /// Never rotate
    #[default]
    None,
    /// Rotate once per calendar day
    Daily,
    /// Rotate into a ring of numbered backups
    Size {
        /// Ring capacity
        max_backups: u32,
        /// Size threshold, in `unit`s
        max_size: u64,
        /// Unit of `max_size`
        unit: SizeUnit,
    },
}

impl RotationConfig {
    /// Resolve into the engine's rotation mode
    pub fn to_mode(self) -> LoggerResult<RotationMode> {
        match self {
            Self::None => Ok(RotationMode::None),
            Self::Daily => Ok(RotationMode::Daily),
            Self::Size {
                max_backups,
                max_size,
                unit,
            } => RotationMode::size_bounded(max_backups, max_size, unit),
        }
    }
}

/// Configuration of the fallback sink, where the logger reports its own
/// failures (rotation errors, dropped writes) through `tracing`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format (json, pretty)
    #[serde(default = "default_format")]
    pub format: LogFormat,

    /// Directory for the diagnostics file (optional, if None only stderr is used)
    pub log_dir: Option<PathBuf>,

    /// Enable stderr output
    #[serde(default = "default_true")]
    pub enable_stderr: bool,
}

/// Output format of the fallback sink's stderr layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Human-readable multi-field lines
    Pretty,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            log_dir: None,
            enable_stderr: true,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

const fn default_format() -> LogFormat {
    LogFormat::Pretty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::default();
        assert_eq!(config.filename, "app.log");
        assert_eq!(config.level, Level::Debug);
        assert!(config.console);
        assert_eq!(config.rotation, RotationConfig::None);
        assert_eq!(config.monitor_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_yaml_size_rotation() {
        let yaml = r"
directory: /var/log/app
filename: service.log
level: warning
console: false
rotation:
  mode: size
  max_backups: 5
  max_size: 10
  unit: mb
";
        let config: LoggerConfig = serde_yaml::from_str(yaml).expect("YAML should parse");
        assert_eq!(config.directory, PathBuf::from("/var/log/app"));
        assert_eq!(config.level, Level::Warning);
        assert!(!config.console);
        assert_eq!(
            config.rotation.to_mode().unwrap(),
            RotationMode::SizeBounded {
                max_backups: 5,
                max_bytes: 10 * 1024 * 1024
            }
        );
    }

    #[test]
    fn test_yaml_fallback_block() {
        let yaml = r"
fallback:
  level: debug
  format: json
  log_dir: /var/log/app/diagnostics
";
        let config: LoggerConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.fallback.level, "debug");
        assert_eq!(config.fallback.format, LogFormat::Json);
        assert_eq!(
            config.fallback.log_dir,
            Some(PathBuf::from("/var/log/app/diagnostics"))
        );
        assert!(config.fallback.enable_stderr);

        let defaults = LoggerConfig::default().fallback;
        assert_eq!(defaults.level, "warn");
        assert_eq!(defaults.format, LogFormat::Pretty);
        assert!(defaults.log_dir.is_none());
    }

    #[test]
    fn test_yaml_daily_rotation() {
        let config: LoggerConfig = serde_yaml::from_str("rotation:\n  mode: daily\n").unwrap();
        assert_eq!(config.rotation.to_mode().unwrap(), RotationMode::Daily);
    }
}
