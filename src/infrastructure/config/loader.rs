//! figment-based configuration loader

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::LoggerConfig;
use crate::infrastructure::logging::parse_log_level;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "rollover.yaml";

/// Prefix of environment variables overriding configuration values
pub const ENV_PREFIX: &str = "ROLLOVER_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `filename` is empty
    #[error("Log filename cannot be empty")]
    EmptyFilename,

    /// `filename` contains a path separator or is `.`/`..`
    #[error("Invalid log filename: {0}. Must be a plain file name without path separators")]
    InvalidFilename(String),

    /// The rotation block does not resolve to a usable mode
    #[error("Invalid rotation: {0}")]
    InvalidRotation(String),

    /// `monitor_interval_ms` is zero
    #[error("Invalid monitor_interval_ms: {0}. Must be at least 1")]
    InvalidMonitorInterval(u64),

    /// `fallback.level` is not a tracing level
    #[error("Invalid fallback level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidFallbackLevel(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `rollover.yaml` in the working directory (optional)
    /// 3. Environment variables (`ROLLOVER_*` prefix, `__` separates nesting)
    pub fn load() -> Result<LoggerConfig> {
        Self::load_from_file(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file, still honoring environment
    /// overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<LoggerConfig> {
        let config: LoggerConfig = Figment::new()
            .merge(Serialized::defaults(LoggerConfig::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &LoggerConfig) -> Result<(), ConfigError> {
        if config.filename.is_empty() {
            return Err(ConfigError::EmptyFilename);
        }

        if config.filename.contains(['/', '\\']) || config.filename == "." || config.filename == ".."
        {
            return Err(ConfigError::InvalidFilename(config.filename.clone()));
        }

        config
            .rotation
            .to_mode()
            .map_err(|e| ConfigError::InvalidRotation(e.to_string()))?;

        if config.monitor_interval_ms == 0 {
            return Err(ConfigError::InvalidMonitorInterval(config.monitor_interval_ms));
        }

        if parse_log_level(&config.fallback.level).is_err() {
            return Err(ConfigError::InvalidFallbackLevel(
                config.fallback.level.clone(),
            ));
        }

        Ok(())
    }
}
