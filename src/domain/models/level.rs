//! Severity levels

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::LoggerError;

/// Severity level for log lines and for the logger's threshold.
///
/// Levels are ordered from least to most severe:
/// `All < Debug < Info < Warning < Error < Fatal < Off`.
///
/// `All` and `Off` only make sense as a threshold: `All` lets everything
/// through and `Off` suppresses every write. Writing a line at either of them
/// is rejected.
///
/// # Examples
///
/// ```
/// use rollover::Level;
///
/// assert!(Level::Error > Level::Info);
/// assert!(Level::All < Level::Debug);
/// assert_eq!(Level::Warning.tag(), "[WARNING]");
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Level {
    /// Threshold that lets every level through
    All = 0,
    /// Diagnostic detail useful during development
    #[default]
    Debug = 1,
    /// Normal operational messages
    Info = 2,
    /// Something unexpected that the program recovered from
    #[serde(alias = "warn")]
    Warning = 3,
    /// A failed operation
    Error = 4,
    /// A severe failure; purely a label, the process keeps running
    Fatal = 5,
    /// Threshold that suppresses every write
    Off = 6,
}

impl Level {
    /// Upper-case name of the level
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
            Self::Off => "OFF",
        }
    }

    /// Bracketed tag written in front of every line, e.g. `[INFO]`
    pub const fn tag(self) -> &'static str {
        match self {
            Self::All => "[ALL]",
            Self::Debug => "[DEBUG]",
            Self::Info => "[INFO]",
            Self::Warning => "[WARNING]",
            Self::Error => "[ERROR]",
            Self::Fatal => "[FATAL]",
            Self::Off => "[OFF]",
        }
    }

    /// Whether a line may be written at this level.
    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::All | Self::Off)
    }

    pub(crate) const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::All,
            1 => Self::Debug,
            2 => Self::Info,
            3 => Self::Warning,
            4 => Self::Error,
            5 => Self::Fatal,
            _ => Self::Off,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "fatal" => Ok(Self::Fatal),
            "off" => Ok(Self::Off),
            _ => Err(LoggerError::InvalidLevel(s.to_string())),
        }
    }
}
