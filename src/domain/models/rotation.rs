//! Rotation modes and size units

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::{LoggerError, LoggerResult};

/// Date format used for daily backup suffixes (`app.log.2024-03-01`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unit for size-bounded rotation limits. Units are powers of 1024.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeUnit {
    /// 1024 bytes
    Kb,
    /// 1024² bytes
    Mb,
    /// 1024³ bytes
    Gb,
    /// 1024⁴ bytes
    Tb,
}

impl SizeUnit {
    /// Number of bytes in one unit
    pub const fn bytes(self) -> u64 {
        match self {
            Self::Kb => 1 << 10,
            Self::Mb => 1 << 20,
            Self::Gb => 1 << 30,
            Self::Tb => 1 << 40,
        }
    }
}

/// How the active log file is archived and replaced.
///
/// The mode is fixed when a logger is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    /// The active file grows forever
    #[default]
    None,
    /// Archive once per calendar day as `<name>.<YYYY-MM-DD>`
    Daily,
    /// Archive into a ring of numbered backups `<name>.1 ..= <name>.<max_backups>`
    /// once the active file reaches `max_bytes`
    SizeBounded {
        /// Ring capacity; a ring of 1 disables size rotation
        max_backups: u32,
        /// Size threshold in bytes
        max_bytes: u64,
    },
}

impl RotationMode {
    /// Build a size-bounded mode from a size expressed in `unit`s.
    ///
    /// # Examples
    ///
    /// ```
    /// use rollover::{RotationMode, SizeUnit};
    ///
    /// let mode = RotationMode::size_bounded(10, 100, SizeUnit::Mb).unwrap();
    /// assert_eq!(
    ///     mode,
    ///     RotationMode::SizeBounded { max_backups: 10, max_bytes: 100 * 1024 * 1024 }
    /// );
    /// ```
    pub fn size_bounded(max_backups: u32, max_size: u64, unit: SizeUnit) -> LoggerResult<Self> {
        let max_bytes = max_size.checked_mul(unit.bytes()).ok_or_else(|| {
            LoggerError::InvalidRotation(format!("{max_size} {unit} overflows a byte count"))
        })?;
        let mode = Self::SizeBounded {
            max_backups,
            max_bytes,
        };
        mode.validate()?;
        Ok(mode)
    }

    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> LoggerResult<()> {
        if let Self::SizeBounded {
            max_backups,
            max_bytes,
        } = *self
        {
            if max_backups == 0 {
                return Err(LoggerError::InvalidRotation(
                    "max_backups must be at least 1".to_string(),
                ));
            }
            if max_bytes == 0 {
                return Err(LoggerError::InvalidRotation(
                    "max size must be greater than 0".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Whether this mode needs the background size monitor
    pub const fn is_size_bounded(&self) -> bool {
        matches!(self, Self::SizeBounded { .. })
    }

    /// Whether rotation is checked inline on every write
    pub const fn is_daily(&self) -> bool {
        matches!(self, Self::Daily)
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Kb => "KB",
            Self::Mb => "MB",
            Self::Gb => "GB",
            Self::Tb => "TB",
        };
        f.write_str(name)
    }
}
