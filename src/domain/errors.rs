//! Domain errors for the rollover logger.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while opening, rotating or writing a log file.
///
/// Only construction surfaces these to callers. Rotation and write errors are
/// reported through the `tracing` fallback sink and swallowed.
#[derive(Debug, Error)]
pub enum LoggerError {
    /// The log directory could not be created
    #[error("Failed to create log directory {path}: {source}")]
    CreateDirectory {
        /// Directory that was being created
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The active file could not be opened for appending
    #[error("Failed to open log file {path}: {source}")]
    OpenFile {
        /// Active file path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// A fresh active file could not be created after rotation
    #[error("Failed to create log file {path}: {source}")]
    CreateFile {
        /// Active file path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The active file could not be moved to its backup name
    #[error("Failed to rename {from} to {to}: {source}")]
    Rename {
        /// Active file path
        from: PathBuf,
        /// Backup path
        to: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The backup occupying the next ring slot could not be removed
    #[error("Failed to remove backup {path}: {source}")]
    RemoveBackup {
        /// Backup path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Appending a line failed
    #[error("Failed to write log line: {0}")]
    Write(#[source] io::Error),

    /// The last reopen failed, so there is no file to write to
    #[error("No active log file is open")]
    NoActiveFile,

    /// The logger was closed
    #[error("Logger is closed")]
    Closed,

    /// A level name that does not parse
    #[error("Invalid log level: {0}. Must be one of: all, debug, info, warning, error, fatal, off")]
    InvalidLevel(String),

    /// A write at `All` or `Off`
    #[error("Level {0} is a threshold and cannot be written")]
    UnwritableLevel(String),

    /// Formatting or writing a line panicked
    #[error("Log write panicked: {0}")]
    WritePanicked(String),

    /// Rotation settings the engine cannot work with
    #[error("Invalid rotation settings: {0}")]
    InvalidRotation(String),

    /// The monitor thread could not be started
    #[error("Failed to spawn rotation monitor: {0}")]
    SpawnMonitor(#[source] io::Error),
}

/// Result alias for logger operations
pub type LoggerResult<T> = Result<T, LoggerError>;
