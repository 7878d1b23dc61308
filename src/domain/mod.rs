//! Domain layer for the rollover logger
//!
//! This module contains the level and rotation models, configuration types,
//! errors, and the port traits the rotation engine depends on.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{LoggerError, LoggerResult};
