//! Infrastructure layer module
//!
//! This module contains the adapters behind the domain ports and the
//! ambient services of the logger:
//! - `std::fs` file system adapter
//! - System and manual clocks
//! - Configuration management
//! - Console and fallback (diagnostics) sinks

pub mod clock;
pub mod config;
pub mod fs;
pub mod logging;
