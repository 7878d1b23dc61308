//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the interfaces that infrastructure adapters implement:
//! - FileSystem: stat, create, rename, remove and append-open of log files
//! - Clock: wall-clock date and time
//!
//! The rotation engine depends only on these traits, so tests can substitute
//! a manual clock or a file system that fails on demand.

pub mod clock;
pub mod file_system;

pub use clock::Clock;
pub use file_system::FileSystem;
