//! Logging infrastructure
//!
//! The sinks a rollover logger writes to besides its own file:
//! - Console mirror on stderr
//! - Fallback sink for the logger's own diagnostics (tracing-subscriber,
//!   JSON or pretty, optional file through tracing-appender)

mod console;
mod fallback;

pub use console::ConsoleSink;
pub use fallback::{FallbackSink, FALLBACK_FILE_NAME};
pub(crate) use fallback::parse_log_level;
