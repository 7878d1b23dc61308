//! Stderr console mirror

use console::{style, StyledObject, Term};

use crate::domain::models::Level;

/// Stderr mirror of the log file.
///
/// Lines are prefixed with their own timestamp and carry a colored level tag.
/// Colors are dropped automatically when stderr is not a terminal.
#[derive(Debug, Clone)]
pub struct ConsoleSink {
    term: Term,
}

impl ConsoleSink {
    /// Sink writing to the process's stderr
    pub fn stderr() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    /// Echo one line.
    ///
    /// `timestamp` and `location` are written verbatim; `message` must not
    /// carry its trailing newline.
    pub fn echo(&self, timestamp: &str, level: Level, location: &str, message: &str) {
        let line = format!(
            "{timestamp} {} {location}: {message}",
            styled_tag(level)
        );
        // Console output is best effort; the file is the record
        let _ = self.term.write_line(&line);
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::stderr()
    }
}

fn styled_tag(level: Level) -> StyledObject<&'static str> {
    let tag = style(level.tag()).for_stderr();
    match level {
        Level::Debug => tag.cyan(),
        Level::Info => tag.green(),
        Level::Warning => tag.yellow(),
        Level::Error => tag.red(),
        Level::Fatal => tag.red().bold(),
        Level::All | Level::Off => tag.dim(),
    }
}
