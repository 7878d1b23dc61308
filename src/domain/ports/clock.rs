//! Clock port

use chrono::{DateTime, Local, NaiveDate};
use std::fmt::Debug;

/// Port trait for reading wall-clock time.
///
/// Daily rotation compares calendar dates only, so the engine asks for
/// `today()`; line timestamps use `now()`.
pub trait Clock: Send + Sync + Debug {
    /// Current local date-time
    fn now(&self) -> DateTime<Local>;

    /// Current local calendar date
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
