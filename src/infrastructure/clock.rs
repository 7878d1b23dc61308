//! Clock adapters

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use parking_lot::Mutex;

use crate::domain::ports::Clock;

/// Wall clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock whose date only moves when told to.
///
/// Used to drive daily rotation deterministically. The time of day reported
/// by `now()` is the real local time placed on the manual date.
///
/// ```
/// use chrono::NaiveDate;
/// use rollover::{Clock, ManualClock};
///
/// let clock = ManualClock::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
/// clock.advance_days(1);
/// assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
/// ```
#[derive(Debug)]
pub struct ManualClock {
    date: Mutex<NaiveDate>,
}

impl ManualClock {
    /// Start the clock on `date`
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Mutex::new(date),
        }
    }

    /// Jump to `date`
    pub fn set_date(&self, date: NaiveDate) {
        *self.date.lock() = date;
    }

    /// Move the date forward by `days`
    pub fn advance_days(&self, days: u64) {
        let mut date = self.date.lock();
        if let Some(next) = date.checked_add_days(chrono::Days::new(days)) {
            *date = next;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        let date = *self.date.lock();
        let time = Local::now().time();
        Local
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .unwrap_or_else(Local::now)
    }

    fn today(&self) -> NaiveDate {
        *self.date.lock()
    }
}
