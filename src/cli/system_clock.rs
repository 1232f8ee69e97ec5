use chrono::{DateTime, Local, NaiveDate, Utc};

use leave_core::Clock;

/// Real-time clock backed by the system time source.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Calendar day in the local time zone; leave is booked by local date.
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
