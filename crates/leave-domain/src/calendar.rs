//! Date arithmetic used by the ledger and the planners.
//!
//! Every weekday test, day offset, and label in the workspace goes through
//! these helpers so the accounting rules never depend on a particular date
//! library call site.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

const ISO_FORMAT: &str = "%Y-%m-%d";

/// Error returned when a string is not a `YYYY-MM-DD` calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateParseError {
    pub input: String,
}

impl fmt::Display for DateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a valid date (expected YYYY-MM-DD)", self.input)
    }
}

impl std::error::Error for DateParseError {}

/// Parses an ISO `YYYY-MM-DD` date.
pub fn parse_iso(value: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(value.trim(), ISO_FORMAT).map_err(|_| DateParseError {
        input: value.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// True for Saturdays and Sundays.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Full English weekday name, e.g. `Monday`.
pub fn day_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Signed number of calendar days from `start` to `end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Inclusive calendar-day count of `[start, end]`; zero when `end < start`.
pub fn inclusive_span(start: NaiveDate, end: NaiveDate) -> u32 {
    let diff = days_between(start, end);
    if diff < 0 {
        0
    } else {
        (diff + 1) as u32
    }
}

/// Every date of `[start, end]` in order. Empty when `end < start`.
pub fn dates_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .collect()
}

/// Number of Saturdays and Sundays in `[start, end]`.
pub fn weekend_days_in_range(start: NaiveDate, end: NaiveDate) -> u32 {
    dates_in_range(start, end)
        .into_iter()
        .filter(|date| is_weekend(*date))
        .count() as u32
}

/// `14 Mar`
pub fn short_label(date: NaiveDate) -> String {
    date.format("%d %b").to_string()
}

/// `14 Mar (Friday)`
pub fn long_label(date: NaiveDate) -> String {
    format!("{} ({})", short_label(date), day_name(date))
}

/// `March 2025`
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}
