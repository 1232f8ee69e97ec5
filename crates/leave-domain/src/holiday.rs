//! Static holiday reference data.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar;

/// Category of a public holiday in the published list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HolidayKind {
    Compulsory,
    Additional,
    Declared,
}

impl fmt::Display for HolidayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HolidayKind::Compulsory => "Compulsory",
            HolidayKind::Additional => "Additional",
            HolidayKind::Declared => "Declared",
        };
        f.write_str(label)
    }
}

impl FromStr for HolidayKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compulsory" => Ok(HolidayKind::Compulsory),
            "additional" => Ok(HolidayKind::Additional),
            "declared" => Ok(HolidayKind::Declared),
            other => Err(format!("unknown holiday type `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Holiday {
    pub date: NaiveDate,
    pub day: String,
    #[serde(rename = "type")]
    pub kind: HolidayKind,
    pub name: String,
    pub weekend: bool,
}

impl Holiday {
    /// Builds a holiday entry, deriving the weekday name and weekend flag from `date`.
    pub fn new(date: NaiveDate, kind: HolidayKind, name: impl Into<String>) -> Self {
        Self {
            date,
            day: calendar::day_name(date).to_string(),
            kind,
            name: name.into(),
            weekend: calendar::is_weekend(date),
        }
    }
}

/// An optional holiday the employee may pick (at most two per year).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RestrictedHoliday {
    pub date: NaiveDate,
    pub day: String,
    pub name: String,
}

impl RestrictedHoliday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            day: calendar::day_name(date).to_string(),
            name: name.into(),
        }
    }
}

/// Filter used by the holiday listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HolidayFilter {
    #[default]
    All,
    Weekend,
    Kind(HolidayKind),
}

impl FromStr for HolidayFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(HolidayFilter::All),
            "weekend" => Ok(HolidayFilter::Weekend),
            other => other.parse().map(HolidayFilter::Kind),
        }
    }
}

/// Immutable holiday and restricted-holiday tables for one year.
///
/// Input order is not trusted; lookups scan and listings sort by date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    pub year: i32,
    holidays: Vec<Holiday>,
    restricted: Vec<RestrictedHoliday>,
}

impl HolidayCalendar {
    pub fn new(year: i32, holidays: Vec<Holiday>, restricted: Vec<RestrictedHoliday>) -> Self {
        Self {
            year,
            holidays,
            restricted,
        }
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    pub fn restricted_holidays(&self) -> &[RestrictedHoliday] {
        &self.restricted
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.iter().any(|holiday| holiday.date == date)
    }

    pub fn holiday_on(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.iter().find(|holiday| holiday.date == date)
    }

    pub fn restricted_on(&self, date: NaiveDate) -> Option<&RestrictedHoliday> {
        self.restricted.iter().find(|holiday| holiday.date == date)
    }

    /// Holidays ordered by date.
    pub fn sorted_holidays(&self) -> Vec<&Holiday> {
        let mut sorted: Vec<&Holiday> = self.holidays.iter().collect();
        sorted.sort_by_key(|holiday| holiday.date);
        sorted
    }

    /// Restricted holidays ordered by date.
    pub fn sorted_restricted(&self) -> Vec<&RestrictedHoliday> {
        let mut sorted: Vec<&RestrictedHoliday> = self.restricted.iter().collect();
        sorted.sort_by_key(|holiday| holiday.date);
        sorted
    }

    /// Holidays matching `filter`, ordered by date.
    pub fn filter(&self, filter: HolidayFilter) -> Vec<&Holiday> {
        self.sorted_holidays()
            .into_iter()
            .filter(|holiday| match filter {
                HolidayFilter::All => true,
                HolidayFilter::Weekend => holiday.weekend,
                HolidayFilter::Kind(kind) => holiday.kind == kind,
            })
            .collect()
    }

    /// Dates that appear more than once in the holiday table.
    pub fn duplicate_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.holidays.iter().map(|h| h.date).collect();
        dates.sort();
        let mut duplicates: Vec<NaiveDate> = dates
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
            .collect();
        duplicates.dedup();
        duplicates
    }

    /// The published 2025 gazetted and restricted holiday lists.
    pub fn india_2025() -> Self {
        let year = 2025;
        let holidays = HOLIDAYS_2025
            .iter()
            .filter_map(|(month, day, kind, name)| {
                NaiveDate::from_ymd_opt(year, *month, *day).map(|date| Holiday::new(date, *kind, *name))
            })
            .collect();
        let restricted = RESTRICTED_2025
            .iter()
            .filter_map(|(month, day, name)| {
                NaiveDate::from_ymd_opt(year, *month, *day)
                    .map(|date| RestrictedHoliday::new(date, *name))
            })
            .collect();
        Self::new(year, holidays, restricted)
    }

    /// True when `date` falls in the calendar's year.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date.year() == self.year
    }
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::india_2025()
    }
}

const HOLIDAYS_2025: &[(u32, u32, HolidayKind, &str)] = &[
    (1, 26, HolidayKind::Compulsory, "Republic Day"),
    (2, 26, HolidayKind::Declared, "Maha Shivaratri"),
    (3, 14, HolidayKind::Additional, "Holi"),
    (3, 31, HolidayKind::Compulsory, "Idu'l Fitr"),
    (4, 10, HolidayKind::Compulsory, "Mahavir Jayanti"),
    (4, 14, HolidayKind::Declared, "Birthday of Dr. B.R. Ambedkar"),
    (4, 18, HolidayKind::Compulsory, "Good Friday"),
    (5, 12, HolidayKind::Compulsory, "Buddha Purnima"),
    (6, 7, HolidayKind::Compulsory, "Id-uz-Zuha (Bakrid)"),
    (7, 6, HolidayKind::Compulsory, "Muharram"),
    (8, 15, HolidayKind::Compulsory, "Independence Day"),
    (8, 27, HolidayKind::Additional, "Ganesh Chaturthi / Vinayak Chaturthi"),
    (9, 5, HolidayKind::Compulsory, "Id-E-Milad"),
    (10, 1, HolidayKind::Additional, "Dussehra -Maha Navmi"),
    (10, 2, HolidayKind::Compulsory, "Mahatma Gandhi Jayanti and Dussehra"),
    (10, 20, HolidayKind::Compulsory, "Diwali (Deepavali)"),
    (11, 5, HolidayKind::Compulsory, "Birthday of Guru Nanak"),
    (12, 25, HolidayKind::Compulsory, "Christmas"),
];

const RESTRICTED_2025: &[(u32, u32, &str)] = &[
    (1, 1, "New Year Day"),
    (1, 6, "Birthday of Guru Gobind Singh"),
    (1, 14, "Makar Sankranti / Magha Bihu / Pongal / Birth Day of Hazarat Ali"),
    (2, 2, "Basant Panchami / Sri Panchami"),
    (2, 12, "Birth Day of Guru Ravi Das"),
    (2, 19, "Chattrapati Shivaji Maharaj Jayanti"),
    (2, 23, "Birthday of Swami Dayananda Saraswati"),
    (3, 13, "Holika Dahan"),
    (3, 28, "Jamat Ul Vida"),
    (3, 30, "Chaitra Sukladi/Gudi Padava/Ugadi/Cheti Chand"),
    (4, 6, "Ram Navmi"),
    (4, 13, "Vaisakhi / Vishu"),
    (4, 15, "Vaisakhadi (Bengal) / Bahag Bihu (Assam)"),
    (4, 20, "Easter Sunday"),
    (5, 9, "Birthday of Guru Rabindranath"),
    (6, 27, "Rath Yatra"),
    (8, 9, "Raksha Bandhan"),
    (9, 29, "Dussehra (Saptami)"),
    (9, 30, "Dussehra (Mahashtami)"),
    (10, 7, "Birthday of Maharishi Valmiki"),
    (10, 10, "Karaka Chaturthi (Karwa Chouth)"),
    (10, 22, "Govardhan Puja"),
    (10, 23, "Bhai Duj"),
    (10, 28, "Pratihar Shashthi or Surya Shashthi (Chhat Puja)"),
    (11, 24, "Guru Tegh bahadur Martyrdom day"),
    (12, 24, "Christmas Eve"),
];
