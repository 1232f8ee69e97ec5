//! Fixed day-count search: where to place N consecutive days off so they cost
//! the fewest leave applications.

use std::{cmp::Ordering, fmt};

use chrono::NaiveDate;
use serde::Serialize;

use leave_domain::{calendar, HolidayCalendar};

use crate::CoreError;

/// Months are approximated as thirty days when computing the search horizon.
pub const DAYS_PER_MONTH: i64 = 30;
pub const MAX_LOOK_AHEAD_MONTHS: u32 = 12;
pub const TOP_RESULTS: usize = 5;

/// Toggles for which free days are tallied in the reported counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub include_weekends: bool,
    pub include_public_holidays: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            include_weekends: true,
            include_public_holidays: true,
        }
    }
}

/// Days off per leave day. A window needing no leave ranks above every ratio.
#[derive(Debug, Clone, Copy, Serialize)]
pub enum Efficiency {
    Unbounded,
    Ratio(f64),
}

impl Efficiency {
    pub fn of(total_days: u32, leave_days: u32) -> Self {
        if leave_days == 0 {
            Efficiency::Unbounded
        } else {
            Efficiency::Ratio(f64::from(total_days) / f64::from(leave_days))
        }
    }
}

impl PartialEq for Efficiency {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Efficiency {}

impl PartialOrd for Efficiency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Efficiency {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Efficiency::Unbounded, Efficiency::Unbounded) => Ordering::Equal,
            (Efficiency::Unbounded, Efficiency::Ratio(_)) => Ordering::Greater,
            (Efficiency::Ratio(_), Efficiency::Unbounded) => Ordering::Less,
            (Efficiency::Ratio(a), Efficiency::Ratio(b)) => a.total_cmp(b),
        }
    }
}

impl fmt::Display for Efficiency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Efficiency::Unbounded => f.write_str("no leave needed"),
            Efficiency::Ratio(ratio) => write!(f, "{ratio:.2}x"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowDay {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub is_restricted_holiday: bool,
    pub needs_leave: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowPlan {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: u32,
    pub working_days: u32,
    pub leave_days: u32,
    pub weekend_days: u32,
    pub holiday_days: u32,
    pub efficiency: Efficiency,
    pub calendar_days: Vec<WindowDay>,
}

pub struct SearchService;

impl SearchService {
    /// Ranks every `days`-long window starting in the look-ahead period.
    ///
    /// Candidate starts run from `today` while the whole window still ends
    /// before the horizon, so the last candidate ends the day before it. Results are sorted by descending efficiency,
    /// earliest start first on ties, and truncated to [`TOP_RESULTS`].
    pub fn find_optimal_windows(
        holidays: &HolidayCalendar,
        selected_rh: &[NaiveDate],
        today: NaiveDate,
        days: u32,
        look_ahead_months: u32,
        options: SearchOptions,
    ) -> Result<Vec<WindowPlan>, CoreError> {
        if days == 0 {
            return Err(CoreError::Validation(
                "Please enter a valid number of days greater than 0".into(),
            ));
        }
        if !(1..=MAX_LOOK_AHEAD_MONTHS).contains(&look_ahead_months) {
            return Err(CoreError::Validation(format!(
                "look-ahead must be between 1 and {MAX_LOOK_AHEAD_MONTHS} months"
            )));
        }

        let horizon = calendar::add_days(today, i64::from(look_ahead_months) * DAYS_PER_MONTH);
        let mut plans: Vec<WindowPlan> = today
            .iter_days()
            .take_while(|start| calendar::days_between(*start, horizon) >= i64::from(days))
            .map(|start| Self::evaluate(holidays, selected_rh, start, days, options))
            .collect();

        plans.sort_by(|a, b| {
            b.efficiency
                .cmp(&a.efficiency)
                .then(a.start_date.cmp(&b.start_date))
        });
        plans.truncate(TOP_RESULTS);
        Ok(plans)
    }

    fn evaluate(
        holidays: &HolidayCalendar,
        selected_rh: &[NaiveDate],
        start: NaiveDate,
        days: u32,
        options: SearchOptions,
    ) -> WindowPlan {
        let end = calendar::add_days(start, i64::from(days) - 1);
        let calendar_days: Vec<WindowDay> = calendar::dates_in_range(start, end)
            .into_iter()
            .map(|date| {
                let is_weekend = calendar::is_weekend(date);
                let is_holiday = holidays.is_holiday(date);
                WindowDay {
                    date,
                    day_name: calendar::day_name(date),
                    is_weekend,
                    is_holiday,
                    is_restricted_holiday: selected_rh.contains(&date),
                    needs_leave: !is_weekend && !is_holiday,
                }
            })
            .collect();

        let leave_days = tally(&calendar_days, |day| day.needs_leave);
        let weekend_days = if options.include_weekends {
            tally(&calendar_days, |day| day.is_weekend)
        } else {
            0
        };
        let holiday_days = if options.include_public_holidays {
            tally(&calendar_days, |day| day.is_holiday)
        } else {
            0
        };

        WindowPlan {
            start_date: start,
            end_date: end,
            total_days: days,
            working_days: leave_days,
            leave_days,
            weekend_days,
            holiday_days,
            efficiency: Efficiency::of(days, leave_days),
            calendar_days,
        }
    }
}

fn tally(days: &[WindowDay], predicate: impl Fn(&WindowDay) -> bool) -> u32 {
    days.iter().filter(|day| predicate(day)).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn efficiency_orders_unbounded_first() {
        let mut values = vec![
            Efficiency::Ratio(1.0),
            Efficiency::Unbounded,
            Efficiency::Ratio(2.5),
        ];
        values.sort();
        values.reverse();
        assert_eq!(values[0], Efficiency::Unbounded);
        assert_eq!(values[1], Efficiency::Ratio(2.5));
        assert_eq!(Efficiency::of(4, 0), Efficiency::Unbounded);
        assert_eq!(Efficiency::of(4, 2).to_string(), "2.00x");
    }

    #[test]
    fn weekend_only_window_ranks_first() {
        let calendar = HolidayCalendar::new(2025, Vec::new(), Vec::new());
        // Mon 3 Mar; the first two-day weekend window is Sat 8 .. Sun 9.
        let plans = SearchService::find_optimal_windows(
            &calendar,
            &[],
            date(2025, 3, 3),
            2,
            1,
            SearchOptions::default(),
        )
        .unwrap();
        assert_eq!(plans.len(), TOP_RESULTS);
        assert_eq!(plans[0].start_date, date(2025, 3, 8));
        assert_eq!(plans[0].leave_days, 0);
        assert_eq!(plans[0].efficiency, Efficiency::Unbounded);
        assert_eq!(plans[1].start_date, date(2025, 3, 15));
    }

    #[test]
    fn ties_break_on_earliest_start() {
        let calendar = HolidayCalendar::new(2025, Vec::new(), Vec::new());
        let plans = SearchService::find_optimal_windows(
            &calendar,
            &[],
            date(2025, 3, 3),
            7,
            2,
            SearchOptions::default(),
        )
        .unwrap();
        // Every 7-day window holds 2 weekend days, so all tie at 7/5.
        let starts: Vec<NaiveDate> = plans.iter().map(|plan| plan.start_date).collect();
        assert_eq!(starts[0], date(2025, 3, 3));
        assert!(starts.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn candidates_stop_before_horizon() {
        let calendar = HolidayCalendar::new(2025, Vec::new(), Vec::new());
        let search = |days| {
            SearchService::find_optimal_windows(
                &calendar,
                &[],
                date(2025, 3, 3),
                days,
                1,
                SearchOptions::default(),
            )
            .unwrap()
        };

        // Horizon is 2 Apr; a window may end on 1 Apr but not later.
        let plans = search(29);
        assert_eq!(plans.len(), 2);
        assert!(plans.iter().any(|plan| plan.end_date == date(2025, 4, 1)));

        let exact = search(30);
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].start_date, date(2025, 3, 3));
        assert_eq!(exact[0].end_date, date(2025, 4, 1));

        assert!(search(31).is_empty());
    }

    #[test]
    fn options_only_change_reported_counts() {
        let calendar = HolidayCalendar::india_2025();
        let options = SearchOptions {
            include_weekends: false,
            include_public_holidays: false,
        };
        let plans = SearchService::find_optimal_windows(
            &calendar,
            &[],
            date(2025, 8, 11),
            5,
            1,
            options,
        )
        .unwrap();
        assert!(plans.iter().all(|plan| plan.weekend_days == 0 && plan.holiday_days == 0));
        let defaults = SearchService::find_optimal_windows(
            &calendar,
            &[],
            date(2025, 8, 11),
            5,
            1,
            SearchOptions::default(),
        )
        .unwrap();
        let starts = |plans: &Vec<WindowPlan>| {
            plans.iter().map(|plan| plan.start_date).collect::<Vec<_>>()
        };
        assert_eq!(starts(&plans), starts(&defaults));
    }

    #[test]
    fn zero_days_is_rejected() {
        let calendar = HolidayCalendar::india_2025();
        let err = SearchService::find_optimal_windows(
            &calendar,
            &[],
            date(2025, 3, 3),
            0,
            3,
            SearchOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
