//! Range-based leave plan suggestions.
//!
//! Everything here is pure: suggestions describe which dates would need leave
//! but never touch the ledger. Callers hand a chosen suggestion to
//! [`crate::AllocationService::use_plan`] to book it.

use std::{collections::BTreeSet, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::Serialize;

use leave_domain::{calendar, HolidayCalendar, LeaveBalance, LeaveLedger, LeaveType};

use crate::CoreError;

const EXTENDED_WEEKEND_MAX_RANGE: u32 = 9;
const DISTRIBUTED_MIN_RANGE: u32 = 10;
const WEEKEND_SEARCH_OFFSETS: i64 = 5;
const WEEKEND_PADDING: i64 = 2;

/// Which leave types a plan or combined request may draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeaveTypeSelection {
    pub use_pl: bool,
    pub use_cl: bool,
    pub use_rh: bool,
}

impl LeaveTypeSelection {
    pub const fn all() -> Self {
        Self {
            use_pl: true,
            use_cl: true,
            use_rh: true,
        }
    }

    pub fn from_types(types: &[LeaveType]) -> Self {
        Self {
            use_pl: types.contains(&LeaveType::Paid),
            use_cl: types.contains(&LeaveType::Casual),
            use_rh: types.contains(&LeaveType::Restricted),
        }
    }

    pub fn any(&self) -> bool {
        self.use_pl || self.use_cl || self.use_rh
    }

    /// Only RH is enabled.
    pub fn rh_only(&self) -> bool {
        self.use_rh && !self.use_pl && !self.use_cl
    }

    /// Sum of the balances this selection may draw from.
    pub fn budget(&self, balance: &LeaveBalance) -> u32 {
        let mut total = 0;
        if self.use_pl {
            total += balance.pl;
        }
        if self.use_cl {
            total += balance.cl;
        }
        if self.use_rh {
            total += balance.rh;
        }
        total
    }
}

impl Default for LeaveTypeSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for LeaveTypeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = LeaveType::ALL
            .iter()
            .filter(|leave_type| match leave_type {
                LeaveType::Paid => self.use_pl,
                LeaveType::Casual => self.use_cl,
                LeaveType::Restricted => self.use_rh,
            })
            .map(|leave_type| leave_type.code())
            .collect();
        f.write_str(&codes.join("+"))
    }
}

/// Parses `pl,cl`, `pl+rh`, or `all`.
impl FromStr for LeaveTypeSelection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }
        let types = value
            .split([',', '+'])
            .filter(|part| !part.trim().is_empty())
            .map(LeaveType::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        let selection = Self::from_types(&types);
        if selection.any() {
            Ok(selection)
        } else {
            Err("select at least one leave type".into())
        }
    }
}

/// Classification of a single date within a queried range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayInfo {
    pub date: NaiveDate,
    pub day_name: &'static str,
    pub is_weekend: bool,
    pub is_holiday: bool,
    /// Member of the selected restricted holidays.
    pub is_rh: bool,
    /// Already covered by a non-deleted request.
    pub is_used: bool,
}

impl DayInfo {
    /// Weekend, holiday or already booked.
    pub fn is_free(&self) -> bool {
        self.is_weekend || self.is_holiday || self.is_used
    }

    /// True when this day needs a leave application under `selection`.
    pub fn needs_leave(&self, selection: &LeaveTypeSelection) -> bool {
        if self.is_free() {
            return false;
        }
        if self.is_rh {
            selection.use_rh
        } else {
            selection.use_pl || selection.use_cl
        }
    }
}

/// Read-only view of the ledger and holiday tables used to classify days.
pub struct PlanContext<'a> {
    calendar: &'a HolidayCalendar,
    selected_rh: &'a [NaiveDate],
    used_dates: BTreeSet<NaiveDate>,
    balance: LeaveBalance,
}

impl<'a> PlanContext<'a> {
    pub fn new(
        calendar: &'a HolidayCalendar,
        selected_rh: &'a [NaiveDate],
        used_dates: BTreeSet<NaiveDate>,
        balance: LeaveBalance,
    ) -> Self {
        Self {
            calendar,
            selected_rh,
            used_dates,
            balance,
        }
    }

    pub fn from_ledger(ledger: &'a LeaveLedger, calendar: &'a HolidayCalendar) -> Self {
        Self::new(
            calendar,
            &ledger.selected_rh,
            ledger.used_dates(),
            ledger.balance,
        )
    }

    pub fn day_info(&self, date: NaiveDate) -> DayInfo {
        DayInfo {
            date,
            day_name: calendar::day_name(date),
            is_weekend: calendar::is_weekend(date),
            is_holiday: self.calendar.is_holiday(date),
            is_rh: self.selected_rh.contains(&date),
            is_used: self.used_dates.contains(&date),
        }
    }

    pub fn day_details(&self, start: NaiveDate, end: NaiveDate) -> Vec<DayInfo> {
        calendar::dates_in_range(start, end)
            .into_iter()
            .map(|date| self.day_info(date))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanKind {
    MinimumLeave,
    ExtendedWeekend,
    Distributed,
}

impl PlanKind {
    pub fn title(self) -> &'static str {
        match self {
            PlanKind::MinimumLeave => "Minimum Leave Plan",
            PlanKind::ExtendedWeekend => "Extended Weekend",
            PlanKind::Distributed => "Distributed Leave Plan",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PlanKind::MinimumLeave => {
                "This plan uses the minimum number of leave days by utilizing weekends and holidays."
            }
            PlanKind::ExtendedWeekend => "Take a longer break by extending a weekend.",
            PlanKind::Distributed => "Spread your leaves throughout the period for regular breaks.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaveSuggestion {
    pub kind: PlanKind,
    pub title: String,
    pub description: String,
    /// Calendar days covered by the plan window.
    pub days: u32,
    pub leaves_required: u32,
    /// Dates that need a leave application, ascending.
    pub dates: Vec<NaiveDate>,
    pub day_details: Vec<DayInfo>,
    pub leave_types: LeaveTypeSelection,
    pub warnings: Vec<String>,
}

impl LeaveSuggestion {
    fn new(
        kind: PlanKind,
        days: u32,
        dates: Vec<NaiveDate>,
        day_details: Vec<DayInfo>,
        leave_types: LeaveTypeSelection,
    ) -> Self {
        let warnings = PlanService::warnings(&day_details, &leave_types);
        Self {
            kind,
            title: kind.title().to_string(),
            description: kind.description().to_string(),
            days,
            leaves_required: dates.len() as u32,
            dates,
            day_details,
            leave_types,
            warnings,
        }
    }
}

pub struct PlanService;

impl PlanService {
    /// Produces the minimum-leave plan plus any applicable alternatives for `[start, end]`.
    pub fn suggest(
        ctx: &PlanContext<'_>,
        start: NaiveDate,
        end: NaiveDate,
        selection: LeaveTypeSelection,
    ) -> Result<Vec<LeaveSuggestion>, CoreError> {
        if end < start {
            return Err(CoreError::Validation(
                "End date must be after start date".into(),
            ));
        }
        if !selection.any() {
            return Err(CoreError::Validation(
                "Please select at least one leave type".into(),
            ));
        }

        let total_days = calendar::inclusive_span(start, end);
        let all_days = ctx.day_details(start, end);

        let mut suggestions = vec![Self::minimum_leave(&all_days, total_days, selection)];
        if total_days <= EXTENDED_WEEKEND_MAX_RANGE {
            suggestions.extend(Self::extended_weekend(ctx, start, selection));
        }
        if total_days > DISTRIBUTED_MIN_RANGE {
            suggestions.extend(Self::distributed(ctx, all_days, total_days, selection));
        }
        Ok(suggestions)
    }

    fn minimum_leave(
        all_days: &[DayInfo],
        total_days: u32,
        selection: LeaveTypeSelection,
    ) -> LeaveSuggestion {
        let dates = leave_dates(all_days, &selection);
        LeaveSuggestion::new(
            PlanKind::MinimumLeave,
            total_days,
            dates,
            all_days.to_vec(),
            selection,
        )
    }

    fn extended_weekend(
        ctx: &PlanContext<'_>,
        start: NaiveDate,
        selection: LeaveTypeSelection,
    ) -> Option<LeaveSuggestion> {
        let weekend_start = (0..WEEKEND_SEARCH_OFFSETS)
            .map(|offset| calendar::add_days(start, offset))
            .find(|date| calendar::is_weekend(*date))?;
        let window_start = calendar::add_days(weekend_start, -WEEKEND_PADDING);
        let window_end = calendar::add_days(weekend_start, WEEKEND_PADDING);

        let details = ctx.day_details(window_start, window_end);
        let dates = leave_dates(&details, &selection);
        if dates.is_empty() {
            return None;
        }
        Some(LeaveSuggestion::new(
            PlanKind::ExtendedWeekend,
            calendar::inclusive_span(window_start, window_end),
            dates,
            details,
            selection,
        ))
    }

    fn distributed(
        ctx: &PlanContext<'_>,
        all_days: Vec<DayInfo>,
        total_days: u32,
        selection: LeaveTypeSelection,
    ) -> Option<LeaveSuggestion> {
        let budget = total_days
            .div_ceil(3)
            .min(selection.budget(&ctx.balance));
        if budget == 0 {
            return None;
        }
        let stride = (total_days / budget).max(1) as usize;

        let dates: Vec<NaiveDate> = all_days
            .iter()
            .enumerate()
            .filter(|(index, day)| index % stride == 0 && day.needs_leave(&selection))
            .map(|(_, day)| day.date)
            .take(budget as usize)
            .collect();
        if dates.is_empty() {
            return None;
        }
        Some(LeaveSuggestion::new(
            PlanKind::Distributed,
            total_days,
            dates,
            all_days,
            selection,
        ))
    }

    /// Advisory notes for a plan; they never block booking.
    pub fn warnings(details: &[DayInfo], selection: &LeaveTypeSelection) -> Vec<String> {
        let mut warnings = Vec::new();

        if selection.use_pl && !selection.use_cl {
            let weekends: Vec<String> = details
                .iter()
                .filter(|day| day.is_weekend)
                .map(|day| calendar::short_label(day.date))
                .collect();
            if !weekends.is_empty() {
                warnings.push(format!(
                    "This plan would use PL for {} weekend days ({}). Consider using CL instead to save your PL balance.",
                    weekends.len(),
                    weekends.join(", ")
                ));
            }
        }

        let holidays: Vec<String> = details
            .iter()
            .filter(|day| day.is_holiday)
            .map(|day| calendar::long_label(day.date))
            .collect();
        if !holidays.is_empty() {
            warnings.push(format!(
                "The selected range includes {} holiday(s): {}. No leave is required for these days.",
                holidays.len(),
                holidays.join(", ")
            ));
        }
        warnings
    }

    /// Notice shown when a PL request spans weekend days.
    pub fn weekend_notice(start: NaiveDate, end: NaiveDate) -> Option<String> {
        let weekends: Vec<String> = calendar::dates_in_range(start, end)
            .into_iter()
            .filter(|date| calendar::is_weekend(*date))
            .map(calendar::long_label)
            .collect();
        if weekends.is_empty() {
            None
        } else {
            Some(format!(
                "Your selection includes {} weekend day(s): {}",
                weekends.len(),
                weekends.join(", ")
            ))
        }
    }
}

fn leave_dates(details: &[DayInfo], selection: &LeaveTypeSelection) -> Vec<NaiveDate> {
    details
        .iter()
        .filter(|day| day.needs_leave(selection))
        .map(|day| day.date)
        .collect()
}
