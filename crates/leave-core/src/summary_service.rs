use chrono::NaiveDate;

use leave_domain::{
    calendar, EmployeeClass, Holiday, HolidayCalendar, LeaveBalance, LeaveLedger, LeaveRequest,
    LeaveType, RestrictedHoliday,
};

/// How many upcoming holidays and leaves the dashboard lists.
pub const UPCOMING_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeUsage {
    pub leave_type: LeaveType,
    pub entitlement: u32,
    pub remaining: u32,
    pub used: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub employee: EmployeeClass,
    pub balance: LeaveBalance,
    pub usage: Vec<TypeUsage>,
    pub pending: usize,
    pub upcoming_holidays: Vec<Holiday>,
    pub upcoming_leaves: Vec<LeaveRequest>,
    pub selected_rh: Vec<RestrictedHoliday>,
}

/// Requests filed in one calendar month, e.g. `March 2025`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryGroup {
    pub label: String,
    pub requests: Vec<LeaveRequest>,
}

pub struct SummaryService;

impl SummaryService {
    pub fn dashboard(
        ledger: &LeaveLedger,
        holidays: &HolidayCalendar,
        today: NaiveDate,
    ) -> DashboardSummary {
        DashboardSummary {
            employee: ledger.employee,
            balance: ledger.balance,
            usage: Self::usage(ledger),
            pending: ledger.pending_requests().len(),
            upcoming_holidays: Self::upcoming_holidays(holidays, today, UPCOMING_LIMIT),
            upcoming_leaves: Self::upcoming_leaves(ledger, today, UPCOMING_LIMIT),
            selected_rh: Self::selected_restricted(ledger, holidays),
        }
    }

    /// Entitlement, remaining and used days per type. Unset profiles report the full entitlement.
    pub fn usage(ledger: &LeaveLedger) -> Vec<TypeUsage> {
        let entitlement = ledger
            .employee
            .entitlement()
            .unwrap_or_else(LeaveBalance::full);
        LeaveType::ALL
            .iter()
            .map(|leave_type| {
                let total = entitlement.available(*leave_type);
                let remaining = ledger.balance.available(*leave_type);
                TypeUsage {
                    leave_type: *leave_type,
                    entitlement: total,
                    remaining,
                    used: total.saturating_sub(remaining),
                }
            })
            .collect()
    }

    pub fn upcoming_holidays(
        holidays: &HolidayCalendar,
        today: NaiveDate,
        limit: usize,
    ) -> Vec<Holiday> {
        holidays
            .sorted_holidays()
            .into_iter()
            .filter(|holiday| holiday.date >= today)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Non-deleted requests starting today or later, soonest first.
    pub fn upcoming_leaves(ledger: &LeaveLedger, today: NaiveDate, limit: usize) -> Vec<LeaveRequest> {
        let mut upcoming: Vec<&LeaveRequest> = ledger
            .active_requests()
            .filter(|request| request.start_date >= today)
            .collect();
        upcoming.sort_by_key(|request| request.start_date);
        upcoming.into_iter().take(limit).cloned().collect()
    }

    pub fn selected_restricted(
        ledger: &LeaveLedger,
        holidays: &HolidayCalendar,
    ) -> Vec<RestrictedHoliday> {
        holidays
            .sorted_restricted()
            .into_iter()
            .filter(|holiday| ledger.is_rh_selected(holiday.date))
            .cloned()
            .collect()
    }

    /// Non-deleted requests, newest request date first, grouped by month.
    pub fn history(ledger: &LeaveLedger) -> Vec<HistoryGroup> {
        let mut requests: Vec<&LeaveRequest> = ledger.active_requests().collect();
        requests.sort_by(|a, b| b.request_date.cmp(&a.request_date));

        let mut groups: Vec<HistoryGroup> = Vec::new();
        for request in requests {
            let label = calendar::month_label(request.request_date);
            match groups.last_mut() {
                Some(group) if group.label == label => group.requests.push(request.clone()),
                _ => groups.push(HistoryGroup {
                    label,
                    requests: vec![request.clone()],
                }),
            }
        }
        groups
    }

    pub fn pending(ledger: &LeaveLedger) -> Vec<LeaveRequest> {
        ledger.pending_requests().into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leave_domain::LeaveStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn approved(id: &str, start: NaiveDate, requested: NaiveDate) -> LeaveRequest {
        LeaveRequest::approved(id, LeaveType::Paid, start, start, 1, None, requested)
    }

    #[test]
    fn usage_derives_used_from_entitlement() {
        let mut ledger = LeaveLedger::default();
        ledger.employee = EmployeeClass::NewJoiner { month: 2 };
        ledger.balance = LeaveBalance::new(15, 6, 1);
        let usage = SummaryService::usage(&ledger);
        assert_eq!(usage[0].entitlement, 18);
        assert_eq!(usage[0].used, 3);
        assert_eq!(usage[1].used, 0);
        assert_eq!(usage[2].used, 1);
    }

    #[test]
    fn upcoming_lists_are_sorted_and_limited() {
        let holidays = HolidayCalendar::india_2025();
        let upcoming = SummaryService::upcoming_holidays(&holidays, date(2025, 8, 16), 3);
        let dates: Vec<NaiveDate> = upcoming.iter().map(|h| h.date).collect();
        assert_eq!(dates, vec![date(2025, 8, 27), date(2025, 9, 5), date(2025, 10, 1)]);

        let mut ledger = LeaveLedger::default();
        ledger.add_request(approved("late", date(2025, 9, 20), date(2025, 8, 1)));
        ledger.add_request(approved("past", date(2025, 8, 1), date(2025, 7, 1)));
        ledger.add_request(approved("soon", date(2025, 8, 20), date(2025, 8, 1)));
        let mut deleted = LeaveRequest::pending(
            "gone",
            LeaveType::Casual,
            date(2025, 8, 18),
            date(2025, 8, 18),
            1,
            None,
            date(2025, 8, 1),
        );
        deleted.set_status(LeaveStatus::Deleted);
        ledger.add_request(deleted);

        let leaves = SummaryService::upcoming_leaves(&ledger, date(2025, 8, 16), 3);
        let ids: Vec<&str> = leaves.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["soon", "late"]);
    }

    #[test]
    fn history_groups_by_request_month_newest_first() {
        let mut ledger = LeaveLedger::default();
        ledger.add_request(approved("jan", date(2025, 2, 3), date(2025, 1, 20)));
        ledger.add_request(approved("mar-a", date(2025, 4, 3), date(2025, 3, 2)));
        ledger.add_request(approved("mar-b", date(2025, 4, 9), date(2025, 3, 28)));

        let history = SummaryService::history(&ledger);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].label, "March 2025");
        assert_eq!(history[0].requests[0].id, "mar-b");
        assert_eq!(history[1].label, "January 2025");
    }
}
