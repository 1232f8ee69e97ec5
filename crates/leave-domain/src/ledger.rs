use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    balance::{EmployeeClass, LeaveBalance, LeaveType, RH_CAP},
    request::LeaveRequest,
};

/// Maximum number of restricted holidays an employee may select.
pub const RH_SELECTION_CAP: usize = 2;

/// The complete mutable state of one employee's leave profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaveLedger {
    pub balance: LeaveBalance,
    #[serde(default)]
    pub requests: Vec<LeaveRequest>,
    #[serde(default)]
    pub selected_rh: Vec<NaiveDate>,
    #[serde(default)]
    pub employee: EmployeeClass,
    /// Year of the last entitlement calculation; guards against recomputing mid-year.
    #[serde(default)]
    pub last_calculation_year: Option<i32>,
    /// Usage recorded before tracking started (seeded once at setup).
    #[serde(default)]
    pub seeded_usage: LeaveBalance,
}

impl Default for LeaveLedger {
    fn default() -> Self {
        Self {
            balance: LeaveBalance::full(),
            requests: Vec::new(),
            selected_rh: Vec::new(),
            employee: EmployeeClass::Unset,
            last_calculation_year: None,
            seeded_usage: LeaveBalance::default(),
        }
    }
}

impl LeaveLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_request(&mut self, request: LeaveRequest) -> String {
        let id = request.id.clone();
        self.requests.push(request);
        id
    }

    pub fn request(&self, id: &str) -> Option<&LeaveRequest> {
        self.requests.iter().find(|request| request.id == id)
    }

    pub fn request_mut(&mut self, id: &str) -> Option<&mut LeaveRequest> {
        self.requests.iter_mut().find(|request| request.id == id)
    }

    pub fn pending_requests(&self) -> Vec<&LeaveRequest> {
        self.requests.iter().filter(|request| request.is_pending).collect()
    }

    pub fn active_requests(&self) -> impl Iterator<Item = &LeaveRequest> {
        self.requests.iter().filter(|request| request.is_active())
    }

    /// Every date covered by a non-deleted request.
    pub fn used_dates(&self) -> BTreeSet<NaiveDate> {
        self.active_requests()
            .flat_map(|request| request.dates())
            .collect()
    }

    pub fn is_rh_selected(&self, date: NaiveDate) -> bool {
        self.selected_rh.contains(&date)
    }

    /// True when a non-deleted RH request starts on `date`.
    pub fn has_active_rh_request(&self, date: NaiveDate) -> bool {
        self.active_requests()
            .any(|request| request.leave_type == LeaveType::Restricted && request.start_date == date)
    }

    /// Days of `leave_type` charged by approved or confirmed requests in the current entitlement year.
    pub fn debited_days(&self, leave_type: LeaveType) -> u32 {
        self.requests
            .iter()
            .filter(|request| {
                request.leave_type == leave_type
                    && request.status.is_debited()
                    && self
                        .last_calculation_year
                        .map_or(true, |year| request.start_date.year() == year)
            })
            .map(|request| request.days)
            .sum()
    }

    pub fn debited_rh_days(&self) -> u32 {
        self.debited_days(LeaveType::Restricted)
    }

    /// Everything charged against the current entitlement year, per type.
    pub fn debited_balance(&self) -> LeaveBalance {
        LeaveBalance::new(
            self.debited_days(LeaveType::Paid),
            self.debited_days(LeaveType::Casual),
            self.debited_rh_days(),
        )
    }

    /// Highest `rh` value consistent with recorded usage.
    pub fn rh_ceiling(&self) -> u32 {
        RH_CAP
            .saturating_sub(self.seeded_usage.rh)
            .saturating_sub(self.debited_rh_days())
    }
}
