use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{balance::LeaveType, calendar};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LeaveStatus {
    Pending,
    Confirmed,
    Rejected,
    Approved,
    Deleted,
}

impl LeaveStatus {
    /// Every status except `Pending` is final.
    pub fn is_terminal(self) -> bool {
        !matches!(self, LeaveStatus::Pending)
    }

    /// Statuses whose days have been charged against the balance.
    pub fn is_debited(self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Confirmed)
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Confirmed => "Confirmed",
            LeaveStatus::Rejected => "Rejected",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Deleted => "Deleted",
        };
        f.write_str(label)
    }
}

/// A recorded leave application. Never removed; deletion is a status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub request_date: NaiveDate,
    #[serde(default)]
    pub is_pending: bool,
}

impl LeaveRequest {
    /// An auto-approved request whose days were debited at creation.
    pub fn approved(
        id: impl Into<String>,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        days: u32,
        reason: Option<String>,
        request_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            leave_type,
            start_date,
            end_date,
            days,
            reason,
            status: LeaveStatus::Approved,
            request_date,
            is_pending: false,
        }
    }

    /// A planned request awaiting confirmation; nothing is debited yet.
    pub fn pending(
        id: impl Into<String>,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
        days: u32,
        reason: Option<String>,
        request_date: NaiveDate,
    ) -> Self {
        Self {
            status: LeaveStatus::Pending,
            is_pending: true,
            ..Self::approved(id, leave_type, start_date, end_date, days, reason, request_date)
        }
    }

    /// Not deleted; still occupies its dates.
    pub fn is_active(&self) -> bool {
        self.status != LeaveStatus::Deleted
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        calendar::dates_in_range(self.start_date, self.end_date)
    }

    /// Moves to `status`, keeping `is_pending` in step.
    pub fn set_status(&mut self, status: LeaveStatus) {
        self.status = status;
        self.is_pending = status == LeaveStatus::Pending;
    }
}
