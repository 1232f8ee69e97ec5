//! Balance and request bookkeeping on a [`LeaveLedger`].
//!
//! Every operation validates all of its preconditions before the first
//! assignment, so a failed call leaves the ledger exactly as it was.

use chrono::NaiveDate;

use leave_domain::{
    calendar, HolidayCalendar, LeaveLedger, LeaveRequest, LeaveStatus, LeaveType,
    RH_SELECTION_CAP,
};

use crate::{
    allocation_service::{AllocationService, LeavePriority},
    ids::IdGenerator,
    plan_service::LeaveTypeSelection,
    CoreError,
};

/// Longest span, in calendar days, a single request may cover.
pub const MAX_SPAN_DAYS: u32 = 15;

/// Input for a single-type leave request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveApplication {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Explicit day count; only honoured by planned leave.
    pub days: Option<u32>,
    pub reason: Option<String>,
}

impl LeaveApplication {
    pub fn new(leave_type: LeaveType, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            leave_type,
            start_date,
            end_date,
            days: None,
            reason: None,
        }
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = Some(days);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        self.reason = (!reason.trim().is_empty()).then_some(reason);
        self
    }
}

/// Input for a request that spreads one range over several leave types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedApplication {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub selection: LeaveTypeSelection,
    pub priority: LeavePriority,
    pub reason: Option<String>,
}

pub struct LedgerService;

impl LedgerService {
    /// Days charged for `[start, end]`: every day for PL, weekdays only otherwise.
    pub fn calculate_leave_days(
        start: NaiveDate,
        end: NaiveDate,
        leave_type: LeaveType,
    ) -> Result<u32, CoreError> {
        let span = checked_span(start, end)?;
        if leave_type.counts_weekends() {
            Ok(span)
        } else {
            Ok(span - calendar::weekend_days_in_range(start, end))
        }
    }

    /// Books an auto-approved request and debits the balance immediately.
    pub fn request_leave(
        ledger: &mut LeaveLedger,
        application: &LeaveApplication,
        ids: &dyn IdGenerator,
        today: NaiveDate,
    ) -> Result<String, CoreError> {
        let LeaveApplication {
            leave_type,
            start_date,
            end_date,
            ..
        } = *application;
        let counted = Self::calculate_leave_days(start_date, end_date, leave_type)?;

        let days = match leave_type {
            LeaveType::Restricted => {
                ensure_restricted_day(ledger, start_date, end_date)?;
                1
            }
            _ if counted == 0 => {
                return Err(CoreError::Validation(format!(
                    "{start_date} to {end_date} contains no working days"
                )))
            }
            _ => counted,
        };
        if !ledger.balance.covers(leave_type, days) {
            return Err(CoreError::insufficient(
                leave_type,
                days,
                ledger.balance.available(leave_type),
            ));
        }

        let request = LeaveRequest::approved(
            ids.next_id(),
            leave_type,
            start_date,
            end_date,
            days,
            application.reason.clone(),
            today,
        );
        ledger.balance.debit(leave_type, days);
        Ok(ledger.add_request(request))
    }

    /// Records a pending request without touching the balance.
    ///
    /// An explicit `days` is taken as-is; otherwise the day count rule applies,
    /// including its span cap.
    pub fn add_planned_leave(
        ledger: &mut LeaveLedger,
        application: &LeaveApplication,
        ids: &dyn IdGenerator,
        today: NaiveDate,
    ) -> Result<String, CoreError> {
        if application.end_date < application.start_date {
            return Err(CoreError::Validation(
                "End date cannot be before start date".into(),
            ));
        }
        let days = match application.days {
            Some(days) if days > 0 => days,
            _ => Self::calculate_leave_days(
                application.start_date,
                application.end_date,
                application.leave_type,
            )?,
        };
        if days == 0 {
            return Err(CoreError::Validation(
                "planned leave must cover at least one day".into(),
            ));
        }

        let request = LeaveRequest::pending(
            ids.next_id(),
            application.leave_type,
            application.start_date,
            application.end_date,
            days,
            application.reason.clone(),
            today,
        );
        Ok(ledger.add_request(request))
    }

    /// Settles a pending request: `Confirmed` with a debit, or `Rejected` when
    /// the balance no longer covers it.
    pub fn confirm_leave(ledger: &mut LeaveLedger, id: &str) -> Result<LeaveStatus, CoreError> {
        let balance = ledger.balance;
        let request = pending_request_mut(ledger, id)?;
        let (leave_type, days) = (request.leave_type, request.days);

        if !balance.covers(leave_type, days) {
            request.set_status(LeaveStatus::Rejected);
            return Ok(LeaveStatus::Rejected);
        }
        request.set_status(LeaveStatus::Confirmed);
        ledger.balance.debit(leave_type, days);
        Ok(LeaveStatus::Confirmed)
    }

    /// Marks a pending request as deleted. Nothing was debited, so nothing is refunded.
    pub fn delete_leave(ledger: &mut LeaveLedger, id: &str) -> Result<(), CoreError> {
        pending_request_mut(ledger, id)?.set_status(LeaveStatus::Deleted);
        Ok(())
    }

    pub fn select_restricted_holiday(
        ledger: &mut LeaveLedger,
        holidays: &HolidayCalendar,
        date: NaiveDate,
    ) -> Result<(), CoreError> {
        if holidays.restricted_on(date).is_none() {
            return Err(CoreError::InvalidRestrictedHoliday(format!(
                "{date} is not a restricted holiday"
            )));
        }
        if ledger.is_rh_selected(date) {
            return Err(CoreError::Validation(format!(
                "{date} is already selected"
            )));
        }
        if ledger.selected_rh.len() >= RH_SELECTION_CAP {
            return Err(CoreError::SelectionCapExceeded {
                cap: RH_SELECTION_CAP,
            });
        }
        ledger.selected_rh.push(date);
        Ok(())
    }

    /// Removes `date` from the selection and restores one RH day when it was never used.
    ///
    /// The restored balance never exceeds what recorded usage allows, see
    /// [`LeaveLedger::rh_ceiling`]. Returns `true` when the balance grew.
    pub fn unselect_restricted_holiday(
        ledger: &mut LeaveLedger,
        date: NaiveDate,
    ) -> Result<bool, CoreError> {
        if !ledger.is_rh_selected(date) {
            return Err(CoreError::Validation(format!("{date} is not selected")));
        }
        let before = ledger.balance.rh;
        if !ledger.has_active_rh_request(date) {
            let restored = (before + 1).min(ledger.rh_ceiling());
            ledger.balance.rh = restored.max(before);
        }
        ledger.selected_rh.retain(|selected| *selected != date);
        Ok(ledger.balance.rh > before)
    }

    pub fn reset_all_data(ledger: &mut LeaveLedger) {
        *ledger = LeaveLedger::default();
    }

    /// Books one approved request per non-zero portion of a multi-type range.
    ///
    /// RH takes the start date when it is a selected restricted holiday; the
    /// remaining calendar days are split between CL and PL by priority.
    pub fn request_combined(
        ledger: &mut LeaveLedger,
        application: &CombinedApplication,
        ids: &dyn IdGenerator,
        today: NaiveDate,
    ) -> Result<Vec<String>, CoreError> {
        let CombinedApplication {
            start_date,
            end_date,
            selection,
            priority,
            ..
        } = *application;
        if !selection.any() {
            return Err(CoreError::Validation(
                "Please select at least one leave type".into(),
            ));
        }
        if end_date < start_date {
            return Err(CoreError::Validation(
                "End date cannot be before start date".into(),
            ));
        }
        if selection.rh_only() && start_date != end_date {
            return Err(CoreError::InvalidRestrictedHoliday(
                "Restricted holidays can only be taken for a single day".into(),
            ));
        }
        if selection.use_rh && !ledger.is_rh_selected(start_date) {
            return Err(CoreError::InvalidRestrictedHoliday(
                "You can only request leave for your selected restricted holidays".into(),
            ));
        }
        let total = checked_span(start_date, end_date)?;

        let rh_days = u32::from(selection.use_rh);
        let (pl, cl) = AllocationService::split_remaining(
            total - rh_days,
            &selection,
            priority,
            &ledger.balance,
        )?;
        let portions = [
            (LeaveType::Paid, pl),
            (LeaveType::Casual, cl),
            (LeaveType::Restricted, rh_days),
        ];
        for (leave_type, days) in portions {
            if days > 0 && !ledger.balance.covers(leave_type, days) {
                return Err(CoreError::insufficient(
                    leave_type,
                    days,
                    ledger.balance.available(leave_type),
                ));
            }
        }

        let base = application.reason.as_deref().unwrap_or_default().trim();
        let mut created = Vec::new();
        for (leave_type, days) in portions {
            if days == 0 {
                continue;
            }
            let end = if leave_type == LeaveType::Restricted {
                start_date
            } else {
                end_date
            };
            let note = format!("(Combined leave request - {leave_type} portion)");
            let reason = if base.is_empty() {
                note
            } else {
                format!("{base} {note}")
            };
            let request = LeaveRequest::approved(
                ids.next_id(),
                leave_type,
                start_date,
                end,
                days,
                Some(reason),
                today,
            );
            ledger.balance.debit(leave_type, days);
            created.push(ledger.add_request(request));
        }
        Ok(created)
    }
}

fn checked_span(start: NaiveDate, end: NaiveDate) -> Result<u32, CoreError> {
    if end < start {
        return Err(CoreError::Validation(
            "End date cannot be before start date".into(),
        ));
    }
    let span = calendar::inclusive_span(start, end);
    if span > MAX_SPAN_DAYS {
        return Err(CoreError::DurationExceeded {
            days: span,
            max: MAX_SPAN_DAYS,
        });
    }
    Ok(span)
}

fn ensure_restricted_day(
    ledger: &LeaveLedger,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), CoreError> {
    if start != end {
        return Err(CoreError::InvalidRestrictedHoliday(
            "Restricted holidays can only be taken for a single day".into(),
        ));
    }
    if !ledger.is_rh_selected(start) {
        return Err(CoreError::InvalidRestrictedHoliday(
            "You can only request leave for your selected restricted holidays".into(),
        ));
    }
    Ok(())
}

fn pending_request_mut<'a>(
    ledger: &'a mut LeaveLedger,
    id: &str,
) -> Result<&'a mut LeaveRequest, CoreError> {
    let request = ledger
        .request_mut(id)
        .ok_or_else(|| CoreError::RequestNotFound(id.to_string()))?;
    if request.status != LeaveStatus::Pending {
        return Err(CoreError::InvalidTransition(format!(
            "request {id} is {} and can no longer change",
            request.status
        )));
    }
    Ok(request)
}
