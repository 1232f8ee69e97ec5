//! Splitting a number of leave days across PL, CL and RH.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use leave_domain::{LeaveBalance, LeaveLedger, LeaveType};

use crate::{
    ids::IdGenerator,
    ledger_service::{LeaveApplication, LedgerService},
    plan_service::{LeaveSuggestion, LeaveTypeSelection},
    CoreError,
};

/// Order in which CL and PL absorb days when both are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeavePriority {
    #[default]
    ClFirst,
    PlFirst,
    Balanced,
    PlOnly,
    ClOnly,
}

impl LeavePriority {
    pub const ALL: [LeavePriority; 5] = [
        LeavePriority::ClFirst,
        LeavePriority::PlFirst,
        LeavePriority::Balanced,
        LeavePriority::PlOnly,
        LeavePriority::ClOnly,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeavePriority::ClFirst => "cl-first",
            LeavePriority::PlFirst => "pl-first",
            LeavePriority::Balanced => "balanced",
            LeavePriority::PlOnly => "pl-only",
            LeavePriority::ClOnly => "cl-only",
        }
    }
}

impl fmt::Display for LeavePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeavePriority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        LeavePriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown priority `{value}` (expected cl-first, pl-first, balanced, pl-only or cl-only)"
                )
            })
    }
}

/// Days per leave type for one booking. RH is tracked by date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    pub pl: u32,
    pub cl: u32,
    pub rh_dates: Vec<NaiveDate>,
}

impl Allocation {
    pub fn rh(&self) -> u32 {
        self.rh_dates.len() as u32
    }

    pub fn total(&self) -> u32 {
        self.pl + self.cl + self.rh()
    }

    /// Fails on the first portion the balance cannot cover.
    pub fn ensure_covered(&self, balance: &LeaveBalance) -> Result<(), CoreError> {
        let portions = [
            (LeaveType::Paid, self.pl),
            (LeaveType::Casual, self.cl),
            (LeaveType::Restricted, self.rh()),
        ];
        for (leave_type, requested) in portions {
            if requested > 0 && !balance.covers(leave_type, requested) {
                return Err(CoreError::insufficient(
                    leave_type,
                    requested,
                    balance.available(leave_type),
                ));
            }
        }
        Ok(())
    }
}

pub struct AllocationService;

impl AllocationService {
    /// Splits `remaining` days between PL and CL. Returns `(pl, cl)`.
    pub fn split_remaining(
        remaining: u32,
        selection: &LeaveTypeSelection,
        priority: LeavePriority,
        balance: &LeaveBalance,
    ) -> Result<(u32, u32), CoreError> {
        if remaining == 0 {
            return Ok((0, 0));
        }
        let split = match (selection.use_pl, selection.use_cl) {
            (true, true) => match priority {
                LeavePriority::ClFirst => {
                    let cl = remaining.min(balance.cl);
                    (remaining - cl, cl)
                }
                LeavePriority::PlFirst => {
                    let pl = remaining.min(balance.pl);
                    (pl, remaining - pl)
                }
                LeavePriority::Balanced => {
                    let cl = remaining.div_ceil(2).min(balance.cl);
                    (remaining - cl, cl)
                }
                LeavePriority::PlOnly => (remaining, 0),
                LeavePriority::ClOnly => (0, remaining),
            },
            (true, false) => (remaining, 0),
            (false, true) => (0, remaining),
            (false, false) => {
                return Err(CoreError::Validation(format!(
                    "{remaining} day(s) need PL or CL but neither is enabled"
                )))
            }
        };
        Ok(split)
    }

    /// Computes the per-type split for a suggestion against the live balance.
    pub fn allocate(
        ledger: &LeaveLedger,
        suggestion: &LeaveSuggestion,
        priority: LeavePriority,
    ) -> Result<Allocation, CoreError> {
        if suggestion.dates.is_empty() {
            return Err(CoreError::Validation(
                "This plan doesn't include any leave dates.".into(),
            ));
        }
        let balance = ledger.balance;
        let mut rh_dates: Vec<NaiveDate> = if suggestion.leave_types.use_rh && balance.rh > 0 {
            suggestion
                .dates
                .iter()
                .copied()
                .filter(|date| ledger.is_rh_selected(*date))
                .collect()
        } else {
            Vec::new()
        };
        rh_dates.sort();

        let remaining = suggestion
            .leaves_required
            .saturating_sub(rh_dates.len() as u32);
        let (pl, cl) =
            Self::split_remaining(remaining, &suggestion.leave_types, priority, &balance)?;
        let allocation = Allocation { pl, cl, rh_dates };
        allocation.ensure_covered(&balance)?;
        Ok(allocation)
    }

    /// Books a suggestion as pending requests, one per non-zero portion.
    ///
    /// PL and CL portions span the plan's first to last leave date; each RH
    /// date becomes its own single-day request.
    pub fn use_plan(
        ledger: &mut LeaveLedger,
        suggestion: &LeaveSuggestion,
        priority: LeavePriority,
        ids: &dyn IdGenerator,
        today: NaiveDate,
    ) -> Result<Vec<String>, CoreError> {
        let allocation = Self::allocate(ledger, suggestion, priority)?;

        let mut sorted = suggestion.dates.clone();
        sorted.sort();
        let (start, end) = match (sorted.first(), sorted.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(CoreError::Validation("plan has no dates".into())),
        };
        let summary = format!("{}: {}", suggestion.title, suggestion.description);

        let mut created = Vec::new();
        for (leave_type, days) in [
            (LeaveType::Paid, allocation.pl),
            (LeaveType::Casual, allocation.cl),
        ] {
            if days == 0 {
                continue;
            }
            let application = LeaveApplication::new(leave_type, start, end)
                .with_days(days)
                .with_reason(format!("{summary} ({leave_type} portion)"));
            created.push(LedgerService::add_planned_leave(
                ledger,
                &application,
                ids,
                today,
            )?);
        }
        for date in &allocation.rh_dates {
            let application = LeaveApplication::new(LeaveType::Restricted, *date, *date)
                .with_days(1)
                .with_reason(format!("{summary} (RH portion)"));
            created.push(LedgerService::add_planned_leave(
                ledger,
                &application,
                ids,
                today,
            )?);
        }
        Ok(created)
    }
}
