//! Yearly entitlement calculation and historical usage seeding.

use chrono::{Datelike, NaiveDate};

use leave_domain::{EmployeeClass, LeaveBalance, LeaveLedger};

use crate::CoreError;

pub struct AccrualService;

impl AccrualService {
    /// Sets the balance to the classification's entitlement once per calendar year.
    ///
    /// Returns `true` when the balance was recomputed. Unconfigured ledgers and
    /// ledgers already calculated for `today`'s year are left untouched.
    pub fn calculate_pro_rated(ledger: &mut LeaveLedger, today: NaiveDate) -> bool {
        let Some(entitlement) = ledger.employee.entitlement() else {
            return false;
        };
        let year = today.year();
        if ledger
            .last_calculation_year
            .is_some_and(|calculated| calculated >= year)
        {
            return false;
        }
        ledger.balance = entitlement;
        ledger.seeded_usage = LeaveBalance::default();
        ledger.last_calculation_year = Some(year);
        true
    }

    /// Changes the classification and re-baselines the balance for the current year.
    ///
    /// Approved and confirmed requests already on record for that year stay charged.
    pub fn configure(ledger: &mut LeaveLedger, class: EmployeeClass, today: NaiveDate) -> bool {
        ledger.employee = class;
        ledger.last_calculation_year = None;
        if !Self::calculate_pro_rated(ledger, today) {
            return false;
        }
        ledger.balance = ledger.balance.saturating_sub(&ledger.debited_balance());
        true
    }

    /// Subtracts usage that predates tracking from an existing employee's balance.
    pub fn add_used_leaves(ledger: &mut LeaveLedger, used: LeaveBalance) -> Result<(), CoreError> {
        if ledger.employee != EmployeeClass::Existing {
            return Err(CoreError::Validation(
                "previously used leave can only be recorded for existing employees".into(),
            ));
        }
        ledger.balance = ledger.balance.saturating_sub(&used);
        ledger.seeded_usage = LeaveBalance::new(
            ledger.seeded_usage.pl.saturating_add(used.pl),
            ledger.seeded_usage.cl.saturating_add(used.cl),
            ledger.seeded_usage.rh.saturating_add(used.rh),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn unset_ledger_is_not_recalculated() {
        let mut ledger = LeaveLedger::default();
        ledger.balance = LeaveBalance::new(3, 3, 1);
        assert!(!AccrualService::calculate_pro_rated(&mut ledger, date(2025, 5, 1)));
        assert_eq!(ledger.balance, LeaveBalance::new(3, 3, 1));
    }

    #[test]
    fn new_joiner_is_prorated_once_per_year() {
        let mut ledger = LeaveLedger::default();
        assert!(AccrualService::configure(
            &mut ledger,
            EmployeeClass::NewJoiner { month: 2 },
            date(2025, 3, 15)
        ));
        assert_eq!(ledger.balance, LeaveBalance::new(18, 6, 2));

        ledger.balance.pl = 10;
        assert!(!AccrualService::calculate_pro_rated(&mut ledger, date(2025, 11, 1)));
        assert_eq!(ledger.balance.pl, 10);

        assert!(AccrualService::calculate_pro_rated(&mut ledger, date(2026, 1, 2)));
        assert_eq!(ledger.balance, LeaveBalance::new(18, 6, 2));
    }

    #[test]
    fn used_leaves_are_floored_and_remembered() {
        let mut ledger = LeaveLedger::default();
        AccrualService::configure(&mut ledger, EmployeeClass::Existing, date(2025, 6, 1));
        AccrualService::add_used_leaves(&mut ledger, LeaveBalance::new(30, 3, 1)).unwrap();
        assert_eq!(ledger.balance, LeaveBalance::new(0, 5, 1));
        assert_eq!(ledger.seeded_usage, LeaveBalance::new(30, 3, 1));

        assert!(!AccrualService::calculate_pro_rated(&mut ledger, date(2025, 12, 31)));
        assert_eq!(ledger.balance, LeaveBalance::new(0, 5, 1));
    }

    #[test]
    fn used_leaves_rejected_for_new_joiners() {
        let mut ledger = LeaveLedger::default();
        AccrualService::configure(
            &mut ledger,
            EmployeeClass::NewJoiner { month: 0 },
            date(2025, 1, 10),
        );
        let err = AccrualService::add_used_leaves(&mut ledger, LeaveBalance::new(1, 0, 0))
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(ledger.balance, LeaveBalance::new(22, 7, 2));
    }
}
