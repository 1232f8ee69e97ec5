use std::sync::Arc;

use chrono::NaiveDate;

use crate::{
    accrual_service::AccrualService,
    allocation_service::{AllocationService, LeavePriority},
    ids::TimestampIdGenerator,
    ledger_service::{CombinedApplication, LeaveApplication, LedgerService, MAX_SPAN_DAYS},
    plan_service::{LeaveTypeSelection, PlanContext, PlanKind, PlanService},
    time::FixedClock,
    CoreError,
};
use leave_domain::{
    EmployeeClass, HolidayCalendar, LeaveBalance, LeaveLedger, LeaveStatus, LeaveType,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2025, 3, 1)
}

fn ids() -> TimestampIdGenerator {
    TimestampIdGenerator::new(Arc::new(FixedClock::on(today())))
}

fn ledger_with(balance: LeaveBalance) -> LeaveLedger {
    LeaveLedger {
        balance,
        ..LeaveLedger::default()
    }
}

#[test]
fn casual_leave_on_working_week_debits_five_days() {
    let mut ledger = ledger_with(LeaveBalance::new(10, 5, 2));
    let application = LeaveApplication::new(LeaveType::Casual, date(2025, 3, 10), date(2025, 3, 14));
    let id = LedgerService::request_leave(&mut ledger, &application, &ids(), today())
        .expect("request approved");

    assert_eq!(ledger.balance, LeaveBalance::new(10, 0, 2));
    let request = ledger.request(&id).expect("request stored");
    assert_eq!(request.days, 5);
    assert_eq!(request.status, LeaveStatus::Approved);
    assert!(!request.is_pending);
    assert_eq!(request.request_date, today());
}

#[test]
fn paid_leave_counts_weekend_days() {
    let mut ledger = ledger_with(LeaveBalance::new(10, 5, 2));
    let application = LeaveApplication::new(LeaveType::Paid, date(2025, 3, 8), date(2025, 3, 9));
    LedgerService::request_leave(&mut ledger, &application, &ids(), today()).unwrap();
    assert_eq!(ledger.balance.pl, 8);
    assert_eq!(ledger.requests[0].days, 2);
}

#[test]
fn paid_leave_span_cap_is_fifteen_days() {
    let mut ledger = ledger_with(LeaveBalance::full());
    let fifteen = LeaveApplication::new(LeaveType::Paid, date(2025, 4, 1), date(2025, 4, 15));
    LedgerService::request_leave(&mut ledger, &fifteen, &ids(), today()).expect("15 days allowed");
    assert_eq!(ledger.balance.pl, 24 - MAX_SPAN_DAYS);

    let mut roomy = ledger_with(LeaveBalance::new(100, 8, 2));
    let sixteen = LeaveApplication::new(LeaveType::Paid, date(2025, 5, 1), date(2025, 5, 16));
    let err = LedgerService::request_leave(&mut roomy, &sixteen, &ids(), today()).unwrap_err();
    assert!(matches!(err, CoreError::DurationExceeded { days: 16, max: 15 }));
    assert_eq!(roomy.balance.pl, 100);
    assert!(roomy.requests.is_empty());
}

#[test]
fn failed_requests_leave_ledger_untouched() {
    let mut ledger = ledger_with(LeaveBalance::new(2, 1, 0));
    let before = ledger.clone();

    let too_many = LeaveApplication::new(LeaveType::Casual, date(2025, 3, 10), date(2025, 3, 11));
    let err = LedgerService::request_leave(&mut ledger, &too_many, &ids(), today()).unwrap_err();
    assert!(matches!(
        err,
        CoreError::InsufficientBalance {
            leave_type: LeaveType::Casual,
            requested: 2,
            available: 1
        }
    ));
    let weekend_only = LeaveApplication::new(LeaveType::Casual, date(2025, 3, 8), date(2025, 3, 9));
    assert!(LedgerService::request_leave(&mut ledger, &weekend_only, &ids(), today()).is_err());
    let inverted = LeaveApplication::new(LeaveType::Paid, date(2025, 3, 9), date(2025, 3, 8));
    assert!(matches!(
        LedgerService::request_leave(&mut ledger, &inverted, &ids(), today()),
        Err(CoreError::Validation(_))
    ));
    assert_eq!(ledger, before);
}

#[test]
fn restricted_leave_requires_selected_single_day() {
    let mut ledger = ledger_with(LeaveBalance::full());
    ledger.selected_rh.push(date(2025, 1, 1));

    let unselected = LeaveApplication::new(LeaveType::Restricted, date(2025, 1, 2), date(2025, 1, 2));
    let err = LedgerService::request_leave(&mut ledger, &unselected, &ids(), today()).unwrap_err();
    assert!(matches!(err, CoreError::InvalidRestrictedHoliday(_)));

    let two_days = LeaveApplication::new(LeaveType::Restricted, date(2025, 1, 1), date(2025, 1, 2));
    let err = LedgerService::request_leave(&mut ledger, &two_days, &ids(), today()).unwrap_err();
    assert!(matches!(err, CoreError::InvalidRestrictedHoliday(_)));
    assert_eq!(ledger.balance.rh, 2);

    let valid = LeaveApplication::new(LeaveType::Restricted, date(2025, 1, 1), date(2025, 1, 1));
    LedgerService::request_leave(&mut ledger, &valid, &ids(), today()).unwrap();
    assert_eq!(ledger.balance.rh, 1);
}

#[test]
fn planned_leave_confirms_or_rejects_on_live_balance() {
    let mut ledger = ledger_with(LeaveBalance::new(3, 8, 2));
    let plan = LeaveApplication::new(LeaveType::Paid, date(2025, 6, 2), date(2025, 6, 4))
        .with_days(3);
    let generator = ids();
    let first = LedgerService::add_planned_leave(&mut ledger, &plan, &generator, today()).unwrap();
    let second = LedgerService::add_planned_leave(&mut ledger, &plan, &generator, today()).unwrap();
    assert_ne!(first, second);
    assert_eq!(ledger.balance.pl, 3);
    assert_eq!(ledger.pending_requests().len(), 2);

    assert_eq!(
        LedgerService::confirm_leave(&mut ledger, &first).unwrap(),
        LeaveStatus::Confirmed
    );
    assert_eq!(ledger.balance.pl, 0);

    assert_eq!(
        LedgerService::confirm_leave(&mut ledger, &second).unwrap(),
        LeaveStatus::Rejected
    );
    assert_eq!(ledger.balance.pl, 0);
    let rejected = ledger.request(&second).unwrap();
    assert!(!rejected.is_pending);

    assert!(matches!(
        LedgerService::confirm_leave(&mut ledger, &first),
        Err(CoreError::InvalidTransition(_))
    ));
    assert!(matches!(
        LedgerService::confirm_leave(&mut ledger, "missing"),
        Err(CoreError::RequestNotFound(_))
    ));
}

#[test]
fn only_pending_requests_can_be_deleted() {
    let mut ledger = ledger_with(LeaveBalance::full());
    let generator = ids();
    let pending = LedgerService::add_planned_leave(
        &mut ledger,
        &LeaveApplication::new(LeaveType::Casual, date(2025, 6, 2), date(2025, 6, 2)),
        &generator,
        today(),
    )
    .unwrap();
    let approved = LedgerService::request_leave(
        &mut ledger,
        &LeaveApplication::new(LeaveType::Casual, date(2025, 6, 3), date(2025, 6, 3)),
        &generator,
        today(),
    )
    .unwrap();

    LedgerService::delete_leave(&mut ledger, &pending).unwrap();
    let deleted = ledger.request(&pending).unwrap();
    assert_eq!(deleted.status, LeaveStatus::Deleted);
    assert!(!deleted.is_pending);
    assert_eq!(ledger.balance.cl, 7);

    assert!(matches!(
        LedgerService::delete_leave(&mut ledger, &approved),
        Err(CoreError::InvalidTransition(_))
    ));
}

#[test]
fn restricted_selection_is_capped_and_round_trips() {
    let holidays = HolidayCalendar::india_2025();
    let mut ledger = LeaveLedger::default();
    let before = ledger.balance;

    LedgerService::select_restricted_holiday(&mut ledger, &holidays, date(2025, 1, 1)).unwrap();
    assert!(!LedgerService::unselect_restricted_holiday(&mut ledger, date(2025, 1, 1)).unwrap());
    assert_eq!(ledger.balance, before);
    assert!(ledger.selected_rh.is_empty());

    LedgerService::select_restricted_holiday(&mut ledger, &holidays, date(2025, 1, 1)).unwrap();
    assert!(matches!(
        LedgerService::select_restricted_holiday(&mut ledger, &holidays, date(2025, 1, 1)),
        Err(CoreError::Validation(_))
    ));
    LedgerService::select_restricted_holiday(&mut ledger, &holidays, date(2025, 1, 6)).unwrap();
    assert!(matches!(
        LedgerService::select_restricted_holiday(&mut ledger, &holidays, date(2025, 1, 14)),
        Err(CoreError::SelectionCapExceeded { cap: 2 })
    ));
    assert!(matches!(
        LedgerService::select_restricted_holiday(&mut ledger, &holidays, date(2025, 1, 2)),
        Err(CoreError::InvalidRestrictedHoliday(_))
    ));
}

#[test]
fn unselect_restores_only_unused_days_up_to_ceiling() {
    let holidays = HolidayCalendar::india_2025();
    let mut ledger = LeaveLedger::default();
    LedgerService::select_restricted_holiday(&mut ledger, &holidays, date(2025, 1, 1)).unwrap();
    LedgerService::select_restricted_holiday(&mut ledger, &holidays, date(2025, 1, 6)).unwrap();
    LedgerService::request_leave(
        &mut ledger,
        &LeaveApplication::new(LeaveType::Restricted, date(2025, 1, 1), date(2025, 1, 1)),
        &ids(),
        today(),
    )
    .unwrap();
    assert_eq!(ledger.balance.rh, 1);

    // The used day is not refunded.
    assert!(!LedgerService::unselect_restricted_holiday(&mut ledger, date(2025, 1, 1)).unwrap());
    assert_eq!(ledger.balance.rh, 1);

    // An untouched selection cannot lift rh past 2 - debited RH days.
    assert!(!LedgerService::unselect_restricted_holiday(&mut ledger, date(2025, 1, 6)).unwrap());
    assert_eq!(ledger.balance.rh, 1);

    // A manual drop below the ceiling is restored by one.
    ledger.selected_rh.push(date(2025, 1, 14));
    ledger.balance.rh = 0;
    assert!(LedgerService::unselect_restricted_holiday(&mut ledger, date(2025, 1, 14)).unwrap());
    assert_eq!(ledger.balance.rh, 1);

    assert!(LedgerService::unselect_restricted_holiday(&mut ledger, date(2025, 1, 14)).is_err());
}

#[test]
fn reset_restores_defaults() {
    let mut ledger = ledger_with(LeaveBalance::new(1, 1, 0));
    ledger.employee = EmployeeClass::Existing;
    ledger.selected_rh.push(date(2025, 1, 1));
    ledger.last_calculation_year = Some(2025);
    LedgerService::reset_all_data(&mut ledger);
    assert_eq!(ledger, LeaveLedger::default());
}

#[test]
fn recalculation_is_idempotent_within_a_year() {
    let mut ledger = LeaveLedger::default();
    ledger.employee = EmployeeClass::Existing;
    assert!(AccrualService::calculate_pro_rated(&mut ledger, today()));
    let once = ledger.clone();
    assert!(!AccrualService::calculate_pro_rated(&mut ledger, today()));
    assert_eq!(ledger, once);
}

#[test]
fn reconfiguring_keeps_booked_leave_charged() {
    let mut ledger = LeaveLedger::default();
    AccrualService::configure(&mut ledger, EmployeeClass::Existing, today());
    let application = LeaveApplication::new(LeaveType::Casual, date(2025, 3, 10), date(2025, 3, 14));
    LedgerService::request_leave(&mut ledger, &application, &ids(), today()).unwrap();
    assert_eq!(ledger.balance, LeaveBalance::new(24, 3, 2));

    assert!(AccrualService::configure(&mut ledger, EmployeeClass::Existing, today()));
    assert_eq!(ledger.balance, LeaveBalance::new(24, 3, 2));
    assert_eq!(ledger.active_requests().count(), 1);

    AccrualService::configure(&mut ledger, EmployeeClass::NewJoiner { month: 2 }, today());
    assert_eq!(ledger.balance, LeaveBalance::new(18, 1, 2));
}

#[test]
fn combined_request_splits_by_priority() {
    let mut ledger = ledger_with(LeaveBalance::new(10, 2, 2));
    ledger.selected_rh.push(date(2025, 3, 13));
    let application = CombinedApplication {
        start_date: date(2025, 3, 13),
        end_date: date(2025, 3, 17),
        selection: LeaveTypeSelection::all(),
        priority: LeavePriority::ClFirst,
        reason: Some("Holi trip".into()),
    };
    let created =
        LedgerService::request_combined(&mut ledger, &application, &ids(), today()).unwrap();
    assert_eq!(created.len(), 3);
    // 5 calendar days: 1 RH, then CL takes 2, PL the remaining 2.
    assert_eq!(ledger.balance, LeaveBalance::new(8, 0, 1));
    let rh = ledger
        .requests
        .iter()
        .find(|request| request.leave_type == LeaveType::Restricted)
        .unwrap();
    assert_eq!(rh.end_date, date(2025, 3, 13));
    assert_eq!(
        rh.reason.as_deref(),
        Some("Holi trip (Combined leave request - RH portion)")
    );
}

#[test]
fn combined_request_is_all_or_nothing() {
    let mut ledger = ledger_with(LeaveBalance::new(1, 1, 0));
    let before = ledger.clone();
    let application = CombinedApplication {
        start_date: date(2025, 3, 10),
        end_date: date(2025, 3, 14),
        selection: "pl,cl".parse().unwrap(),
        priority: LeavePriority::Balanced,
        reason: None,
    };
    let err =
        LedgerService::request_combined(&mut ledger, &application, &ids(), today()).unwrap_err();
    assert!(matches!(err, CoreError::InsufficientBalance { .. }));
    assert_eq!(ledger, before);

    let rh_range = CombinedApplication {
        selection: "rh".parse().unwrap(),
        ..application
    };
    assert!(matches!(
        LedgerService::request_combined(&mut ledger, &rh_range, &ids(), today()),
        Err(CoreError::InvalidRestrictedHoliday(_))
    ));
}

#[test]
fn using_a_plan_books_pending_portions() {
    let holidays = HolidayCalendar::india_2025();
    let mut ledger = ledger_with(LeaveBalance::new(10, 2, 2));
    ledger.selected_rh.push(date(2025, 3, 13));

    let plans = {
        let ctx = PlanContext::from_ledger(&ledger, &holidays);
        PlanService::suggest(&ctx, date(2025, 3, 10), date(2025, 3, 16), LeaveTypeSelection::all())
            .unwrap()
    };
    let minimum = &plans[0];
    assert_eq!(minimum.kind, PlanKind::MinimumLeave);
    assert_eq!(minimum.leaves_required, 4);

    let created = AllocationService::use_plan(
        &mut ledger,
        minimum,
        LeavePriority::ClFirst,
        &ids(),
        today(),
    )
    .unwrap();
    assert_eq!(created.len(), 3);
    assert_eq!(ledger.balance, LeaveBalance::new(10, 2, 2));
    assert!(ledger.requests.iter().all(|request| request.is_pending));

    let cl = ledger
        .requests
        .iter()
        .find(|request| request.leave_type == LeaveType::Casual)
        .unwrap();
    assert_eq!(cl.days, 2);
    assert_eq!(
        cl.reason.as_deref(),
        Some("Minimum Leave Plan: This plan uses the minimum number of leave days by utilizing weekends and holidays. (CL portion)")
    );
    let pl = ledger
        .requests
        .iter()
        .find(|request| request.leave_type == LeaveType::Paid)
        .unwrap();
    assert_eq!(pl.days, 1);
    assert_eq!((pl.start_date, pl.end_date), (date(2025, 3, 10), date(2025, 3, 13)));
}

#[test]
fn using_a_plan_beyond_balance_books_nothing() {
    let holidays = HolidayCalendar::india_2025();
    let mut ledger = ledger_with(LeaveBalance::new(1, 1, 0));
    let plans = {
        let ctx = PlanContext::from_ledger(&ledger, &holidays);
        PlanService::suggest(&ctx, date(2025, 6, 2), date(2025, 6, 6), "pl,cl".parse().unwrap())
            .unwrap()
    };
    let err = AllocationService::use_plan(
        &mut ledger,
        &plans[0],
        LeavePriority::PlFirst,
        &ids(),
        today(),
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::InsufficientBalance { .. }));
    assert!(ledger.requests.is_empty());
}
