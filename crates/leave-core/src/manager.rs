use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use leave_domain::{
    EmployeeClass, HolidayCalendar, LeaveBalance, LeaveLedger, LeaveRequest, LeaveStatus,
};

use crate::{
    accrual_service::AccrualService,
    allocation_service::{AllocationService, LeavePriority},
    ids::IdGenerator,
    ledger_service::{CombinedApplication, LeaveApplication, LedgerService},
    outcome::{NotificationSink, Outcome},
    plan_service::{LeaveSuggestion, LeaveTypeSelection, PlanContext, PlanService},
    search_service::{SearchOptions, SearchService, WindowPlan},
    storage::{self, KeyValueStore, StorageKey},
    summary_service::{DashboardSummary, HistoryGroup, SummaryService},
    time::Clock,
    CoreError,
};

/// Facade that owns one employee's ledger and coordinates persistence,
/// the clock, id generation and notifications around the stateless services.
pub struct LeaveManager {
    ledger: LeaveLedger,
    holidays: HolidayCalendar,
    store: Box<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ids: Box<dyn IdGenerator>,
    sink: Option<Arc<dyn NotificationSink>>,
    load_warnings: Vec<String>,
}

impl LeaveManager {
    /// Loads the ledger from `store`, rewrites undecodable keys with their
    /// defaults and applies the yearly entitlement check.
    pub fn open(
        store: Box<dyn KeyValueStore>,
        holidays: HolidayCalendar,
        clock: Arc<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        let report = storage::load_ledger(store.as_ref());
        for warning in &report.warnings {
            warn!(%warning, "ledger load fallback");
        }
        let mut manager = Self {
            ledger: report.ledger,
            holidays,
            store,
            clock,
            ids,
            sink: None,
            load_warnings: report.warnings,
        };
        if !report.replaced.is_empty() {
            info!(keys = ?report.replaced, "rewriting unreadable keys with defaults");
            manager.persist(&report.replaced);
        }
        manager.calculate_pro_rated_leaves();
        manager
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn ledger(&self) -> &LeaveLedger {
        &self.ledger
    }

    pub fn balance(&self) -> LeaveBalance {
        self.ledger.balance
    }

    pub fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }

    pub fn employee(&self) -> EmployeeClass {
        self.ledger.employee
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn load_warnings(&self) -> &[String] {
        &self.load_warnings
    }

    pub fn request(&self, id: &str) -> Option<&LeaveRequest> {
        self.ledger.request(id)
    }

    /// Recomputes the entitlement if the year has advanced. Returns `true` on change.
    pub fn calculate_pro_rated_leaves(&mut self) -> bool {
        let today = self.today();
        let changed = AccrualService::calculate_pro_rated(&mut self.ledger, today);
        if changed {
            info!(
                employee = %self.ledger.employee,
                balance = %self.ledger.balance,
                "entitlement recalculated"
            );
            self.persist(&[
                StorageKey::Balance,
                StorageKey::LastCalculationYear,
                StorageKey::SeededUsage,
            ]);
        }
        changed
    }

    /// Sets the employee classification and re-baselines the balance.
    ///
    /// `used` seeds consumption that predates tracking and is only accepted for
    /// existing employees.
    pub fn configure_employee(
        &mut self,
        class: EmployeeClass,
        used: Option<LeaveBalance>,
    ) -> Result<(), CoreError> {
        let result = if !class.is_configured() {
            Err(CoreError::Validation(
                "choose a joining month or mark the employee as existing".into(),
            ))
        } else if used.is_some() && class != EmployeeClass::Existing {
            Err(CoreError::Validation(
                "previously used leave can only be recorded for existing employees".into(),
            ))
        } else {
            let today = self.today();
            AccrualService::configure(&mut self.ledger, class, today);
            match used {
                Some(used) => AccrualService::add_used_leaves(&mut self.ledger, used),
                None => Ok(()),
            }
        };
        let balance = self.ledger.balance;
        self.finish(
            result,
            &[
                StorageKey::JoiningMonth,
                StorageKey::Balance,
                StorageKey::LastCalculationYear,
                StorageKey::SeededUsage,
            ],
            |_| {
                Outcome::success(
                    "Settings Saved",
                    format!("Profile set to {class}; balance is now {balance}"),
                )
            },
        )
    }

    pub fn add_used_leaves(&mut self, used: LeaveBalance) -> Result<(), CoreError> {
        let result = AccrualService::add_used_leaves(&mut self.ledger, used);
        let balance = self.ledger.balance;
        self.finish(
            result,
            &[StorageKey::Balance, StorageKey::SeededUsage],
            |_| Outcome::success("Used Leave Recorded", format!("Balance is now {balance}")),
        )
    }

    pub fn request_leave(&mut self, application: &LeaveApplication) -> Result<String, CoreError> {
        let today = self.today();
        let result =
            LedgerService::request_leave(&mut self.ledger, application, self.ids.as_ref(), today);
        if let Ok(id) = &result {
            info!(
                request_id = %id,
                leave_type = %application.leave_type,
                start = %application.start_date,
                end = %application.end_date,
                "leave approved"
            );
        }
        self.finish(
            result,
            &[StorageKey::Balance, StorageKey::Requests],
            |_| {
                Outcome::success(
                    "Leave Request Submitted",
                    "Your leave request has been approved",
                )
            },
        )
    }

    pub fn request_combined(
        &mut self,
        application: &CombinedApplication,
    ) -> Result<Vec<String>, CoreError> {
        let today = self.today();
        let result = LedgerService::request_combined(
            &mut self.ledger,
            application,
            self.ids.as_ref(),
            today,
        );
        if let Ok(ids) = &result {
            info!(
                requests = ids.len(),
                types = %application.selection,
                priority = %application.priority,
                "combined leave approved"
            );
        }
        self.finish(
            result,
            &[StorageKey::Balance, StorageKey::Requests],
            |ids| {
                Outcome::success(
                    "Leave Request Submitted",
                    format!("{} leave request(s) approved", ids.len()),
                )
            },
        )
    }

    pub fn add_planned_leave(
        &mut self,
        application: &LeaveApplication,
    ) -> Result<String, CoreError> {
        let today = self.today();
        let result = LedgerService::add_planned_leave(
            &mut self.ledger,
            application,
            self.ids.as_ref(),
            today,
        );
        if let Ok(id) = &result {
            info!(request_id = %id, leave_type = %application.leave_type, "planned leave recorded");
        }
        self.finish(result, &[StorageKey::Requests], |_| {
            Outcome::success(
                "Leave Planned",
                "The leave is pending; confirm it from the history.",
            )
        })
    }

    pub fn confirm_leave(&mut self, id: &str) -> Result<LeaveStatus, CoreError> {
        let result = LedgerService::confirm_leave(&mut self.ledger, id);
        match &result {
            Ok(LeaveStatus::Rejected) => {
                warn!(request_id = %id, "pending leave rejected for insufficient balance")
            }
            Ok(status) => info!(request_id = %id, %status, "pending leave settled"),
            Err(_) => {}
        }
        self.finish(
            result,
            &[StorageKey::Balance, StorageKey::Requests],
            |status| match status {
                LeaveStatus::Rejected => Outcome {
                    success: false,
                    title: "Leave Rejected".into(),
                    message: "Not enough balance to confirm this leave".into(),
                },
                _ => Outcome::success("Leave Confirmed", "The leave has been confirmed"),
            },
        )
    }

    pub fn delete_leave(&mut self, id: &str) -> Result<(), CoreError> {
        let result = LedgerService::delete_leave(&mut self.ledger, id);
        if result.is_ok() {
            info!(request_id = %id, "pending leave deleted");
        }
        self.finish(result, &[StorageKey::Requests], |_| {
            Outcome::success("Leave Deleted", "The pending leave has been removed")
        })
    }

    pub fn select_restricted_holiday(&mut self, date: NaiveDate) -> Result<(), CoreError> {
        let result =
            LedgerService::select_restricted_holiday(&mut self.ledger, &self.holidays, date);
        let name = self
            .holidays
            .restricted_on(date)
            .map(|holiday| holiday.name.clone())
            .unwrap_or_default();
        self.finish(result, &[StorageKey::SelectedRh], |_| {
            Outcome::success("Restricted Holiday Selected", format!("{name} ({date})"))
        })
    }

    /// Returns `true` when an RH day was restored to the balance.
    pub fn unselect_restricted_holiday(&mut self, date: NaiveDate) -> Result<bool, CoreError> {
        let result = LedgerService::unselect_restricted_holiday(&mut self.ledger, date);
        if let Ok(false) = result {
            debug!(%date, ceiling = self.ledger.rh_ceiling(), "RH balance left unchanged");
        }
        self.finish(
            result,
            &[StorageKey::SelectedRh, StorageKey::Balance],
            |restored| {
                let detail = if *restored {
                    "one RH day returned to your balance"
                } else {
                    "RH balance unchanged"
                };
                Outcome::success(
                    "Restricted Holiday Removed",
                    format!("{date} unselected; {detail}"),
                )
            },
        )
    }

    /// Restores defaults in memory and removes every persisted key.
    pub fn reset_all_data(&mut self) {
        LedgerService::reset_all_data(&mut self.ledger);
        if let Err(err) = storage::clear(self.store.as_ref()) {
            warn!(error = %err, "failed to clear persisted leave data");
        }
        info!("all leave data reset");
        self.notify(&Outcome::success(
            "Data Reset",
            "All leave data has been reset to defaults",
        ));
    }

    pub fn suggest_plans(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        selection: LeaveTypeSelection,
    ) -> Result<Vec<LeaveSuggestion>, CoreError> {
        let ctx = PlanContext::from_ledger(&self.ledger, &self.holidays);
        PlanService::suggest(&ctx, start, end, selection)
    }

    /// Books a suggestion as pending requests split by `priority`.
    pub fn use_plan(
        &mut self,
        suggestion: &LeaveSuggestion,
        priority: LeavePriority,
    ) -> Result<Vec<String>, CoreError> {
        let today = self.today();
        let result = AllocationService::use_plan(
            &mut self.ledger,
            suggestion,
            priority,
            self.ids.as_ref(),
            today,
        );
        if let Ok(ids) = &result {
            info!(plan = %suggestion.title, %priority, requests = ids.len(), "plan booked");
        }
        self.finish(result, &[StorageKey::Requests], |_| {
            Outcome::success(
                "Leave Plan Added to History",
                "Your leave plan has been added to Leave History. Confirm or delete it there.",
            )
        })
    }

    pub fn search_windows(
        &self,
        days: u32,
        look_ahead_months: u32,
        options: SearchOptions,
    ) -> Result<Vec<WindowPlan>, CoreError> {
        SearchService::find_optimal_windows(
            &self.holidays,
            &self.ledger.selected_rh,
            self.today(),
            days,
            look_ahead_months,
            options,
        )
    }

    pub fn dashboard(&self) -> DashboardSummary {
        SummaryService::dashboard(&self.ledger, &self.holidays, self.today())
    }

    pub fn history(&self) -> Vec<HistoryGroup> {
        SummaryService::history(&self.ledger)
    }

    pub fn pending(&self) -> Vec<LeaveRequest> {
        SummaryService::pending(&self.ledger)
    }

    /// Invariant drift detected in the current snapshot.
    pub fn audit(&self) -> Vec<String> {
        storage::ledger_warnings(&self.ledger, &self.holidays)
    }

    fn finish<T>(
        &self,
        result: Result<T, CoreError>,
        keys: &[StorageKey],
        describe: impl FnOnce(&T) -> Outcome,
    ) -> Result<T, CoreError> {
        match &result {
            Ok(value) => {
                self.persist(keys);
                self.notify(&describe(value));
            }
            Err(err) => {
                warn!(error = %err, "leave operation rejected");
                self.notify(&Outcome::failure(err));
            }
        }
        result
    }

    /// Write-through; failures are logged and the in-memory ledger stays authoritative.
    fn persist(&self, keys: &[StorageKey]) {
        for key in keys {
            if let Err(err) = storage::save_key(self.store.as_ref(), &self.ledger, *key) {
                warn!(%key, error = %err, "failed to persist leave data");
            }
        }
    }

    fn notify(&self, outcome: &Outcome) {
        if let Some(sink) = &self.sink {
            sink.notify(outcome);
        }
    }
}
