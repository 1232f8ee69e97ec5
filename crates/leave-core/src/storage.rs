use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, RwLock},
};

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};

use leave_domain::{
    balance::RH_CAP, EmployeeClass, HolidayCalendar, LeaveBalance, LeaveLedger, LeaveRequest,
    LeaveType, RH_SELECTION_CAP,
};

use crate::CoreError;

/// The persisted keys, one per piece of ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    Balance,
    Requests,
    SelectedRh,
    JoiningMonth,
    LastCalculationYear,
    SeededUsage,
}

impl StorageKey {
    pub const ALL: [StorageKey; 6] = [
        StorageKey::Balance,
        StorageKey::Requests,
        StorageKey::SelectedRh,
        StorageKey::JoiningMonth,
        StorageKey::LastCalculationYear,
        StorageKey::SeededUsage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::Balance => "leaveBalance",
            StorageKey::Requests => "leaveRequests",
            StorageKey::SelectedRh => "selectedRH",
            StorageKey::JoiningMonth => "joiningMonth",
            StorageKey::LastCalculationYear => "lastCalculationYear",
            StorageKey::SeededUsage => "seededUsage",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstraction over persistence backends holding one JSON document per key.
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw document for `key`, or `None` when nothing is stored.
    fn read(&self, key: StorageKey) -> Result<Option<String>, CoreError>;
    fn write(&self, key: StorageKey, value: &str) -> Result<(), CoreError>;
    fn remove(&self, key: StorageKey) -> Result<(), CoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn read(&self, key: StorageKey) -> Result<Option<String>, CoreError> {
        (**self).read(key)
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), CoreError> {
        (**self).write(key, value)
    }

    fn remove(&self, key: StorageKey) -> Result<(), CoreError> {
        (**self).remove(key)
    }
}

/// In-process store used by tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<StorageKey, String>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail; reads see whatever was seeded.
    pub fn read_only(seed: &[(StorageKey, &str)]) -> Self {
        let entries = seed
            .iter()
            .map(|(key, value)| (*key, value.to_string()))
            .collect();
        Self {
            entries: RwLock::new(entries),
            read_only: true,
        }
    }

    pub fn raw(&self, key: StorageKey) -> Option<String> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(&key).cloned())
    }

    pub fn insert_raw(&self, key: StorageKey, value: impl Into<String>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, value.into());
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: StorageKey) -> Result<Option<String>, CoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        Ok(entries.get(&key).cloned())
    }

    fn write(&self, key: StorageKey, value: &str) -> Result<(), CoreError> {
        if self.read_only {
            return Err(CoreError::Storage(format!("store is read-only; cannot write {key}")));
        }
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<(), CoreError> {
        if self.read_only {
            return Err(CoreError::Storage(format!("store is read-only; cannot remove {key}")));
        }
        let mut entries = self
            .entries
            .write()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))?;
        entries.remove(&key);
        Ok(())
    }
}

/// A ledger assembled from storage plus any fallbacks that were applied.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub ledger: LeaveLedger,
    pub warnings: Vec<String>,
    /// Keys whose stored value could not be decoded and now hold a default.
    pub replaced: Vec<StorageKey>,
}

/// Reads every key, substituting defaults for missing or unreadable entries.
pub fn load_ledger(store: &dyn KeyValueStore) -> LoadReport {
    let mut report = LoadReport {
        ledger: LeaveLedger::default(),
        warnings: Vec::new(),
        replaced: Vec::new(),
    };

    if let Some(balance) = read_key::<LeaveBalance>(store, StorageKey::Balance, &mut report) {
        report.ledger.balance = balance;
    }
    if let Some(requests) = read_key::<Vec<LeaveRequest>>(store, StorageKey::Requests, &mut report)
    {
        report.ledger.requests = requests;
    }
    if let Some(selected) = read_key::<Vec<NaiveDate>>(store, StorageKey::SelectedRh, &mut report)
    {
        report.ledger.selected_rh = selected;
    }
    if let Some(code) = read_key::<i32>(store, StorageKey::JoiningMonth, &mut report) {
        match EmployeeClass::from_code(code) {
            Some(class) => report.ledger.employee = class,
            None => {
                report.warnings.push(format!(
                    "{} holds unknown code {code}; treating employee as not configured",
                    StorageKey::JoiningMonth
                ));
                report.replaced.push(StorageKey::JoiningMonth);
            }
        }
    }
    report.ledger.last_calculation_year =
        read_key::<Option<i32>>(store, StorageKey::LastCalculationYear, &mut report).flatten();
    if let Some(seeded) = read_key::<LeaveBalance>(store, StorageKey::SeededUsage, &mut report) {
        report.ledger.seeded_usage = seeded;
    }

    report
}

/// Undecodable values are recorded in `report.replaced`; read failures only warn.
fn read_key<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: StorageKey,
    report: &mut LoadReport,
) -> Option<T> {
    match store.read(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                report
                    .warnings
                    .push(format!("{key} is unreadable ({err}); using default"));
                report.replaced.push(key);
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            report
                .warnings
                .push(format!("{key} could not be read ({err}); using default"));
            None
        }
    }
}

/// Writes the value backing `key` from `ledger`.
pub fn save_key(
    store: &dyn KeyValueStore,
    ledger: &LeaveLedger,
    key: StorageKey,
) -> Result<(), CoreError> {
    let raw = match key {
        StorageKey::Balance => encode(&ledger.balance)?,
        StorageKey::Requests => encode(&ledger.requests)?,
        StorageKey::SelectedRh => encode(&ledger.selected_rh)?,
        StorageKey::JoiningMonth => encode(&ledger.employee.code())?,
        StorageKey::LastCalculationYear => encode(&ledger.last_calculation_year)?,
        StorageKey::SeededUsage => encode(&ledger.seeded_usage)?,
    };
    store.write(key, &raw)
}

pub fn save_all(store: &dyn KeyValueStore, ledger: &LeaveLedger) -> Result<(), CoreError> {
    StorageKey::ALL
        .iter()
        .try_for_each(|key| save_key(store, ledger, *key))
}

/// Removes every persisted key.
pub fn clear(store: &dyn KeyValueStore) -> Result<(), CoreError> {
    StorageKey::ALL.iter().try_for_each(|key| store.remove(*key))
}

fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, CoreError> {
    Ok(serde_json::to_string(value)?)
}

/// Detects invariant drift within a ledger snapshot.
pub fn ledger_warnings(ledger: &LeaveLedger, calendar: &HolidayCalendar) -> Vec<String> {
    let mut warnings = Vec::new();

    if ledger.selected_rh.len() > RH_SELECTION_CAP {
        warnings.push(format!(
            "{} restricted holidays selected; at most {RH_SELECTION_CAP} are allowed",
            ledger.selected_rh.len()
        ));
    }
    if ledger.balance.rh > RH_CAP {
        warnings.push(format!(
            "RH balance {} exceeds the yearly cap of {RH_CAP}",
            ledger.balance.rh
        ));
    }
    if ledger.balance.rh > ledger.rh_ceiling() {
        warnings.push(format!(
            "RH balance {} is above the {} left after recorded usage",
            ledger.balance.rh,
            ledger.rh_ceiling()
        ));
    }
    for date in &ledger.selected_rh {
        if calendar.covers(*date) && calendar.restricted_on(*date).is_none() {
            warnings.push(format!("selected date {date} is not a restricted holiday"));
        }
    }
    for request in ledger.active_requests() {
        if request.leave_type == LeaveType::Restricted && !ledger.is_rh_selected(request.start_date)
        {
            warnings.push(format!(
                "RH request {} on {} refers to an unselected date",
                request.id, request.start_date
            ));
        }
        if request.end_date < request.start_date {
            warnings.push(format!("request {} ends before it starts", request.id));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let store = MemoryStore::new();
        let report = load_ledger(&store);
        assert_eq!(report.ledger, LeaveLedger::default());
        assert!(report.warnings.is_empty());
        assert!(report.replaced.is_empty());
    }

    #[test]
    fn corrupt_keys_fall_back_with_warnings() {
        let store = MemoryStore::new();
        store.insert_raw(StorageKey::Balance, "{not json");
        store.insert_raw(StorageKey::JoiningMonth, "42");
        store.insert_raw(StorageKey::SelectedRh, "[\"2025-01-01\"]");

        let report = load_ledger(&store);
        assert_eq!(report.ledger.balance, LeaveBalance::full());
        assert_eq!(report.ledger.employee, EmployeeClass::Unset);
        assert_eq!(report.ledger.selected_rh.len(), 1);
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].contains("leaveBalance"));
        assert_eq!(
            report.replaced,
            vec![StorageKey::Balance, StorageKey::JoiningMonth]
        );
    }

    #[test]
    fn joining_month_keeps_legacy_encoding() {
        let store = MemoryStore::new();
        let mut ledger = LeaveLedger::default();
        ledger.employee = EmployeeClass::Existing;
        save_all(&store, &ledger).unwrap();
        assert_eq!(store.raw(StorageKey::JoiningMonth).as_deref(), Some("-99"));

        let reloaded = load_ledger(&store).ledger;
        assert_eq!(reloaded, ledger);

        clear(&store).unwrap();
        assert!(store.raw(StorageKey::Balance).is_none());
    }

    #[test]
    fn warnings_flag_rh_drift() {
        let mut ledger = LeaveLedger::default();
        ledger.selected_rh = vec![
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 7).unwrap(),
        ];
        ledger.seeded_usage.rh = 1;
        let warnings = ledger_warnings(&ledger, &HolidayCalendar::india_2025());
        assert!(warnings.iter().any(|w| w.contains("at most 2")));
        assert!(warnings.iter().any(|w| w.contains("left after recorded usage")));
        assert!(warnings.iter().any(|w| w.contains("2025-01-07")));
    }
}
