use std::fs;

use chrono::NaiveDate;
use leave_core::storage::{self, KeyValueStore, StorageKey};
use leave_domain::{EmployeeClass, LeaveBalance, LeaveLedger, LeaveRequest, LeaveType};
use leave_storage_json::JsonKeyValueStore;
use tempfile::tempdir;

#[test]
fn json_store_round_trips_a_ledger() {
    let dir = tempdir().expect("tempdir");
    let store = JsonKeyValueStore::new(dir.path().join("data")).expect("create store");

    let mut ledger = LeaveLedger::default();
    ledger.employee = EmployeeClass::NewJoiner { month: 4 };
    ledger.balance = LeaveBalance::new(14, 4, 2);
    ledger.last_calculation_year = Some(2025);
    ledger.selected_rh.push(NaiveDate::from_ymd_opt(2025, 8, 9).unwrap());
    ledger.add_request(LeaveRequest::approved(
        "1746000000000",
        LeaveType::Casual,
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
        2,
        Some("family".into()),
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(),
    ));

    storage::save_all(&store, &ledger).expect("save ledger");
    assert_eq!(store.stored_keys().len(), StorageKey::ALL.len());

    let report = storage::load_ledger(&store);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.ledger, ledger);

    let joining = fs::read_to_string(store.key_path(StorageKey::JoiningMonth)).unwrap();
    assert_eq!(joining, "4");
    let requests = fs::read_to_string(store.key_path(StorageKey::Requests)).unwrap();
    assert!(requests.contains("\"startDate\":\"2025-06-02\""));
}

#[test]
fn json_store_tolerates_missing_and_corrupt_files() {
    let dir = tempdir().expect("tempdir");
    let store = JsonKeyValueStore::new(dir.path()).expect("create store");
    assert!(store.read(StorageKey::Balance).unwrap().is_none());

    fs::write(store.key_path(StorageKey::Balance), "not json").unwrap();
    let report = storage::load_ledger(&store);
    assert_eq!(report.ledger.balance, LeaveBalance::full());
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn json_store_writes_leave_no_temp_files() {
    let dir = tempdir().expect("tempdir");
    let store = JsonKeyValueStore::new(dir.path()).expect("create store");
    store.write(StorageKey::SelectedRh, "[]").unwrap();
    store.write(StorageKey::SelectedRh, "[\"2025-01-01\"]").unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["selectedRH.json".to_string()]);
    assert_eq!(
        store.read(StorageKey::SelectedRh).unwrap().as_deref(),
        Some("[\"2025-01-01\"]")
    );

    store.remove(StorageKey::SelectedRh).unwrap();
    store.remove(StorageKey::SelectedRh).expect("removing twice is fine");
    assert!(store.stored_keys().is_empty());
}
