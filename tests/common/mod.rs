#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use budget_manager::{config::ConfigManager, ledger::Ledger, storage::JsonSnapshotStorage};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh data directory that outlives the calling test.
pub fn test_base_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated storage and config managers backed by a unique directory.
pub fn setup_test_env() -> (JsonSnapshotStorage, ConfigManager, PathBuf) {
    let base = test_base_dir();
    let storage = JsonSnapshotStorage::from_base(&base, 3).expect("create json storage backend");
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (storage, config_manager, base)
}

/// A ledger touching every collection.
pub fn sample_ledger() -> Ledger {
    let mut ledger = Ledger::new(35, 60_000.0);
    ledger.add_income("Salary", 5_000.0);
    ledger.add_income("Freelance", 450.25);
    ledger.add_expense("Groceries", 300.0, "Food");
    ledger.add_expense("Dining out", 120.5, "Food");
    ledger.add_expense("Bus pass", 75.0, "Transportation");
    ledger.add_bill("Rent", 1_200.0);
    ledger.add_investment("Index fund", 10_000.0, 0.07);
    ledger.add_debt("CarLoan", 10_000.0, 0.05, 250.0);
    ledger.add_goal("Emergency fund", 6_000.0);
    ledger
        .contribute_to_goal("Emergency fund", 1_500.0)
        .expect("goal exists");
    ledger
}
