pub mod json_backend;
pub mod snapshot;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::{errors::Result, ledger::Ledger};

pub use json_backend::{load_ledger_from_path, save_ledger_to_path, JsonSnapshotStorage};
pub use snapshot::{LedgerSnapshot, CURRENT_SCHEMA_VERSION};

/// Ledger restored from disk together with what was changed or noticed while loading.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub path: PathBuf,
    pub migrations: Vec<String>,
    pub warnings: Vec<String>,
}

impl LoadReport {
    pub fn needs_resave(&self) -> bool {
        !self.migrations.is_empty()
    }
}

/// Describes a persisted backup artifact for a snapshot.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub snapshot: String,
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub path: PathBuf,
}

/// Abstraction over persistence backends capable of storing ledger snapshots and backups.
pub trait SnapshotStorage: Send + Sync {
    fn snapshot_path(&self, name: &str) -> PathBuf;
    fn save(&self, ledger: &Ledger, name: &str) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<LoadReport>;
    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<BackupInfo>;
    fn list_backups(&self, name: &str) -> Result<Vec<BackupInfo>>;
    fn restore(&self, name: &str, backup_id: &str) -> Result<LoadReport>;

    fn exists(&self, name: &str) -> bool {
        self.snapshot_path(name).exists()
    }
}
