use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Identifies which ledger collection a failed lookup targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Income,
    ExpenseCategory,
    Expense,
    Bill,
    Investment,
    Debt,
    Goal,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::Income => "Income",
            RecordKind::ExpenseCategory => "Expense category",
            RecordKind::Expense => "Expense",
            RecordKind::Bill => "Bill",
            RecordKind::Investment => "Investment",
            RecordKind::Debt => "Debt",
            RecordKind::Goal => "Goal",
        };
        f.write_str(label)
    }
}

/// Error type that captures ledger, validation, and persistence failures.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: RecordKind, name: String },
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl BudgetError {
    pub fn not_found(kind: RecordKind, name: impl Into<String>) -> Self {
        BudgetError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        BudgetError::Validation(message.into())
    }

    /// True when a load failed only because nothing has been saved yet.
    pub fn is_missing_snapshot(&self) -> bool {
        matches!(self, BudgetError::Persistence(PersistenceError::Missing(_)))
    }
}

impl From<io::Error> for BudgetError {
    fn from(err: io::Error) -> Self {
        BudgetError::Persistence(PersistenceError::Io(err))
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::Persistence(PersistenceError::Serialize(err))
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        BudgetError::Persistence(PersistenceError::Csv(err))
    }
}

/// Failures raised while reading or writing snapshots.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("no snapshot found at `{}`", .0.display())]
    Missing(PathBuf),
    #[error("snapshot `{}` is malformed: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
    #[error("snapshot `{}` uses schema version {version}, newer than supported", path.display())]
    UnsupportedVersion { path: PathBuf, version: u32 },
    #[error("config `{}` is invalid: {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },
    #[error("backup `{0}` not found")]
    BackupNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, BudgetError>;
