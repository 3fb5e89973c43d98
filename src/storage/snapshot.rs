//! On-disk snapshot schema and legacy-format migration.

use std::{collections::BTreeMap, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    errors::{PersistenceError, Result},
    ledger::{AmountMap, Debt, ExpenseMap, FinancialGoal, Investment, Ledger, Profile},
};

pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const DEBTS_FIELD: &str = "debts";
const LEGACY_DEBTS_FIELD: &str = "debits";
const SCHEMA_FIELD: &str = "schema_version";

/// Serialized form of a [`Ledger`]. Field names match the documented snapshot format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub schema_version: u32,
    pub age: u32,
    pub annual_income: f64,
    #[serde(default)]
    pub incomes: AmountMap,
    #[serde(default)]
    pub expenses: ExpenseMap,
    #[serde(default)]
    pub bills: AmountMap,
    #[serde(default)]
    pub investments: BTreeMap<String, Investment>,
    #[serde(default)]
    pub debts: BTreeMap<String, Debt>,
    #[serde(default)]
    pub financial_goals: BTreeMap<String, FinancialGoal>,
}

impl LedgerSnapshot {
    pub fn from_ledger(ledger: &Ledger) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            age: ledger.age(),
            annual_income: ledger.annual_income(),
            incomes: ledger.incomes().clone(),
            expenses: ledger.expenses().clone(),
            bills: ledger.bills().clone(),
            investments: ledger.investments().clone(),
            debts: ledger.debts().clone(),
            financial_goals: ledger.financial_goals().clone(),
        }
    }

    pub fn into_ledger(self) -> Ledger {
        Ledger::from_parts(
            Profile::new(self.age, self.annual_income),
            self.incomes,
            self.expenses,
            self.bills,
            self.investments,
            self.debts,
            self.financial_goals,
        )
    }
}

/// Result of decoding a snapshot document.
#[derive(Debug, Clone)]
pub struct DecodedSnapshot {
    pub ledger: Ledger,
    pub migrations: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn encode(ledger: &Ledger) -> Result<String> {
    Ok(serde_json::to_string_pretty(&LedgerSnapshot::from_ledger(ledger))?)
}

/// Parses snapshot text, upgrading legacy layouts before typed deserialization.
pub fn decode(path: &Path, data: &str) -> Result<DecodedSnapshot> {
    let malformed = |reason: String| PersistenceError::Malformed {
        path: path.to_path_buf(),
        reason,
    };
    let mut value: Value = serde_json::from_str(data).map_err(|err| malformed(err.to_string()))?;
    let migrations = migrate(&mut value).map_err(malformed)?;
    let snapshot: LedgerSnapshot =
        serde_json::from_value(value).map_err(|err| malformed(err.to_string()))?;
    if snapshot.schema_version > CURRENT_SCHEMA_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            path: path.to_path_buf(),
            version: snapshot.schema_version,
        }
        .into());
    }
    let warnings = snapshot_warnings(&snapshot);
    Ok(DecodedSnapshot {
        ledger: snapshot.into_ledger(),
        migrations,
        warnings,
    })
}

fn migrate(value: &mut Value) -> std::result::Result<Vec<String>, String> {
    let object = value
        .as_object_mut()
        .ok_or_else(|| "snapshot root must be a JSON object".to_string())?;
    let mut migrations = Vec::new();

    if object.contains_key(LEGACY_DEBTS_FIELD) {
        if object.contains_key(DEBTS_FIELD) {
            return Err(format!(
                "both `{}` and legacy `{}` fields are present",
                DEBTS_FIELD, LEGACY_DEBTS_FIELD
            ));
        }
        if let Some(debts) = object.remove(LEGACY_DEBTS_FIELD) {
            object.insert(DEBTS_FIELD.to_string(), debts);
            migrations.push(format!(
                "renamed legacy `{}` field to `{}`",
                LEGACY_DEBTS_FIELD, DEBTS_FIELD
            ));
        }
    }

    if !object.contains_key(SCHEMA_FIELD) {
        object.insert(SCHEMA_FIELD.to_string(), Value::from(CURRENT_SCHEMA_VERSION));
        migrations.push(format!("stamped schema version {}", CURRENT_SCHEMA_VERSION));
    }

    Ok(migrations)
}

/// Detects values that load fine but are probably data-entry mistakes.
fn snapshot_warnings(snapshot: &LedgerSnapshot) -> Vec<String> {
    let mut warnings = Vec::new();
    for (category, entries) in &snapshot.expenses {
        if entries.is_empty() {
            warnings.push(format!("dropped empty expense category `{}`", category));
        }
        for (name, amount) in entries {
            if *amount < 0.0 {
                warnings.push(format!("expense `{}/{}` has a negative amount", category, name));
            }
        }
    }
    for (name, amount) in &snapshot.incomes {
        if *amount < 0.0 {
            warnings.push(format!("income `{}` has a negative amount", name));
        }
    }
    for (name, amount) in &snapshot.bills {
        if *amount < 0.0 {
            warnings.push(format!("bill `{}` has a negative amount", name));
        }
    }
    for (name, debt) in &snapshot.debts {
        if debt.monthly_payment < 0.0 {
            warnings.push(format!("debt `{}` has a negative monthly payment", name));
        }
    }
    for (name, goal) in &snapshot.financial_goals {
        if goal.target_amount <= 0.0 {
            warnings.push(format!("goal `{}` has no positive target", name));
        }
    }
    warnings
}
