//! Ledger records and the aggregate that owns them.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod records;

pub use ledger::{AmountMap, ExpenseMap, Ledger};
pub use records::{Debt, FinancialGoal, Investment, Profile};
pub use crate::projection::RetirementEstimate;

/// Categories offered to users when recording an expense. Free text is also accepted.
pub const SUGGESTED_CATEGORIES: &[&str] = &[
    "Housing",
    "Food",
    "Transportation",
    "Utilities",
    "Entertainment",
    "Healthcare",
    "Others",
];
