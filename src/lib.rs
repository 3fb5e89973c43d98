#![doc(test(attr(deny(warnings))))]

//! Budget Manager keeps a personal ledger of incomes, categorized expenses,
//! bills, debts, investments, and savings goals, derives monthly savings, and
//! projects invested principal to a retirement age.
//!
//! ```
//! use budget_manager::ledger::Ledger;
//!
//! let mut ledger = Ledger::new(35, 60_000.0);
//! ledger.add_expense("Groceries", 300.0, "Food");
//! ledger.add_bill("Rent", 1_200.0);
//! assert_eq!(ledger.calculate_monthly_savings(), 3_500.0);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod errors;
pub mod ledger;
pub mod projection;
pub mod storage;
pub mod utils;

pub use errors::{BudgetError, PersistenceError, RecordKind, Result};
pub use ledger::Ledger;

/// Initializes global tracing. Later calls do nothing.
pub fn init() {
    utils::init_tracing();
}
