mod common;

use budget_manager::{
    errors::{BudgetError, RecordKind},
    ledger::{Ledger, RetirementEstimate},
    storage::{load_ledger_from_path, save_ledger_to_path},
};
use common::{sample_ledger, test_base_dir};

const TOLERANCE: f64 = 1e-6;

#[test]
fn stored_totals_reflect_the_last_amount_per_key() {
    let mut ledger = Ledger::default();
    ledger.add_income("Salary", 1_000.0);
    ledger.add_income("Salary", 1_000.0);
    ledger.add_income("Bonus", 50.0);
    ledger.add_income("Bonus", 75.0);
    ledger.add_expense("Groceries", 200.0, "Food");
    ledger.add_expense("Groceries", 260.0, "Food");
    ledger.add_expense("Fuel", 90.0, "Transportation");

    assert_eq!(ledger.incomes().len(), 2);
    assert_eq!(ledger.incomes()["Salary"], 1_000.0);
    assert_eq!(ledger.total_income(), 1_075.0);
    assert_eq!(ledger.total_expenses(), 350.0);
}

#[test]
fn emptied_categories_disappear() {
    let mut ledger = Ledger::default();
    ledger.add_expense("Groceries", 300.0, "Food");
    ledger.add_expense("Fuel", 90.0, "Transportation");
    ledger.remove_expense("Food", "Groceries").unwrap();
    assert!(!ledger.expenses().contains_key("Food"));
    assert!(ledger.expenses().contains_key("Transportation"));
}

#[test]
fn failed_removal_leaves_state_untouched() {
    let mut ledger = Ledger::default();
    ledger.add_expense("Groceries", 300.0, "Food");
    let before = ledger.expenses().clone();

    let err = ledger.remove_expense("Food", "Dining").unwrap_err();
    assert!(matches!(
        err,
        BudgetError::NotFound {
            kind: RecordKind::Expense,
            ..
        }
    ));
    let err = ledger.remove_expense("Housing", "Rent").unwrap_err();
    assert!(matches!(
        err,
        BudgetError::NotFound {
            kind: RecordKind::ExpenseCategory,
            ..
        }
    ));
    assert_eq!(ledger.expenses(), &before);
}

#[test]
fn empty_ledger_saves_its_whole_monthly_income() {
    let mut ledger = Ledger::new(30, 60_000.0);
    assert!((ledger.calculate_monthly_savings() - 5_000.0).abs() < TOLERANCE);
}

#[test]
fn savings_subtract_expenses_bills_and_debt_payments() {
    let mut ledger = Ledger::new(35, 60_000.0);
    ledger.add_expense("Groceries", 300.0, "Food");
    ledger.add_bill("Rent", 1_200.0);
    ledger.add_debt("CarLoan", 10_000.0, 0.05, 250.0);
    assert!((ledger.calculate_monthly_savings() - 3_250.0).abs() < TOLERANCE);
    assert!((ledger.cached_savings() - 3_250.0).abs() < TOLERANCE);
}

#[test]
fn retirement_compounds_five_percent_per_year() {
    let mut ledger = Ledger::new(60, 0.0);
    ledger.add_investment("Index", 10_000.0, 0.09);
    let amount = ledger
        .estimate_retirement_amount(65)
        .amount()
        .expect("years remain");
    assert!((amount - 12_762.815_625).abs() < TOLERANCE);

    ledger.set_age(70);
    assert_eq!(
        ledger.estimate_retirement_amount(65),
        RetirementEstimate::AlreadyReached {
            age: 70,
            desired_age: 65
        }
    );
}

#[test]
fn contributing_to_unknown_goal_changes_nothing() {
    let mut ledger = Ledger::default();
    ledger.add_goal("Trip", 2_000.0);
    let before = ledger.financial_goals().clone();
    let err = ledger.contribute_to_goal("Car", 100.0).unwrap_err();
    assert_eq!(err.to_string(), "Goal not found: Car");
    assert_eq!(ledger.financial_goals(), &before);
}

fn assert_round_trip(ledger: &Ledger, file: &str) {
    let path = test_base_dir().join(file);
    save_ledger_to_path(ledger, &path).unwrap();

    let report = load_ledger_from_path(&path).unwrap();
    let loaded = report.ledger;
    assert!(report.migrations.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(loaded.profile(), ledger.profile());
    assert_eq!(loaded.incomes(), ledger.incomes());
    assert_eq!(loaded.expenses(), ledger.expenses());
    assert_eq!(loaded.bills(), ledger.bills());
    assert_eq!(loaded.investments(), ledger.investments());
    assert_eq!(loaded.debts(), ledger.debts());
    assert_eq!(loaded.financial_goals(), ledger.financial_goals());
}

#[test]
fn save_then_load_reproduces_every_record() {
    assert_round_trip(&sample_ledger(), "roundtrip.json");
}

#[test]
fn single_collection_ledgers_survive_a_round_trip() {
    let mut goals_only = Ledger::new(29, 0.0);
    goals_only.add_goal("Trip", 2_000.0);
    goals_only.contribute_to_goal("Trip", 125.5).unwrap();
    assert_round_trip(&goals_only, "goals_only.json");

    let mut debts_only = Ledger::new(51, 0.0);
    debts_only.add_debt("Mortgage", 180_000.0, 0.031, 950.0);
    assert_round_trip(&debts_only, "debts_only.json");

    let mut investments_only = Ledger::new(40, 0.0);
    investments_only.add_investment("Pension", 25_000.0, 0.04);
    assert_round_trip(&investments_only, "investments_only.json");

    assert_round_trip(&Ledger::default(), "empty.json");
}
