use std::collections::BTreeMap;

use tracing::debug;

use super::records::{Debt, FinancialGoal, Investment, Profile};
use crate::{
    errors::{BudgetError, RecordKind, Result},
    projection::{self, ProjectionPolicy, ProjectionYear, RetirementEstimate, MAX_PROJECTION_YEARS},
};

pub type AmountMap = BTreeMap<String, f64>;
pub type ExpenseMap = BTreeMap<String, AmountMap>;

/// In-memory store of every income, expense, bill, investment, debt, and goal.
///
/// All collections are keyed by name; adding an existing name overwrites the
/// previous entry. Savings are derived on demand and only cached for display.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    profile: Profile,
    incomes: AmountMap,
    expenses: ExpenseMap,
    bills: AmountMap,
    investments: BTreeMap<String, Investment>,
    debts: BTreeMap<String, Debt>,
    financial_goals: BTreeMap<String, FinancialGoal>,
    savings: f64,
}

impl Ledger {
    pub fn new(age: u32, annual_income: f64) -> Self {
        Self {
            profile: Profile::new(age, annual_income),
            ..Self::default()
        }
    }

    /// Rebuilds a ledger from stored collections, dropping empty expense categories.
    pub(crate) fn from_parts(
        profile: Profile,
        incomes: AmountMap,
        mut expenses: ExpenseMap,
        bills: AmountMap,
        investments: BTreeMap<String, Investment>,
        debts: BTreeMap<String, Debt>,
        financial_goals: BTreeMap<String, FinancialGoal>,
    ) -> Self {
        expenses.retain(|_, entries| !entries.is_empty());
        Self {
            profile,
            incomes,
            expenses,
            bills,
            investments,
            debts,
            financial_goals,
            savings: 0.0,
        }
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn age(&self) -> u32 {
        self.profile.age
    }

    pub fn annual_income(&self) -> f64 {
        self.profile.annual_income
    }

    pub fn monthly_income(&self) -> f64 {
        self.profile.monthly_income()
    }

    pub fn set_age(&mut self, age: u32) {
        debug!(age, "updating profile age");
        self.profile.age = age;
    }

    pub fn set_annual_income(&mut self, annual_income: f64) {
        debug!(annual_income, "updating profile income");
        self.profile.annual_income = annual_income;
    }

    pub fn incomes(&self) -> &AmountMap {
        &self.incomes
    }

    pub fn expenses(&self) -> &ExpenseMap {
        &self.expenses
    }

    pub fn bills(&self) -> &AmountMap {
        &self.bills
    }

    pub fn investments(&self) -> &BTreeMap<String, Investment> {
        &self.investments
    }

    pub fn debts(&self) -> &BTreeMap<String, Debt> {
        &self.debts
    }

    pub fn financial_goals(&self) -> &BTreeMap<String, FinancialGoal> {
        &self.financial_goals
    }

    pub fn goal(&self, name: &str) -> Option<&FinancialGoal> {
        self.financial_goals.get(name)
    }

    /// Value produced by the last call to [`Ledger::calculate_monthly_savings`].
    pub fn cached_savings(&self) -> f64 {
        self.savings
    }

    pub fn is_empty(&self) -> bool {
        self.incomes.is_empty()
            && self.expenses.is_empty()
            && self.bills.is_empty()
            && self.investments.is_empty()
            && self.debts.is_empty()
            && self.financial_goals.is_empty()
    }

    pub fn add_income(&mut self, name: impl Into<String>, amount: f64) {
        let name = name.into();
        debug!(%name, amount, "recording income");
        self.incomes.insert(name, amount);
    }

    pub fn remove_income(&mut self, name: &str) -> Result<f64> {
        let amount = self
            .incomes
            .remove(name)
            .ok_or_else(|| BudgetError::not_found(RecordKind::Income, name))?;
        debug!(%name, "removed income");
        Ok(amount)
    }

    pub fn add_expense(&mut self, name: impl Into<String>, amount: f64, category: impl Into<String>) {
        let name = name.into();
        let category = category.into();
        debug!(%name, %category, amount, "recording expense");
        self.expenses
            .entry(category)
            .or_default()
            .insert(name, amount);
    }

    /// Removes one expense, dropping its category once the category is empty.
    pub fn remove_expense(&mut self, category: &str, name: &str) -> Result<f64> {
        let entries = self
            .expenses
            .get_mut(category)
            .ok_or_else(|| BudgetError::not_found(RecordKind::ExpenseCategory, category))?;
        let amount = entries
            .remove(name)
            .ok_or_else(|| BudgetError::not_found(RecordKind::Expense, name))?;
        if entries.is_empty() {
            self.expenses.remove(category);
        }
        debug!(%category, %name, "removed expense");
        Ok(amount)
    }

    pub fn add_bill(&mut self, name: impl Into<String>, amount: f64) {
        let name = name.into();
        debug!(%name, amount, "recording bill");
        self.bills.insert(name, amount);
    }

    pub fn remove_bill(&mut self, name: &str) -> Result<f64> {
        let removed = self
            .bills
            .remove(name)
            .ok_or_else(|| BudgetError::not_found(RecordKind::Bill, name))?;
        debug!(%name, "removed bill");
        Ok(removed)
    }

    pub fn add_investment(&mut self, name: impl Into<String>, amount: f64, annual_return_rate: f64) {
        let name = name.into();
        debug!(%name, amount, annual_return_rate, "recording investment");
        self.investments
            .insert(name, Investment::new(amount, annual_return_rate));
    }

    pub fn remove_investment(&mut self, name: &str) -> Result<Investment> {
        let removed = self
            .investments
            .remove(name)
            .ok_or_else(|| BudgetError::not_found(RecordKind::Investment, name))?;
        debug!(%name, "removed investment");
        Ok(removed)
    }

    pub fn add_debt(
        &mut self,
        name: impl Into<String>,
        amount: f64,
        interest_rate: f64,
        monthly_payment: f64,
    ) {
        let name = name.into();
        debug!(%name, amount, interest_rate, monthly_payment, "recording debt");
        self.debts
            .insert(name, Debt::new(amount, interest_rate, monthly_payment));
    }

    pub fn remove_debt(&mut self, name: &str) -> Result<Debt> {
        let removed = self
            .debts
            .remove(name)
            .ok_or_else(|| BudgetError::not_found(RecordKind::Debt, name))?;
        debug!(%name, "removed debt");
        Ok(removed)
    }

    /// Creates or resets a goal; re-adding an existing goal clears its progress.
    pub fn add_goal(&mut self, name: impl Into<String>, target_amount: f64) {
        let name = name.into();
        debug!(%name, target_amount, "recording goal");
        self.financial_goals
            .insert(name, FinancialGoal::new(target_amount));
    }

    pub fn remove_goal(&mut self, name: &str) -> Result<FinancialGoal> {
        let removed = self
            .financial_goals
            .remove(name)
            .ok_or_else(|| BudgetError::not_found(RecordKind::Goal, name))?;
        debug!(%name, "removed goal");
        Ok(removed)
    }

    /// Adds to a goal's accumulated amount and returns the new total.
    pub fn contribute_to_goal(&mut self, name: &str, amount: f64) -> Result<f64> {
        let goal = self
            .financial_goals
            .get_mut(name)
            .ok_or_else(|| BudgetError::not_found(RecordKind::Goal, name))?;
        goal.current_amount += amount;
        debug!(%name, amount, total = goal.current_amount, "goal contribution");
        Ok(goal.current_amount)
    }

    pub fn total_income(&self) -> f64 {
        self.incomes.values().sum()
    }

    pub fn category_total(&self, category: &str) -> f64 {
        self.expenses
            .get(category)
            .map(|entries| entries.values().sum())
            .unwrap_or(0.0)
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses
            .values()
            .map(|entries| entries.values().sum::<f64>())
            .sum()
    }

    pub fn total_bills(&self) -> f64 {
        self.bills.values().sum()
    }

    /// Sum of required monthly payments; balances and interest are not included.
    pub fn total_debt_payments(&self) -> f64 {
        self.debts.values().map(|debt| debt.monthly_payment).sum()
    }

    pub fn investment_principal(&self) -> f64 {
        self.investments.values().map(|inv| inv.amount).sum()
    }

    /// Monthly savings without touching the cache.
    pub fn monthly_savings(&self) -> f64 {
        self.monthly_income()
            - (self.total_expenses() + self.total_bills() + self.total_debt_payments())
    }

    /// Recomputes monthly savings, refreshes the cached value, and returns it.
    pub fn calculate_monthly_savings(&mut self) -> f64 {
        self.savings = self.monthly_savings();
        self.savings
    }

    /// Projects invested principal to `desired_retirement_age` at a flat 5% a year.
    pub fn estimate_retirement_amount(&self, desired_retirement_age: u32) -> RetirementEstimate {
        self.estimate_retirement_with(desired_retirement_age, ProjectionPolicy::default())
    }

    /// Projects with `policy`. Horizons beyond [`MAX_PROJECTION_YEARS`] are cut to it.
    pub fn estimate_retirement_with(
        &self,
        desired_retirement_age: u32,
        policy: ProjectionPolicy,
    ) -> RetirementEstimate {
        let Some(years) = desired_retirement_age
            .checked_sub(self.profile.age)
            .filter(|y| *y > 0)
            .map(|y| y.min(MAX_PROJECTION_YEARS))
        else {
            return RetirementEstimate::AlreadyReached {
                age: self.profile.age,
                desired_age: desired_retirement_age,
            };
        };
        let amount = projection::project(self.investments.values(), policy, years);
        RetirementEstimate::Projected { years, amount }
    }

    /// Year-end balances up to `desired_retirement_age`; empty when no years remain.
    /// Horizons beyond [`MAX_PROJECTION_YEARS`] are cut to it.
    pub fn projection_schedule(
        &self,
        desired_retirement_age: u32,
        policy: ProjectionPolicy,
    ) -> Vec<ProjectionYear> {
        let years = desired_retirement_age.saturating_sub(self.profile.age);
        projection::schedule(self.investments.values(), policy, years)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io,
        sync::{Arc, Mutex},
    };

    const TOLERANCE: f64 = 1e-6;

    fn household() -> Ledger {
        let mut ledger = Ledger::new(35, 60_000.0);
        ledger.add_income("Salary", 5_000.0);
        ledger.add_expense("Groceries", 300.0, "Food");
        ledger.add_bill("Rent", 1_200.0);
        ledger.add_debt("CarLoan", 10_000.0, 0.05, 250.0);
        ledger
    }

    #[test]
    fn new_ledger_starts_empty() {
        let ledger = Ledger::default();
        assert!(ledger.is_empty());
        assert_eq!(ledger.age(), 0);
        assert_eq!(ledger.monthly_income(), 0.0);
        assert_eq!(ledger.cached_savings(), 0.0);
    }

    #[test]
    fn re_adding_income_overwrites() {
        let mut ledger = Ledger::default();
        ledger.add_income("Salary", 1_000.0);
        ledger.add_income("Salary", 1_000.0);
        assert_eq!(ledger.incomes().len(), 1);
        assert_eq!(ledger.incomes()["Salary"], 1_000.0);

        ledger.add_income("Salary", 1_500.0);
        assert_eq!(ledger.total_income(), 1_500.0);
    }

    #[test]
    fn remove_income_reports_missing_name() {
        let mut ledger = household();
        assert_eq!(ledger.remove_income("Salary").unwrap(), 5_000.0);
        let err = ledger.remove_income("Salary").unwrap_err();
        assert!(matches!(
            err,
            BudgetError::NotFound {
                kind: RecordKind::Income,
                ..
            }
        ));
    }

    #[test]
    fn removing_last_expense_drops_category() {
        let mut ledger = household();
        ledger.add_expense("Dining", 120.0, "Food");
        ledger.remove_expense("Food", "Groceries").unwrap();
        assert!(ledger.expenses().contains_key("Food"));
        ledger.remove_expense("Food", "Dining").unwrap();
        assert!(!ledger.expenses().contains_key("Food"));
    }

    #[test]
    fn remove_expense_with_unknown_name_leaves_category_intact() {
        let mut ledger = household();
        let err = ledger.remove_expense("Food", "Snacks").unwrap_err();
        assert!(matches!(
            err,
            BudgetError::NotFound {
                kind: RecordKind::Expense,
                ..
            }
        ));
        assert_eq!(ledger.expenses()["Food"]["Groceries"], 300.0);

        let err = ledger.remove_expense("Travel", "Groceries").unwrap_err();
        assert!(matches!(
            err,
            BudgetError::NotFound {
                kind: RecordKind::ExpenseCategory,
                ..
            }
        ));
    }

    #[test]
    fn savings_from_income_alone() {
        let mut ledger = Ledger::new(0, 60_000.0);
        assert_eq!(ledger.calculate_monthly_savings(), 5_000.0);
        assert_eq!(ledger.cached_savings(), 5_000.0);
    }

    #[test]
    fn savings_subtract_expenses_bills_and_debt_payments() {
        let mut ledger = household();
        let savings = ledger.calculate_monthly_savings();
        assert!((savings - 3_250.0).abs() < TOLERANCE);
    }

    #[test]
    fn savings_may_go_negative_and_cache_tracks_inputs() {
        let mut ledger = household();
        ledger.calculate_monthly_savings();
        ledger.add_bill("Mortgage", 5_000.0);
        assert!((ledger.cached_savings() - 3_250.0).abs() < TOLERANCE);
        let savings = ledger.calculate_monthly_savings();
        assert!((savings + 1_750.0).abs() < TOLERANCE);
        assert_eq!(ledger.cached_savings(), savings);
    }

    #[test]
    fn changing_annual_income_rederives_monthly_income() {
        let mut ledger = Ledger::new(40, 24_000.0);
        ledger.set_annual_income(36_000.0);
        assert_eq!(ledger.monthly_income(), 3_000.0);
    }

    #[test]
    fn contribute_to_unknown_goal_fails_without_side_effects() {
        let mut ledger = Ledger::default();
        ledger.add_goal("Vacation", 2_000.0);
        ledger.contribute_to_goal("Vacation", 150.0).unwrap();

        let err = ledger.contribute_to_goal("House", 500.0).unwrap_err();
        assert!(matches!(
            err,
            BudgetError::NotFound {
                kind: RecordKind::Goal,
                ..
            }
        ));
        assert_eq!(ledger.financial_goals().len(), 1);
        assert_eq!(ledger.goal("Vacation").unwrap().current_amount, 150.0);
    }

    #[test]
    fn contributions_accumulate_past_target() {
        let mut ledger = Ledger::default();
        ledger.add_goal("Laptop", 1_000.0);
        ledger.contribute_to_goal("Laptop", 600.0).unwrap();
        let total = ledger.contribute_to_goal("Laptop", 600.0).unwrap();
        assert_eq!(total, 1_200.0);
    }

    #[test]
    fn retirement_projection_compounds_yearly() {
        let mut ledger = Ledger::new(60, 0.0);
        ledger.add_investment("Index", 10_000.0, 0.07);
        let estimate = ledger.estimate_retirement_amount(65);
        let expected = 10_000.0 * 1.05_f64.powi(5);
        let amount = estimate.amount().expect("projected amount");
        assert!((amount - expected).abs() < 1e-6);
        assert!((amount - 12_762.815_625).abs() < 1e-6);
    }

    #[test]
    fn retirement_projection_flags_past_target_age() {
        let ledger = Ledger::new(70, 0.0);
        let estimate = ledger.estimate_retirement_amount(65);
        assert!(estimate.is_already_reached());
        assert_eq!(estimate.amount(), None);

        let ledger = Ledger::new(65, 0.0);
        assert!(ledger.estimate_retirement_amount(65).is_already_reached());
    }

    #[test]
    fn removal_covers_every_collection() {
        let mut ledger = household();
        ledger.add_investment("Bonds", 1_000.0, 0.03);
        ledger.add_goal("Trip", 800.0);
        ledger.remove_bill("Rent").unwrap();
        ledger.remove_debt("CarLoan").unwrap();
        ledger.remove_investment("Bonds").unwrap();
        ledger.remove_goal("Trip").unwrap();
        assert!(ledger.bills().is_empty());
        assert!(ledger.debts().is_empty());
        assert!(ledger.investments().is_empty());
        assert!(ledger.financial_goals().is_empty());
        assert!(ledger.remove_bill("Rent").is_err());
    }

    #[test]
    fn schedule_ends_at_the_retirement_estimate() {
        let mut ledger = Ledger::new(60, 0.0);
        ledger.add_investment("Index", 10_000.0, 0.07);
        let rows = ledger.projection_schedule(65, ProjectionPolicy::default());
        assert_eq!(rows.len(), 5);
        let estimate = ledger.estimate_retirement_amount(65).amount().unwrap();
        assert!((rows[4].balance - estimate).abs() < TOLERANCE);
        assert!(ledger.projection_schedule(50, ProjectionPolicy::default()).is_empty());
    }

    #[test]
    fn distant_retirement_ages_are_capped() {
        let mut ledger = Ledger::new(0, 0.0);
        ledger.add_investment("Index", 1.0, 0.0);
        let rows = ledger.projection_schedule(u32::MAX, ProjectionPolicy::default());
        assert_eq!(rows.len(), MAX_PROJECTION_YEARS as usize);
        assert_eq!(
            ledger.estimate_retirement_amount(u32::MAX),
            RetirementEstimate::Projected {
                years: MAX_PROJECTION_YEARS,
                amount: 1.0
            }
        );
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn every_removal_is_logged() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut ledger = household();
            ledger.add_investment("Index", 1_000.0, 0.05);
            ledger.add_goal("Trip", 500.0);
            ledger.remove_bill("Rent").unwrap();
            ledger.remove_investment("Index").unwrap();
            ledger.remove_debt("CarLoan").unwrap();
            ledger.remove_goal("Trip").unwrap();
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        for message in ["removed bill", "removed investment", "removed debt", "removed goal"] {
            assert!(output.contains(message), "missing `{}` in:\n{}", message, output);
        }
    }
}
