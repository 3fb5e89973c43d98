use serde::Serialize;

use crate::ledger::Ledger;

/// Spending attributed to one expense category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub entries: usize,
}

/// Monthly totals shown alongside the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    /// Sum of every recorded income source.
    pub total_income: f64,
    /// Annual income / 12; this is the figure savings are computed from.
    pub monthly_income: f64,
    pub total_expenses: f64,
    pub total_bills: f64,
    pub total_debt_payments: f64,
    pub savings: f64,
    pub categories: Vec<CategoryTotal>,
}

impl BudgetSummary {
    pub fn total_outflow(&self) -> f64 {
        self.total_expenses + self.total_bills + self.total_debt_payments
    }

    pub fn is_overspending(&self) -> bool {
        self.savings < 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub remaining: f64,
    pub percent: Option<f64>,
}

pub struct SummaryService;

impl SummaryService {
    pub fn current_totals(ledger: &Ledger) -> BudgetSummary {
        let categories = ledger
            .expenses()
            .iter()
            .map(|(category, entries)| CategoryTotal {
                category: category.clone(),
                total: entries.values().sum(),
                entries: entries.len(),
            })
            .collect();
        BudgetSummary {
            total_income: ledger.total_income(),
            monthly_income: ledger.monthly_income(),
            total_expenses: ledger.total_expenses(),
            total_bills: ledger.total_bills(),
            total_debt_payments: ledger.total_debt_payments(),
            savings: ledger.monthly_savings(),
            categories,
        }
    }

    pub fn goal_progress(ledger: &Ledger) -> Vec<GoalProgress> {
        ledger
            .financial_goals()
            .iter()
            .map(|(name, goal)| GoalProgress {
                name: name.clone(),
                target_amount: goal.target_amount,
                current_amount: goal.current_amount,
                remaining: goal.remaining(),
                percent: goal.progress_percent(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with_spending() -> Ledger {
        let mut ledger = Ledger::new(30, 48_000.0);
        ledger.add_income("Salary", 3_500.0);
        ledger.add_income("Freelance", 600.0);
        ledger.add_expense("Groceries", 400.0, "Food");
        ledger.add_expense("Dining", 150.0, "Food");
        ledger.add_expense("Bus pass", 90.0, "Transportation");
        ledger.add_bill("Internet", 60.0);
        ledger.add_debt("Card", 2_000.0, 0.2, 100.0);
        ledger
    }

    #[test]
    fn current_totals_break_down_spending() {
        let summary = SummaryService::current_totals(&ledger_with_spending());
        assert_eq!(summary.total_income, 4_100.0);
        assert_eq!(summary.monthly_income, 4_000.0);
        assert_eq!(summary.total_expenses, 640.0);
        assert_eq!(summary.total_outflow(), 800.0);
        assert_eq!(summary.savings, 3_200.0);
        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.categories[0].category, "Food");
        assert_eq!(summary.categories[0].total, 550.0);
        assert_eq!(summary.categories[0].entries, 2);
    }

    #[test]
    fn summary_does_not_touch_cached_savings() {
        let ledger = ledger_with_spending();
        let _ = SummaryService::current_totals(&ledger);
        assert_eq!(ledger.cached_savings(), 0.0);
    }

    #[test]
    fn goal_progress_reports_each_goal() {
        let mut ledger = Ledger::default();
        ledger.add_goal("Emergency", 1_000.0);
        ledger.contribute_to_goal("Emergency", 250.0).unwrap();
        let progress = SummaryService::goal_progress(&ledger);
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].percent, Some(25.0));
        assert_eq!(progress[0].remaining, 750.0);
    }
}
