use serde::{Deserialize, Serialize};

/// Age and income settings for the ledger owner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub age: u32,
    pub annual_income: f64,
}

impl Profile {
    pub fn new(age: u32, annual_income: f64) -> Self {
        Self { age, annual_income }
    }

    /// Monthly income is always derived from the annual figure.
    pub fn monthly_income(&self) -> f64 {
        self.annual_income / 12.0
    }
}

/// A holding that contributes its principal to retirement projections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub amount: f64,
    /// Annual return as a fraction, `0.05` for 5%.
    pub rate: f64,
}

impl Investment {
    pub fn new(amount: f64, rate: f64) -> Self {
        Self { amount, rate }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub amount: f64,
    pub interest_rate: f64,
    pub monthly_payment: f64,
}

impl Debt {
    pub fn new(amount: f64, interest_rate: f64, monthly_payment: f64) -> Self {
        Self {
            amount,
            interest_rate,
            monthly_payment,
        }
    }
}

/// Savings target tracked through contributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialGoal {
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
}

impl FinancialGoal {
    pub fn new(target_amount: f64) -> Self {
        Self {
            target_amount,
            current_amount: 0.0,
        }
    }

    /// Percentage of the target reached so far. `None` when the target is zero.
    pub fn progress_percent(&self) -> Option<f64> {
        if self.target_amount.abs() < f64::EPSILON {
            None
        } else {
            Some((self.current_amount / self.target_amount) * 100.0)
        }
    }

    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    pub fn is_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monthly_income_is_a_twelfth_of_annual() {
        let profile = Profile::new(30, 60_000.0);
        assert_eq!(profile.monthly_income(), 5_000.0);
    }

    #[test]
    fn goal_progress_handles_zero_target() {
        let mut goal = FinancialGoal::new(0.0);
        goal.current_amount = 10.0;
        assert_eq!(goal.progress_percent(), None);
        assert!(goal.is_reached());
    }

    #[test]
    fn goal_progress_may_exceed_one_hundred_percent() {
        let goal = FinancialGoal {
            target_amount: 200.0,
            current_amount: 250.0,
        };
        assert_eq!(goal.progress_percent(), Some(125.0));
        assert_eq!(goal.remaining(), 0.0);
    }
}
