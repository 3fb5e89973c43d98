//! Year-by-year growth projections over invested principal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ledger::Investment;

/// Growth applied by the default retirement projection.
pub const DEFAULT_GROWTH_RATE: f64 = 0.05;

/// Longest horizon any projection runs for; longer requests are cut to it.
pub const MAX_PROJECTION_YEARS: u32 = 150;

/// How investments grow between now and the projection horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ProjectionPolicy {
    /// One rate applied to the combined principal, ignoring per-investment rates.
    Flat { rate: f64 },
    /// Each investment compounds at its own recorded rate.
    PerInvestment,
}

impl Default for ProjectionPolicy {
    fn default() -> Self {
        ProjectionPolicy::Flat {
            rate: DEFAULT_GROWTH_RATE,
        }
    }
}

impl fmt::Display for ProjectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionPolicy::Flat { rate } => write!(f, "flat {:.2}%", rate * 100.0),
            ProjectionPolicy::PerInvestment => f.write_str("per-investment"),
        }
    }
}

/// Outcome of a retirement estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetirementEstimate {
    /// The owner is already at or past the requested age; there is nothing to project.
    AlreadyReached { age: u32, desired_age: u32 },
    Projected { years: u32, amount: f64 },
}

impl RetirementEstimate {
    pub fn amount(&self) -> Option<f64> {
        match self {
            RetirementEstimate::Projected { amount, .. } => Some(*amount),
            RetirementEstimate::AlreadyReached { .. } => None,
        }
    }

    pub fn is_already_reached(&self) -> bool {
        matches!(self, RetirementEstimate::AlreadyReached { .. })
    }
}

/// Balance at the end of a projected year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectionYear {
    pub year: u32,
    pub balance: f64,
}

/// Applies `rate` once per year for `years` years, at most [`MAX_PROJECTION_YEARS`].
pub fn compound(principal: f64, rate: f64, years: u32) -> f64 {
    let mut balance = principal;
    for _ in 0..years.min(MAX_PROJECTION_YEARS) {
        balance += balance * rate;
    }
    balance
}

/// Projects the combined value of `investments` after `years` years.
pub fn project<'a, I>(investments: I, policy: ProjectionPolicy, years: u32) -> f64
where
    I: IntoIterator<Item = &'a Investment>,
{
    match policy {
        ProjectionPolicy::Flat { rate } => {
            let principal: f64 = investments.into_iter().map(|inv| inv.amount).sum();
            compound(principal, rate, years)
        }
        ProjectionPolicy::PerInvestment => investments
            .into_iter()
            .map(|inv| compound(inv.amount, inv.rate, years))
            .sum(),
    }
}

/// Returns the year-end balance for each year up to `years`, starting at year 1.
/// The horizon is capped at [`MAX_PROJECTION_YEARS`].
pub fn schedule<'a, I>(investments: I, policy: ProjectionPolicy, years: u32) -> Vec<ProjectionYear>
where
    I: IntoIterator<Item = &'a Investment>,
{
    let holdings: Vec<Investment> = investments.into_iter().copied().collect();
    let mut balances: Vec<f64> = match policy {
        ProjectionPolicy::Flat { .. } => vec![holdings.iter().map(|inv| inv.amount).sum()],
        ProjectionPolicy::PerInvestment => holdings.iter().map(|inv| inv.amount).collect(),
    };
    let years = years.min(MAX_PROJECTION_YEARS);
    let mut rows = Vec::with_capacity(years as usize);
    for year in 1..=years {
        match policy {
            ProjectionPolicy::Flat { rate } => {
                for balance in balances.iter_mut() {
                    *balance += *balance * rate;
                }
            }
            ProjectionPolicy::PerInvestment => {
                for (balance, inv) in balances.iter_mut().zip(&holdings) {
                    *balance += *balance * inv.rate;
                }
            }
        }
        rows.push(ProjectionYear {
            year,
            balance: balances.iter().sum(),
        });
    }
    rows
}
