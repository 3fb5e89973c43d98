//! Parsing of user-supplied text into the typed values the ledger accepts.
//!
//! The ledger trusts its arguments; every caller-facing surface goes through
//! these helpers first so malformed input is rejected before any mutation.

use crate::errors::{BudgetError, Result};

/// Parses a non-negative monetary amount. A leading `$` and `,` separators are accepted.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let value: f64 = cleaned
        .parse()
        .map_err(|_| BudgetError::validation(format!("`{}` is not a valid amount", raw.trim())))?;
    if !value.is_finite() {
        return Err(BudgetError::validation(format!(
            "`{}` is not a finite amount",
            raw.trim()
        )));
    }
    if value < 0.0 {
        return Err(BudgetError::validation(format!(
            "amount must not be negative (got {})",
            raw.trim()
        )));
    }
    Ok(value)
}

/// Parses a rate given either as a fraction (`0.05`) or a percentage (`5%`).
pub fn parse_rate(raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    let (number, is_percent) = match trimmed.strip_suffix('%') {
        Some(stripped) => (stripped.trim(), true),
        None => (trimmed, false),
    };
    let value: f64 = number
        .parse()
        .map_err(|_| BudgetError::validation(format!("`{}` is not a valid rate", trimmed)))?;
    if !value.is_finite() || value < 0.0 {
        return Err(BudgetError::validation(format!(
            "rate must be a non-negative number (got {})",
            trimmed
        )));
    }
    Ok(if is_percent { value / 100.0 } else { value })
}

/// Oldest age accepted from user input.
pub const MAX_AGE: u32 = 150;

/// Parses a whole-year age between 0 and [`MAX_AGE`].
pub fn parse_age(raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    let age = trimmed
        .parse::<u32>()
        .map_err(|_| BudgetError::validation(format!("`{}` is not a valid age", trimmed)))?;
    if age > MAX_AGE {
        return Err(BudgetError::validation(format!(
            "age must be at most {} (got {})",
            MAX_AGE, trimmed
        )));
    }
    Ok(age)
}

/// Trims a record name and rejects blanks.
pub fn require_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(BudgetError::validation("name must not be empty"));
    }
    Ok(name.to_string())
}
