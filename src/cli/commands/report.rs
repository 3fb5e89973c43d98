//! Profile, savings, and summary reporting.

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::{Action, Arity, CommandEntry};
use crate::core::services::SummaryService;
use crate::core::validation::{parse_age, parse_amount};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::group(
            "profile",
            "Show or update age and annual income",
            vec![
                Action::new("age", "<years>", Arity::Exact(1), set_age),
                Action::new("income", "<annual-amount>", Arity::Exact(1), set_income),
            ],
        )
        .when_bare(show_profile),
        CommandEntry::new(
            "savings",
            "Calculate monthly savings after expenses, bills, and debt payments",
            "savings",
            cmd_savings,
        ),
        CommandEntry::new(
            "summary",
            "Show totals per collection and per expense category",
            "summary",
            cmd_summary,
        ),
    ]
}

fn show_profile(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let profile = context.ledger.profile();
    output::section("Profile");
    output::info(format!("  Age            {}", profile.age));
    output::info(format!(
        "  Annual income  {}",
        context.format_amount(profile.annual_income)
    ));
    output::info(format!(
        "  Monthly income {}",
        context.format_amount(profile.monthly_income())
    ));
    Ok(())
}

fn set_age(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let age = parse_age(args[0])?;
    context.ledger.set_age(age);
    context.mark_dirty();
    output::success(format!("Age set to {}.", age));
    Ok(())
}

fn set_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let annual = parse_amount(args[0])?;
    context.ledger.set_annual_income(annual);
    context.mark_dirty();
    output::success(format!(
        "Annual income set to {} ({} a month).",
        context.format_amount(annual),
        context.format_amount(context.ledger.monthly_income())
    ));
    Ok(())
}

fn cmd_savings(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let savings = context.ledger.calculate_monthly_savings();
    if savings < 0.0 {
        output::warning(format!(
            "Monthly savings: {} (spending exceeds income)",
            context.format_amount(savings)
        ));
    } else {
        output::success(format!("Monthly savings: {}", context.format_amount(savings)));
    }
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let summary = SummaryService::current_totals(context.ledger());
    output::section("Budget summary");
    let rows = [
        ("Income sources", summary.total_income),
        ("Monthly income", summary.monthly_income),
        ("Expenses", summary.total_expenses),
        ("Bills", summary.total_bills),
        ("Debt payments", summary.total_debt_payments),
        ("Monthly savings", summary.savings),
    ];
    for (label, amount) in rows {
        output::info(format!("  {:<18} {}", label, context.format_amount(amount)));
    }
    if !summary.categories.is_empty() {
        output::section("Expenses by category");
        for category in &summary.categories {
            output::info(format!(
                "  {:<18} {} ({} entries)",
                category.category,
                context.format_amount(category.total),
                category.entries
            ));
        }
    }
    if summary.is_overspending() {
        output::warning("Outflow exceeds monthly income.");
    }
    Ok(())
}
