//! Bills and debts: the fixed monthly outflows besides expenses.

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::{Action, Arity, CommandEntry};
use crate::core::validation::{parse_amount, parse_rate, require_name};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::group(
            "bill",
            "Record, remove, or list recurring monthly bills",
            vec![
                Action::new("add", "<name> <amount>", Arity::Exact(2), add_bill),
                Action::new("remove", "<name>", Arity::Exact(1), remove_bill).aliases(&["rm"]),
                Action::new("list", "", Arity::Exact(0), list_bills).aliases(&["ls"]),
            ],
        ),
        CommandEntry::group(
            "debt",
            "Record, remove, or list debts and their monthly payments",
            vec![
                Action::new(
                    "add",
                    "<name> <balance> <interest-rate> <monthly-payment>",
                    Arity::Exact(4),
                    add_debt,
                ),
                Action::new("remove", "<name>", Arity::Exact(1), remove_debt).aliases(&["rm"]),
                Action::new("list", "", Arity::Exact(0), list_debts).aliases(&["ls"]),
            ],
        ),
    ]
}

fn add_bill(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_name(args[0])?;
    let amount = parse_amount(args[1])?;
    context.ledger.add_bill(name.as_str(), amount);
    context.mark_dirty();
    output::success(format!(
        "Bill `{}` set to {}.",
        name,
        context.format_amount(amount)
    ));
    Ok(())
}

fn remove_bill(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let removed = context.ledger.remove_bill(args[0])?;
    context.mark_dirty();
    output::success(format!(
        "Removed bill `{}` ({}).",
        args[0],
        context.format_amount(removed)
    ));
    Ok(())
}

fn list_bills(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.ledger();
    if ledger.bills().is_empty() {
        output::info("No bills recorded.");
        return Ok(());
    }
    output::section("Bills");
    for (name, amount) in ledger.bills() {
        output::info(format!("  {:<24} {}", name, context.format_amount(*amount)));
    }
    output::info(format!(
        "  {:<24} {}",
        "Total",
        context.format_amount(ledger.total_bills())
    ));
    Ok(())
}

fn add_debt(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_name(args[0])?;
    let balance = parse_amount(args[1])?;
    let rate = parse_rate(args[2])?;
    let payment = parse_amount(args[3])?;
    context.ledger.add_debt(name.as_str(), balance, rate, payment);
    context.mark_dirty();
    output::success(format!(
        "Debt `{}` recorded with a monthly payment of {}.",
        name,
        context.format_amount(payment)
    ));
    Ok(())
}

fn remove_debt(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.ledger.remove_debt(args[0])?;
    context.mark_dirty();
    output::success(format!("Removed debt `{}`.", args[0]));
    Ok(())
}

fn list_debts(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.ledger();
    if ledger.debts().is_empty() {
        output::info("No debts recorded.");
        return Ok(());
    }
    output::section("Debts");
    for (name, debt) in ledger.debts() {
        output::info(format!(
            "  {:<20} balance {} at {:.2}%, paying {}/month",
            name,
            context.format_amount(debt.amount),
            debt.interest_rate * 100.0,
            context.format_amount(debt.monthly_payment)
        ));
    }
    output::info(format!(
        "  {:<20} {}",
        "Monthly payments",
        context.format_amount(ledger.total_debt_payments())
    ));
    Ok(())
}
