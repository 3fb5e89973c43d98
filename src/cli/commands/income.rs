use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::{Action, Arity, CommandEntry};
use crate::core::validation::{parse_amount, require_name};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::group(
        "income",
        "Record, remove, or list monthly income sources",
        vec![
            Action::new("add", "<name> <amount>", Arity::Exact(2), add_income),
            Action::new("remove", "<name>", Arity::Exact(1), remove_income).aliases(&["rm"]),
            Action::new("list", "", Arity::Exact(0), list_incomes).aliases(&["ls"]),
        ],
    )]
}

fn add_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_name(args[0])?;
    let amount = parse_amount(args[1])?;
    context.ledger.add_income(name.as_str(), amount);
    context.mark_dirty();
    output::success(format!(
        "Income `{}` set to {}.",
        name,
        context.format_amount(amount)
    ));
    Ok(())
}

fn remove_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let removed = context.ledger.remove_income(args[0])?;
    context.mark_dirty();
    output::success(format!(
        "Removed income `{}` ({}).",
        args[0],
        context.format_amount(removed)
    ));
    Ok(())
}

fn list_incomes(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.ledger();
    if ledger.incomes().is_empty() {
        output::info("No income sources recorded.");
        return Ok(());
    }
    output::section("Income");
    for (name, amount) in ledger.incomes() {
        output::info(format!("  {:<24} {}", name, context.format_amount(*amount)));
    }
    output::info(format!(
        "  {:<24} {}",
        "Total",
        context.format_amount(ledger.total_income())
    ));
    Ok(())
}
