use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::{Action, Arity, CommandEntry};
use crate::core::validation::{parse_amount, require_name};
use crate::ledger::SUGGESTED_CATEGORIES;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::group(
        "expense",
        "Record, remove, or list categorized monthly expenses",
        vec![
            Action::new("add", "<category> <name> <amount>", Arity::Exact(3), add_expense),
            Action::new("remove", "<category> <name>", Arity::Exact(2), remove_expense)
                .aliases(&["rm"]),
            Action::new("list", "", Arity::Exact(0), list_expenses).aliases(&["ls"]),
            Action::new("categories", "", Arity::Exact(0), list_categories),
        ],
    )]
}

fn add_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let category = require_name(args[0])?;
    let name = require_name(args[1])?;
    let amount = parse_amount(args[2])?;
    if !SUGGESTED_CATEGORIES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(&category))
        && !context.ledger.expenses().contains_key(&category)
    {
        output::hint(format!("Created new category `{}`.", category));
    }
    context
        .ledger
        .add_expense(name.as_str(), amount, category.as_str());
    context.mark_dirty();
    output::success(format!(
        "Expense `{}/{}` set to {}.",
        category,
        name,
        context.format_amount(amount)
    ));
    Ok(())
}

fn remove_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let removed = context.ledger.remove_expense(args[0], args[1])?;
    context.mark_dirty();
    output::success(format!(
        "Removed expense `{}/{}` ({}).",
        args[0],
        args[1],
        context.format_amount(removed)
    ));
    Ok(())
}

fn list_expenses(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.ledger();
    if ledger.expenses().is_empty() {
        output::info("No expenses recorded.");
        return Ok(());
    }
    output::section("Expenses");
    for (category, entries) in ledger.expenses() {
        output::info(format!(
            "  {} ({})",
            category,
            context.format_amount(ledger.category_total(category))
        ));
        for (name, amount) in entries {
            output::info(format!("    {:<22} {}", name, context.format_amount(*amount)));
        }
    }
    output::info(format!(
        "  {:<24} {}",
        "Total",
        context.format_amount(ledger.total_expenses())
    ));
    Ok(())
}

fn list_categories(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Suggested categories");
    for category in SUGGESTED_CATEGORIES {
        output::info(format!("  {}", category));
    }
    output::info("Any other name creates a new category.");
    Ok(())
}
