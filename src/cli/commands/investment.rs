use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::{Action, Arity, CommandEntry};
use crate::core::validation::{parse_age, parse_amount, parse_rate, require_name};
use crate::projection::{ProjectionPolicy, RetirementEstimate};

const RETIRE_USAGE: &str = "retire <age> [flat [rate] | per-investment] [--schedule]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::group(
            "investment",
            "Record, remove, or list investments",
            vec![
                Action::new("add", "<name> <amount> <annual-rate>", Arity::Exact(3), add_investment),
                Action::new("remove", "<name>", Arity::Exact(1), remove_investment)
                    .aliases(&["rm"]),
                Action::new("list", "", Arity::Exact(0), list_investments).aliases(&["ls"]),
            ],
        ),
        CommandEntry::new(
            "retire",
            "Project invested principal to a retirement age",
            RETIRE_USAGE,
            cmd_retire,
        ),
    ]
}

fn add_investment(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_name(args[0])?;
    let amount = parse_amount(args[1])?;
    let rate = parse_rate(args[2])?;
    context.ledger.add_investment(name.as_str(), amount, rate);
    context.mark_dirty();
    output::success(format!(
        "Investment `{}` recorded: {} at {:.2}% a year.",
        name,
        context.format_amount(amount),
        rate * 100.0
    ));
    Ok(())
}

fn remove_investment(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.ledger.remove_investment(args[0])?;
    context.mark_dirty();
    output::success(format!("Removed investment `{}`.", args[0]));
    Ok(())
}

fn list_investments(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.ledger();
    if ledger.investments().is_empty() {
        output::info("No investments recorded.");
        return Ok(());
    }
    output::section("Investments");
    for (name, investment) in ledger.investments() {
        output::info(format!(
            "  {:<24} {} at {:.2}%",
            name,
            context.format_amount(investment.amount),
            investment.rate * 100.0
        ));
    }
    output::info(format!(
        "  {:<24} {}",
        "Principal",
        context.format_amount(ledger.investment_principal())
    ));
    Ok(())
}

fn cmd_retire(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let show_schedule = args.iter().any(|arg| *arg == "--schedule");
    let args: Vec<&str> = args
        .iter()
        .copied()
        .filter(|arg| *arg != "--schedule")
        .collect();
    let Some((age, policy_args)) = args.split_first() else {
        return Err(CommandError::usage(RETIRE_USAGE));
    };
    let desired_age = parse_age(age)?;
    let policy = parse_policy(policy_args, context.config.projection)?;

    match context.ledger.estimate_retirement_with(desired_age, policy) {
        RetirementEstimate::AlreadyReached { age, desired_age } => {
            output::warning(format!(
                "Already at or past age {} (current age {}); nothing to project.",
                desired_age, age
            ));
        }
        RetirementEstimate::Projected { years, amount } => {
            output::success(format!(
                "Estimated investments at age {}: {} after {} years ({}).",
                desired_age,
                context.format_amount(amount),
                years,
                policy
            ));
            if show_schedule {
                output::section("Projection");
                for row in context.ledger.projection_schedule(desired_age, policy) {
                    output::info(format!(
                        "  year {:>3}  {}",
                        row.year,
                        context.format_amount(row.balance)
                    ));
                }
            }
        }
    }
    Ok(())
}

fn parse_policy(args: &[&str], default: ProjectionPolicy) -> Result<ProjectionPolicy, CommandError> {
    match args {
        [] => Ok(default),
        [mode] if mode.eq_ignore_ascii_case("per-investment") => {
            Ok(ProjectionPolicy::PerInvestment)
        }
        [mode] if mode.eq_ignore_ascii_case("flat") => Ok(ProjectionPolicy::default()),
        [mode, rate] if mode.eq_ignore_ascii_case("flat") => Ok(ProjectionPolicy::Flat {
            rate: parse_rate(rate)?,
        }),
        _ => Err(CommandError::usage(RETIRE_USAGE)),
    }
}
