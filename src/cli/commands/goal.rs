use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::{Action, Arity, CommandEntry};
use crate::core::services::SummaryService;
use crate::core::validation::{parse_amount, require_name};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::group(
        "goal",
        "Track savings goals and contributions toward them",
        vec![
            Action::new("add", "<name> <target>", Arity::Exact(2), add_goal),
            Action::new("contribute", "<name> <amount>", Arity::Exact(2), contribute),
            Action::new("remove", "<name>", Arity::Exact(1), remove_goal).aliases(&["rm"]),
            Action::new("list", "", Arity::Exact(0), list_goals).aliases(&["ls"]),
        ],
    )]
}

fn add_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = require_name(args[0])?;
    let target = parse_amount(args[1])?;
    if context.ledger.goal(&name).is_some() {
        output::warning(format!("Goal `{}` replaced; its progress was reset.", name));
    }
    context.ledger.add_goal(name.as_str(), target);
    context.mark_dirty();
    output::success(format!(
        "Goal `{}` set with a target of {}.",
        name,
        context.format_amount(target)
    ));
    Ok(())
}

fn contribute(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let amount = parse_amount(args[1])?;
    let total = context.ledger.contribute_to_goal(args[0], amount)?;
    context.mark_dirty();
    output::success(format!(
        "Goal `{}` now at {}.",
        args[0],
        context.format_amount(total)
    ));
    if context.ledger.goal(args[0]).is_some_and(|goal| goal.is_reached()) {
        output::success(format!("Goal `{}` reached!", args[0]));
    }
    Ok(())
}

fn remove_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.ledger.remove_goal(args[0])?;
    context.mark_dirty();
    output::success(format!("Removed goal `{}`.", args[0]));
    Ok(())
}

fn list_goals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let progress = SummaryService::goal_progress(context.ledger());
    if progress.is_empty() {
        output::info("No financial goals recorded.");
        return Ok(());
    }
    output::section("Goals");
    for goal in progress {
        let percent = goal
            .percent
            .map(|value| format!("{:.1}%", value))
            .unwrap_or_else(|| "n/a".to_string());
        output::info(format!(
            "  {:<20} {} of {} ({}), {} to go",
            goal.name,
            context.format_amount(goal.current_amount),
            context.format_amount(goal.target_amount),
            percent,
            context.format_amount(goal.remaining)
        ));
    }
    Ok(())
}
