use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::{Action, Arity, CommandEntry};
use crate::core::validation::{parse_age, parse_amount, parse_rate, require_name};
use crate::projection::ProjectionPolicy;

const KEYS: &str = "currency, precision, snapshot, retention, color, projection, default-age, default-income";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::group(
        "config",
        "Show or change stored preferences",
        vec![
            Action::new("show", "", Arity::Exact(0), show_config),
            Action::new("set", "<key> <value>", Arity::Exact(2), set_config),
        ],
    )
    .when_bare(show_config)]
}

fn set_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    set_config_value(context, &args[0].to_lowercase(), args[1])?;
    context.persist_config()?;
    output::success(format!("Updated `{}`.", args[0]));
    Ok(())
}

fn show_config(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let config = &context.config;
    output::section("Configuration");
    output::info(format!("  currency        {}", config.currency));
    output::info(format!("  precision       {}", config.currency_precision));
    output::info(format!("  snapshot        {}", config.snapshot_name));
    output::info(format!("  retention       {}", config.backup_retention));
    output::info(format!("  color           {}", config.color_output));
    output::info(format!("  projection      {}", config.projection));
    output::info(format!("  default-age     {}", config.default_age));
    output::info(format!(
        "  default-income  {}",
        config.format_amount(config.default_annual_income)
    ));
    output::info(format!("  file            {}", context.config_manager.path().display()));
    Ok(())
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let config = &mut context.config;
    match key {
        "currency" => config.currency = require_name(value)?.to_uppercase(),
        "precision" => {
            config.currency_precision = value.parse::<usize>().ok().filter(|p| *p <= 6).ok_or_else(|| {
                CommandError::InvalidArguments("precision must be between 0 and 6".into())
            })?;
        }
        "snapshot" => {
            config.snapshot_name = require_name(value)?;
            output::hint("The new snapshot name applies from the next start; use `load` to switch now.");
        }
        "retention" => {
            config.backup_retention = value.parse::<usize>().ok().filter(|n| *n > 0).ok_or_else(|| {
                CommandError::InvalidArguments("retention must be a positive integer".into())
            })?;
            output::hint("The new retention applies from the next start.");
        }
        "color" => {
            config.color_output = match value.to_lowercase().as_str() {
                "on" | "true" | "yes" => true,
                "off" | "false" | "no" => false,
                _ => {
                    return Err(CommandError::InvalidArguments(
                        "color must be `on` or `off`".into(),
                    ))
                }
            };
            output::set_color_enabled(config.color_output);
        }
        "projection" => {
            config.projection = if value.eq_ignore_ascii_case("per-investment") {
                ProjectionPolicy::PerInvestment
            } else {
                ProjectionPolicy::Flat {
                    rate: parse_rate(value)?,
                }
            };
        }
        "default-age" => config.default_age = parse_age(value)?,
        "default-income" => config.default_annual_income = parse_amount(value)?,
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown key `{}`; expected one of: {}",
                key, KEYS
            )))
        }
    }
    Ok(())
}
