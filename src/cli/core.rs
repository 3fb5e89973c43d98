//! Dispatch, error reporting, and snapshot plumbing shared by the shell modes.

use std::{io, path::PathBuf};

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::ConfigManager,
    core::utils::app_data_dir,
    errors::BudgetError,
    ledger::Ledger,
    storage::{JsonSnapshotStorage, LoadReport, SnapshotStorage},
};

use super::commands;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    pub(crate) fn usage(usage: &str) -> Self {
        CommandError::InvalidArguments(format!("usage: {}", usage))
    }
}

/// Errors that end the shell itself rather than a single command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            other => CliError::Command(other.to_string()),
        }
    }
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, app_data_dir())
    }

    /// Builds a shell rooted at `base` and loads the configured snapshot if present.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        output::set_color_enabled(config.color_output);
        let storage = JsonSnapshotStorage::from_base(&base, config.backup_retention)?;
        let ledger = Ledger::new(config.default_age, config.default_annual_income);
        let snapshot_name = config.snapshot_name.clone();

        let mut context = ShellContext {
            mode,
            registry,
            ledger,
            storage,
            config_manager,
            config,
            base_dir: base,
            snapshot_name,
            theme: ColorfulTheme::default(),
            dirty: false,
            running: true,
        };
        context.startup_load();
        Ok(context)
    }

    /// A missing snapshot is a normal first run. An unreadable one is reported and left on disk.
    fn startup_load(&mut self) {
        let name = self.snapshot_name.clone();
        match self.storage.load(&name) {
            Ok(report) => {
                self.apply_load(report);
                output::info(format!("Loaded snapshot `{}`.", name));
            }
            Err(err) if err.is_missing_snapshot() => {
                output::info(format!(
                    "No saved snapshot `{}` yet; starting with an empty ledger.",
                    name
                ));
            }
            Err(err) => {
                output::error(format!("Could not load snapshot `{}`: {}", name, err));
                output::hint(
                    "Starting empty. The unreadable file is kept and will be backed up before any save.",
                );
            }
        }
    }

    pub(crate) fn apply_load(&mut self, report: LoadReport) {
        for note in &report.migrations {
            output::info(format!("Migration: {}", note));
        }
        for warning in &report.warnings {
            output::warning(warning);
        }
        if report.needs_resave() {
            output::hint("Run `save` to store the snapshot in the current format.");
        }
        self.ledger = report.ledger;
        self.ledger.calculate_monthly_savings();
        self.dirty = false;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(entry) = self.registry.get(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        let (handler, args) = entry.resolve(args)?;
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match shell_words::split(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(format!("Could not parse `{}`: {}", line.trim(), err));
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let raw = &tokens[0];
        let command = raw.to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

        match self.dispatch(&command, raw, &args) {
            Ok(LoopControl::Exit) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            other => other,
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    /// Script mode never prompts. Interactive mode asks only when there are unsaved changes.
    pub(crate) fn confirm_exit(&self) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script || !self.dirty {
            return Ok(true);
        }
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt("Discard unsaved changes and exit?")
            .default(false)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }
}

#[cfg(test)]
pub(crate) fn process_script(base: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut context = ShellContext::with_base_dir(CliMode::Script, base)?;
    for line in lines {
        match context.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn quoted_arguments_keep_their_spaces() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path().to_path_buf(),
            &["expense add Food \"Farmers market\" 45", "expense add Food \"unclosed 1"],
        )
        .unwrap();
        assert_eq!(context.ledger().expenses()["Food"]["Farmers market"], 45.0);
        assert_eq!(context.ledger().expenses()["Food"].len(), 1);
    }

    #[test]
    fn action_aliases_reach_the_ledger() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path().to_path_buf(),
            &["bill add Rent 900", "bill add Water 40", "BILL RM Water", "bill ls"],
        )
        .unwrap();
        assert_eq!(context.ledger().bills().len(), 1);
        assert!(context.ledger().bills().contains_key("Rent"));
    }

    #[test]
    fn script_records_entries() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path().to_path_buf(),
            &[
                "profile income 60000",
                "income add Salary 5000",
                "expense add Food Groceries 300",
                "bill add Rent 1200",
                "debt add CarLoan 10000 5% 250",
                "exit",
            ],
        )
        .unwrap();
        assert!(context.dirty);
        assert!(!context.running);
        assert_eq!(context.ledger().monthly_savings(), 3_250.0);
    }

    #[test]
    fn failed_commands_do_not_stop_the_script() {
        let dir = tempdir().unwrap();
        let context = process_script(
            dir.path().to_path_buf(),
            &["income add Salary lots", "incme add Salary 1", "income add Salary 10"],
        )
        .unwrap();
        assert_eq!(context.ledger().incomes()["Salary"], 10.0);
        assert!(context.running);
    }

    #[test]
    fn saved_snapshot_is_loaded_on_next_start() {
        let dir = tempdir().unwrap();
        let base = dir.path().to_path_buf();
        process_script(base.clone(), &["bill add Rent 900", "save"]).unwrap();
        let context = process_script(base, &[]).unwrap();
        assert_eq!(context.ledger().bills()["Rent"], 900.0);
        assert!(!context.dirty);
    }

    #[test]
    fn corrupt_snapshot_is_left_untouched_at_startup() {
        let dir = tempdir().unwrap();
        let base = dir.path().to_path_buf();
        let path = crate::core::utils::snapshots_dir_in(&base).join("budget_data.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ broken").unwrap();

        let context = process_script(base, &[]).unwrap();
        assert!(context.ledger().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ broken");
    }

    #[test]
    fn failed_save_keeps_the_current_snapshot_name() {
        let dir = tempdir().unwrap();
        let base = dir.path().to_path_buf();
        // A directory where the snapshot file should be makes the write fail.
        let blocked = crate::core::utils::snapshots_dir_in(&base).join("blocked.json");
        fs::create_dir_all(&blocked).unwrap();

        let mut context = process_script(base, &["income add Salary 10"]).unwrap();
        let err = context.process_line("save blocked").unwrap_err();
        context.report_error(err);
        assert_eq!(context.snapshot_name, "budget_data");
        assert!(context.dirty);

        context.process_line("save").unwrap();
        assert!(!context.dirty);
    }
}
