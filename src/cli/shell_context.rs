use std::{collections::BTreeMap, path::PathBuf};

use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    ledger::Ledger,
    storage::JsonSnapshotStorage,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Mutable state shared by every command handler.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub ledger: Ledger,
    pub storage: JsonSnapshotStorage,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub base_dir: PathBuf,
    pub snapshot_name: String,
    pub theme: ColorfulTheme,
    /// Set by mutating commands, cleared by save and load.
    pub dirty: bool,
    pub running: bool,
}

impl ShellContext {
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn prompt(&self) -> String {
        let marker = if self.dirty { "*" } else { "" };
        format!("budget({}{})> ", self.snapshot_name, marker)
    }

    pub fn completion_table(&self) -> BTreeMap<String, Vec<String>> {
        self.registry.completion_table()
    }

    pub fn format_amount(&self, amount: f64) -> String {
        self.config.format_amount(amount)
    }
}
