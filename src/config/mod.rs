//! User preferences persisted next to the ledger snapshots.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    core::utils::{app_data_dir, config_file_in, ensure_dir, replace_file},
    errors::{PersistenceError, Result},
    projection::ProjectionPolicy,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency: String,
    pub currency_precision: usize,
    pub snapshot_name: String,
    pub default_age: u32,
    pub default_annual_income: f64,
    pub projection: ProjectionPolicy,
    pub backup_retention: usize,
    pub color_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            currency_precision: 2,
            snapshot_name: "budget_data".into(),
            default_age: 0,
            default_annual_income: 0.0,
            projection: ProjectionPolicy::default(),
            backup_retention: 5,
            color_output: true,
        }
    }
}

impl Config {
    /// Renders `amount` with the configured currency code and precision.
    pub fn format_amount(&self, amount: f64) -> String {
        format!(
            "{:.*} {}",
            self.currency_precision, amount, self.currency
        )
    }
}

/// Loads and stores [`Config`] as pretty JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        let path = config_file_in(&base);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored config, falling back to defaults when none exists yet.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| {
                PersistenceError::InvalidConfig {
                    path: self.path.clone(),
                    reason: err.to_string(),
                }
                .into()
            })
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        replace_file(&self.path, &json)?;
        info!(path = %self.path.display(), "saved configuration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_config_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
        assert!(manager.path().ends_with("config/config.json"));
    }

    #[test]
    fn saved_config_round_trips() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            currency: "EUR".into(),
            projection: ProjectionPolicy::PerInvestment,
            backup_retention: 2,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"currency": "GBP"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency, "GBP");
        assert_eq!(config.snapshot_name, "budget_data");
        assert_eq!(config.projection, ProjectionPolicy::default());
    }

    #[test]
    fn amounts_use_configured_precision() {
        let config = Config {
            currency_precision: 1,
            ..Config::default()
        };
        assert_eq!(config.format_amount(12.345), "12.3 USD");
    }

    #[test]
    fn corrupt_config_error_names_the_file() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "{ \"currency\": ").unwrap();
        let err = manager.load().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config.json"), "{}", message);
        assert!(matches!(
            err,
            crate::errors::BudgetError::Persistence(PersistenceError::InvalidConfig { .. })
        ));
    }
}
