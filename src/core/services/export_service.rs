//! CSV export of income sources and categorized expenses.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{core::utils::ensure_dir, errors::Result, ledger::Ledger};

pub const INCOME_EXPORT_FILE: &str = "income_data.csv";
pub const EXPENSE_EXPORT_FILE: &str = "expense_data.csv";

/// Files written by [`ExportService::export_to_dir`].
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub incomes: PathBuf,
    pub expenses: PathBuf,
}

pub struct ExportService;

impl ExportService {
    pub fn write_incomes<W: Write>(ledger: &Ledger, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["Income Source", "Amount"])?;
        for (name, amount) in ledger.incomes() {
            let amount = amount.to_string();
            wtr.write_record([name.as_str(), amount.as_str()])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_expenses<W: Write>(ledger: &Ledger, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["Category", "Name", "Amount"])?;
        for (category, entries) in ledger.expenses() {
            for (name, amount) in entries {
                let amount = amount.to_string();
                wtr.write_record([category.as_str(), name.as_str(), amount.as_str()])?;
            }
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn export_to_dir(ledger: &Ledger, dir: &Path) -> Result<ExportPaths> {
        ensure_dir(dir)?;
        let paths = ExportPaths {
            incomes: dir.join(INCOME_EXPORT_FILE),
            expenses: dir.join(EXPENSE_EXPORT_FILE),
        };
        Self::write_incomes(ledger, std::fs::File::create(&paths.incomes)?)?;
        Self::write_expenses(ledger, std::fs::File::create(&paths.expenses)?)?;
        info!(dir = %dir.display(), "exported ledger to CSV");
        Ok(paths)
    }
}
