//! Persistence commands: snapshots, backups, and CSV export.

use std::path::PathBuf;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::{Action, Arity, CommandEntry};
use crate::core::{services::ExportService, utils::exports_dir_in};
use crate::storage::SnapshotStorage;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "save",
            "Save the ledger to the current or a named snapshot",
            "save [name]",
            cmd_save,
        ),
        CommandEntry::new(
            "load",
            "Replace the ledger with the current or a named snapshot",
            "load [name]",
            cmd_load,
        ),
        CommandEntry::group(
            "backup",
            "Create, list, or restore snapshot backups",
            vec![
                Action::new("create", "[note]", Arity::Any, create_backup),
                Action::new("list", "", Arity::Exact(0), list_backups).aliases(&["ls"]),
                Action::new("restore", "<backup-id>", Arity::Exact(1), restore_backup),
            ],
        ),
        CommandEntry::new(
            "export",
            "Write incomes and expenses as CSV files",
            "export [directory]",
            cmd_export,
        ),
    ]
}

fn select_snapshot(context: &mut ShellContext, args: &[&str], usage: &str) -> CommandResult {
    match args {
        [] => Ok(()),
        [name] => {
            context.snapshot_name = name.trim().to_string();
            Ok(())
        }
        _ => Err(CommandError::usage(usage)),
    }
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let previous = context.snapshot_name.clone();
    select_snapshot(context, args, "save [name]")?;
    let path = match context.storage.save(&context.ledger, &context.snapshot_name) {
        Ok(path) => path,
        Err(err) => {
            context.snapshot_name = previous;
            return Err(err.into());
        }
    };
    context.dirty = false;
    output::success(format!(
        "Saved snapshot `{}` to {}.",
        context.snapshot_name,
        path.display()
    ));
    Ok(())
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let previous = context.snapshot_name.clone();
    select_snapshot(context, args, "load [name]")?;
    match context.storage.load(&context.snapshot_name) {
        Ok(report) => {
            context.apply_load(report);
            output::success(format!("Loaded snapshot `{}`.", context.snapshot_name));
            Ok(())
        }
        Err(err) => {
            context.snapshot_name = previous;
            Err(err.into())
        }
    }
}

fn create_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let info = context
        .storage
        .backup(&context.ledger, &context.snapshot_name, note.as_deref())?;
    output::success(format!("Created backup `{}`.", info.id));
    Ok(())
}

fn list_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let name = &context.snapshot_name;
    let backups = context.storage.list_backups(name)?;
    if backups.is_empty() {
        output::info(format!("No backups for snapshot `{}`.", name));
        return Ok(());
    }
    output::section(format!("Backups of `{}`", name));
    for backup in backups {
        output::info(format!(
            "  {}  {}",
            backup.created_at.format("%Y-%m-%d %H:%M:%S"),
            backup.id
        ));
    }
    Ok(())
}

fn restore_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = context.snapshot_name.clone();
    let report = context.storage.restore(&name, args[0])?;
    context.apply_load(report);
    output::success(format!("Restored `{}` from backup `{}`.", name, args[0]));
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let dir = match args {
        [] => exports_dir_in(&context.base_dir),
        [dir] => PathBuf::from(*dir),
        _ => return Err(CommandError::usage("export [directory]")),
    };
    let paths = ExportService::export_to_dir(context.ledger(), &dir)?;
    output::success(format!(
        "Exported {} and {}.",
        paths.incomes.display(),
        paths.expenses.display()
    ));
    Ok(())
}
