use std::{
    cmp::Reverse,
    fs,
    path::{Component, Path, PathBuf},
};

use chrono::{DateTime, Duration, NaiveDateTime, SubsecRound, Utc};
use tracing::{info, warn};

use super::{snapshot, BackupInfo, LoadReport, SnapshotStorage};
use crate::{
    core::utils::{backups_dir_in, ensure_dir, replace_file, snapshots_dir_in, write_file},
    errors::{BudgetError, PersistenceError, Result},
    ledger::Ledger,
};

const SNAPSHOT_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3f";
const DEFAULT_RETENTION: usize = 5;

/// Filesystem-backed JSON persistence for ledger snapshots and their backups.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStorage {
    snapshots_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonSnapshotStorage {
    pub fn new(snapshots_dir: PathBuf, backups_dir: PathBuf) -> Result<Self> {
        Self::with_retention(snapshots_dir, backups_dir, DEFAULT_RETENTION)
    }

    pub fn with_retention(
        snapshots_dir: PathBuf,
        backups_dir: PathBuf,
        retention: usize,
    ) -> Result<Self> {
        ensure_dir(&snapshots_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            snapshots_dir,
            backups_dir,
            retention: retention.max(1),
        })
    }

    /// Uses the standard `snapshots/` and `backups/` layout under `base`.
    pub fn from_base(base: &Path, retention: usize) -> Result<Self> {
        Self::with_retention(snapshots_dir_in(base), backups_dir_in(base), retention)
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    pub fn backup_path(&self, name: &str, backup_id: &str) -> PathBuf {
        self.backup_dir(name).join(backup_id)
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    /// Picks an unused backup file name newer than every existing backup.
    fn next_backup_slot(&self, name: &str, note: Option<&str>) -> (String, DateTime<Utc>, PathBuf) {
        let dir = self.backup_dir(name);
        let slug = canonical_name(name);
        let label = sanitize_backup_note(note);
        let mut created_at = Utc::now().trunc_subsecs(3);
        let latest = self
            .list_backups(name)
            .ok()
            .and_then(|entries| entries.first().map(|entry| entry.created_at));
        if let Some(latest) = latest {
            if created_at <= latest {
                created_at = latest + Duration::milliseconds(1);
            }
        }
        loop {
            let mut stem = format!("{}_{}", slug, created_at.format(BACKUP_TIMESTAMP_FORMAT));
            if let Some(label) = &label {
                stem.push('_');
                stem.push_str(label);
            }
            let id = format!("{}.{}", stem, SNAPSHOT_EXTENSION);
            let path = dir.join(&id);
            if !path.exists() {
                return (id, created_at, path);
            }
            created_at += Duration::milliseconds(1);
        }
    }

    fn write_backup_file(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<BackupInfo> {
        ensure_dir(&self.backup_dir(name))?;
        let (id, created_at, path) = self.next_backup_slot(name, note);
        write_file(&path, &snapshot::encode(ledger)?)?;
        self.prune_backups(name)?;
        info!(snapshot = name, backup = %id, "created snapshot backup");
        Ok(BackupInfo {
            snapshot: canonical_name(name),
            id,
            created_at,
            path,
        })
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        ensure_dir(&self.backup_dir(name))?;
        let (id, _, backup_path) = self.next_backup_slot(name, None);
        fs::copy(path, &backup_path)?;
        self.prune_backups(name)?;
        info!(snapshot = name, backup = %id, "backed up previous snapshot");
        Ok(())
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let entries = self.list_backups(name)?;
        for entry in entries.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!(backup = %entry.id, error = %err, "failed to prune old backup");
            }
        }
        Ok(())
    }
}

impl SnapshotStorage for JsonSnapshotStorage {
    fn snapshot_path(&self, name: &str) -> PathBuf {
        self.snapshots_dir
            .join(format!("{}.{}", canonical_name(name), SNAPSHOT_EXTENSION))
    }

    fn save(&self, ledger: &Ledger, name: &str) -> Result<PathBuf> {
        let path = self.snapshot_path(name);
        self.backup_existing_file(name, &path)?;
        save_ledger_to_path(ledger, &path)?;
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<LoadReport> {
        load_ledger_from_path(&self.snapshot_path(name))
    }

    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<BackupInfo> {
        self.write_backup_file(ledger, name, note)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<BackupInfo>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let slug = canonical_name(name);
        let mut entries = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SNAPSHOT_EXTENSION) {
                continue;
            }
            let Some(id) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(created_at) = parse_backup_timestamp(&slug, id) else {
                continue;
            };
            entries.push(BackupInfo {
                snapshot: slug.clone(),
                id: id.to_string(),
                created_at,
                path: path.clone(),
            });
        }
        entries.sort_by_key(|info| Reverse(info.created_at));
        Ok(entries)
    }

    fn restore(&self, name: &str, backup_id: &str) -> Result<LoadReport> {
        if !is_plain_file_name(backup_id) {
            return Err(BudgetError::validation(format!(
                "backup id `{}` must be a file name from `backup list`",
                backup_id
            )));
        }
        let backup_path = self.backup_path(name, backup_id);
        if !backup_path.exists() {
            return Err(PersistenceError::BackupNotFound(backup_id.to_string()).into());
        }
        // Decode first so a corrupt backup never replaces the live snapshot.
        let data = fs::read_to_string(&backup_path)?;
        let decoded = snapshot::decode(&backup_path, &data)?;
        let target = self.snapshot_path(name);
        self.backup_existing_file(name, &target)?;
        replace_file(&target, &data)?;
        info!(snapshot = name, backup = backup_id, "restored snapshot from backup");
        Ok(LoadReport {
            ledger: decoded.ledger,
            path: target,
            migrations: decoded.migrations,
            warnings: decoded.warnings,
        })
    }
}

/// Writes `ledger` to `path` by staging into a sibling temporary file.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    let json = snapshot::encode(ledger)?;
    replace_file(path, &json)?;
    info!(path = %path.display(), "saved ledger snapshot");
    Ok(())
}

/// Loads a snapshot, reporting a missing file separately from an unreadable one.
pub fn load_ledger_from_path(path: &Path) -> Result<LoadReport> {
    if !path.exists() {
        return Err(PersistenceError::Missing(path.to_path_buf()).into());
    }
    let data = fs::read_to_string(path)?;
    let decoded = snapshot::decode(path, &data)?;
    for migration in &decoded.migrations {
        warn!(path = %path.display(), %migration, "migrated snapshot");
    }
    for warning in &decoded.warnings {
        warn!(path = %path.display(), %warning, "snapshot warning");
    }
    info!(path = %path.display(), "loaded ledger snapshot");
    Ok(LoadReport {
        ledger: decoded.ledger,
        path: path.to_path_buf(),
        migrations: decoded.migrations,
        warnings: decoded.warnings,
    })
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "budget_data".into()
    } else {
        sanitized
    }
}

fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    if raw.is_empty() {
        return None;
    }
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Extracts the timestamp from `<slug>_<timestamp>[_<note>].json`.
fn parse_backup_timestamp(slug: &str, id: &str) -> Option<DateTime<Utc>> {
    let stem = id.strip_suffix(&format!(".{}", SNAPSHOT_EXTENSION))?;
    let rest = stem.strip_prefix(slug)?.strip_prefix('_')?;
    let raw = rest.split('_').next()?;
    NaiveDateTime::parse_from_str(raw, BACKUP_TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// True when `id` names a single entry, with no separators or parent steps.
fn is_plain_file_name(id: &str) -> bool {
    let mut components = Path::new(id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(part)), None) if part == id
    ) && !id.contains(['/', '\\'])
}
