//! Backup manager for the home budget
//!
//! Handles rolling snapshots of the preference store with a retention
//! policy. Each backup is a dated JSON archive holding the whole store.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::paths::BudgetPaths;
use crate::config::settings::BackupRetention;
use crate::error::{BudgetError, BudgetResult};
use crate::storage::file_io::write_json_atomic;
use crate::storage::StoreKey;

/// Current archive layout version
pub const ARCHIVE_SCHEMA_VERSION: u32 = 1;

/// Metadata about a backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// Earliest backup of its calendar month, kept under the monthly quota
    pub is_monthly: bool,
}

/// Backup archive format
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupArchive {
    /// Schema version for migration support
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    /// The whole preference store: one entry per collection key
    pub preferences: serde_json::Value,
}

impl BackupArchive {
    /// Number of records stored under a key, 0 if absent
    pub fn record_count(&self, key: StoreKey) -> usize {
        self.preferences
            .get(key.as_str())
            .and_then(|v| v.as_array())
            .map_or(0, Vec::len)
    }
}

/// Manages backup creation and retention
pub struct BackupManager {
    backup_dir: PathBuf,
    paths: BudgetPaths,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: BudgetPaths, retention: BackupRetention) -> Self {
        let backup_dir = paths.backup_dir();
        Self {
            backup_dir,
            paths,
            retention,
        }
    }

    /// Create a backup of the preference store
    ///
    /// Returns the path to the created backup file.
    pub fn create_backup(&self) -> BudgetResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to create backup directory: {}", e)))?;

        let now = Utc::now();
        let filename = format!(
            "backup-{}-{:03}.json",
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = self.backup_dir.join(&filename);

        let archive = BackupArchive {
            schema_version: ARCHIVE_SCHEMA_VERSION,
            created_at: now,
            preferences: read_json_value(&self.paths.preferences_file())?,
        };
        write_json_atomic(&backup_path, &archive)
            .map_err(|e| BudgetError::Backup(format!("Failed to write {}: {}", filename, e)))?;

        info!(file = %filename, "backup created");
        Ok(backup_path)
    }

    /// List all available backups, newest first
    pub fn list_backups(&self) -> BudgetResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| BudgetError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry =
                entry.map_err(|e| BudgetError::Io(format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(info) = parse_backup_info(&path) {
                    backups.push(info);
                }
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        // The oldest backup in each month stands in for that month
        let mut seen_months = HashSet::new();
        for backup in backups.iter_mut().rev() {
            let month = (backup.created_at.year(), backup.created_at.month());
            backup.is_monthly = seen_months.insert(month);
        }

        Ok(backups)
    }

    /// Enforce the retention policy by deleting old backups
    ///
    /// The newest backup is never deleted.
    pub fn enforce_retention(&self) -> BudgetResult<Vec<PathBuf>> {
        let backups = self.list_backups()?;
        let newest = backups.first().map(|b| b.path.clone());

        let (monthly, daily): (Vec<_>, Vec<_>) = backups.into_iter().partition(|b| b.is_monthly);

        let expired = daily
            .into_iter()
            .skip(self.retention.daily_count as usize)
            .chain(monthly.into_iter().skip(self.retention.monthly_count as usize))
            .filter(|b| Some(&b.path) != newest.as_ref());

        let mut deleted = Vec::new();
        for backup in expired {
            fs::remove_file(&backup.path)
                .map_err(|e| BudgetError::Io(format!("Failed to delete old backup: {}", e)))?;
            debug!(file = %backup.filename, "expired backup removed");
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// Create a backup and then enforce the retention policy
    pub fn create_backup_with_retention(&self) -> BudgetResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Get a specific backup by filename
    pub fn get_backup(&self, filename: &str) -> BudgetResult<Option<BackupInfo>> {
        Ok(self
            .list_backups()?
            .into_iter()
            .find(|b| b.filename == filename))
    }

    pub fn get_latest_backup(&self) -> BudgetResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

/// Read a JSON file as a generic Value, an empty object if the file is missing
fn read_json_value(path: &Path) -> BudgetResult<serde_json::Value> {
    if !path.exists() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| BudgetError::Io(format!("Failed to read file for backup: {}", e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| BudgetError::Json(format!("Failed to parse JSON for backup: {}", e)))
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let date_part = filename.strip_prefix("backup-")?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(date_part)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
        is_monthly: false,
    })
}

/// Parse `YYYYMMDD-HHMMSS` or `YYYYMMDD-HHMMSS-mmm`
fn parse_backup_timestamp(date_str: &str) -> Option<DateTime<Utc>> {
    let parts: Vec<&str> = date_str.split('-').collect();
    let (date_part, time_part, millis) = match parts.as_slice() {
        [date, time] => (*date, *time, 0),
        [date, time, millis] => (*date, *time, millis.parse().ok()?),
        _ => return None,
    };

    if date_part.len() != 8 || time_part.len() != 6 {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(
        date_part.get(0..4)?.parse().ok()?,
        date_part.get(4..6)?.parse().ok()?,
        date_part.get(6..8)?.parse().ok()?,
    )?;
    let time = chrono::NaiveTime::from_hms_milli_opt(
        time_part.get(0..2)?.parse().ok()?,
        time_part.get(2..4)?.parse().ok()?,
        time_part.get(4..6)?.parse().ok()?,
        millis,
    )?;

    Some(DateTime::from_naive_utc_and_offset(
        chrono::NaiveDateTime::new(date, time),
        Utc,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PreferenceStore;
    use tempfile::TempDir;

    fn create_test_manager(daily_count: u32, monthly_count: u32) -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let retention = BackupRetention {
            daily_count,
            monthly_count,
        };
        (BackupManager::new(paths, retention), temp_dir)
    }

    fn touch_backup(manager: &BackupManager, stamp: &str) {
        fs::write(
            manager.backup_dir().join(format!("backup-{}.json", stamp)),
            r#"{"schema_version":1,"created_at":"2025-01-01T00:00:00Z","preferences":{}}"#,
        )
        .unwrap();
    }

    #[test]
    fn test_create_backup_snapshots_store() {
        let (manager, temp) = create_test_manager(30, 12);
        let store = PreferenceStore::open(temp.path().join("data").join("preferences.json")).unwrap();
        store.put("tasks", &vec![serde_json::json!({"title": "x"})]).unwrap();

        let backup_path = manager.create_backup().unwrap();
        let archive: BackupArchive =
            serde_json::from_str(&fs::read_to_string(&backup_path).unwrap()).unwrap();

        assert_eq!(archive.schema_version, ARCHIVE_SCHEMA_VERSION);
        assert_eq!(archive.record_count(StoreKey::Tasks), 1);
        assert_eq!(archive.record_count(StoreKey::Expenses), 0);
    }

    #[test]
    fn test_list_marks_first_of_month() {
        let (manager, _temp) = create_test_manager(30, 12);
        touch_backup(&manager, "20250105-100000-000");
        touch_backup(&manager, "20250120-100000-000");
        touch_backup(&manager, "20250203-100000-000");

        let backups = manager.list_backups().unwrap();
        let flags: Vec<(&str, bool)> = backups
            .iter()
            .map(|b| (b.filename.as_str(), b.is_monthly))
            .collect();
        assert_eq!(
            flags,
            vec![
                ("backup-20250203-100000-000.json", true),
                ("backup-20250120-100000-000.json", false),
                ("backup-20250105-100000-000.json", true),
            ]
        );
    }

    #[test]
    fn test_retention_policy() {
        let (manager, _temp) = create_test_manager(2, 1);
        touch_backup(&manager, "20250101-100000-000");
        touch_backup(&manager, "20250201-100000-000");
        for day in 2..=5 {
            touch_backup(&manager, &format!("202502{:02}-100000-000", day));
        }

        let deleted = manager.enforce_retention().unwrap();
        // Daily: keep 5th and 4th, drop 3rd and 2nd. Monthly: keep Feb 1, drop Jan 1
        assert_eq!(deleted.len(), 3);

        let remaining: Vec<String> = manager
            .list_backups()
            .unwrap()
            .into_iter()
            .map(|b| b.filename)
            .collect();
        assert_eq!(
            remaining,
            vec![
                "backup-20250205-100000-000.json",
                "backup-20250204-100000-000.json",
                "backup-20250201-100000-000.json",
            ]
        );
    }

    #[test]
    fn test_newest_backup_survives_zero_retention() {
        let (manager, _temp) = create_test_manager(0, 0);
        let (path, _) = manager.create_backup_with_retention().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_get_latest_backup() {
        let (manager, _temp) = create_test_manager(30, 12);
        assert!(manager.get_latest_backup().unwrap().is_none());

        let path = manager.create_backup().unwrap();
        let latest = manager.get_latest_backup().unwrap().unwrap();
        assert_eq!(latest.path, path);
        assert!(manager.get_backup(&latest.filename).unwrap().is_some());
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let timestamp = parse_backup_timestamp("20251127-143022").unwrap();
        assert_eq!((timestamp.year(), timestamp.month(), timestamp.day()), (2025, 11, 27));

        assert!(parse_backup_timestamp("20251127-143022-456").is_some());
        assert!(parse_backup_timestamp("2025-11-27").is_none());
        assert!(parse_backup_timestamp("garbage").is_none());
    }
}
