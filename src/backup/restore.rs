//! Backup restoration
//!
//! Restoring replaces the whole preference store with the archived one. The
//! archive is checked first so a damaged file never overwrites good data.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::config::paths::BudgetPaths;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetPlan, Category, DebtRecord, Expense, Income, Task};
use crate::storage::file_io::write_json_atomic;
use crate::storage::StoreKey;

use super::manager::{BackupArchive, ARCHIVE_SCHEMA_VERSION};

/// Handles restoring from backups
pub struct RestoreManager {
    paths: BudgetPaths,
}

impl RestoreManager {
    pub fn new(paths: BudgetPaths) -> Self {
        Self { paths }
    }

    /// Restore data from a backup file
    ///
    /// This overwrites all current data with the backup contents.
    pub fn restore_from_file(&self, backup_path: &Path) -> BudgetResult<RestoreResult> {
        let archive = read_archive(backup_path)?;
        self.restore_from_archive(&archive)
    }

    /// Restore data from a parsed archive
    pub fn restore_from_archive(&self, archive: &BackupArchive) -> BudgetResult<RestoreResult> {
        let validation = validate_archive(archive);
        if let Some(problem) = validation.problems.first() {
            return Err(BudgetError::Backup(format!(
                "Refusing to restore a damaged backup: {}",
                problem
            )));
        }

        self.paths.ensure_directories()?;
        write_json_atomic(self.paths.preferences_file(), &archive.preferences)?;
        info!(backup_date = %archive.created_at, "preference store restored");

        Ok(RestoreResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            counts: validation.counts,
        })
    }

    /// Validate a backup file without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> BudgetResult<ValidationResult> {
        Ok(validate_archive(&read_archive(backup_path)?))
    }
}

fn read_archive(backup_path: &Path) -> BudgetResult<BackupArchive> {
    let contents = fs::read_to_string(backup_path)
        .map_err(|e| BudgetError::Io(format!("Failed to read backup file: {}", e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| BudgetError::Json(format!("Failed to parse backup file: {}", e)))
}

/// Check every collection in the archive parses as its record type
fn validate_archive(archive: &BackupArchive) -> ValidationResult {
    let mut problems = Vec::new();
    let mut counts = Vec::new();

    if archive.schema_version > ARCHIVE_SCHEMA_VERSION {
        problems.push(format!(
            "schema version {} is newer than supported version {}",
            archive.schema_version, ARCHIVE_SCHEMA_VERSION
        ));
    }

    match archive.preferences.as_object() {
        None => problems.push("preferences is not a JSON object".to_string()),
        Some(map) => {
            for key in StoreKey::ALL {
                let Some(value) = map.get(key.as_str()) else {
                    continue;
                };
                match check_collection(key, value) {
                    Ok(count) => counts.push((key, count)),
                    Err(e) => problems.push(format!("{}: {}", key, e)),
                }
            }
        }
    }

    ValidationResult {
        schema_version: archive.schema_version,
        backup_date: archive.created_at,
        counts,
        problems,
    }
}

fn check_collection(key: StoreKey, value: &serde_json::Value) -> Result<usize, serde_json::Error> {
    fn count<T: DeserializeOwned>(value: &serde_json::Value) -> Result<usize, serde_json::Error> {
        serde_json::from_value::<Vec<T>>(value.clone()).map(|records| records.len())
    }

    match key {
        StoreKey::Expenses => count::<Expense>(value),
        StoreKey::Incomes => count::<Income>(value),
        StoreKey::Loans | StoreKey::Borrowed => count::<DebtRecord>(value),
        StoreKey::Tasks => count::<Task>(value),
        StoreKey::Plans => count::<BudgetPlan>(value),
        StoreKey::Categories => count::<Category>(value),
    }
}

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreResult {
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    /// Records restored per collection present in the backup
    pub counts: Vec<(StoreKey, usize)>,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        if self.counts.is_empty() {
            return "Restored an empty store".to_string();
        }
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|(key, count)| format!("{} {}", count, key))
            .collect();
        format!("Restored: {}", parts.join(", "))
    }
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    pub counts: Vec<(StoreKey, usize)>,
    pub problems: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    /// Whether every collection key is present
    pub fn is_complete(&self) -> bool {
        self.counts.len() == StoreKey::ALL.len()
    }

    pub fn summary(&self) -> String {
        if !self.is_valid() {
            return format!("Invalid backup (v{}): {}", self.schema_version, self.problems.join("; "));
        }

        let missing: Vec<&str> = StoreKey::ALL
            .iter()
            .filter(|k| !self.counts.iter().any(|(key, _)| key == *k))
            .map(|k| k.as_str())
            .collect();

        if missing.is_empty() {
            format!("Complete backup (v{})", self.schema_version)
        } else {
            format!(
                "Partial backup (v{}): missing {}",
                self.schema_version,
                missing.join(", ")
            )
        }
    }
}
