//! Backup system for the home budget
//!
//! Provides rolling snapshots of the preference store with a retention
//! policy, and restore.
//!
//! # Backup Format
//!
//! Backups are JSON files named `backup-YYYYMMDD-HHMMSS-mmm.json` holding:
//! - `schema_version`: version for migration support
//! - `created_at`: when the backup was taken
//! - `preferences`: the whole preference store, one entry per collection
//!
//! # Retention Policy
//!
//! By default the system keeps 30 daily backups and 12 monthly backups
//! (the earliest backup of each month).

mod manager;
mod restore;

pub use manager::{BackupArchive, BackupInfo, BackupManager, ARCHIVE_SCHEMA_VERSION};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
