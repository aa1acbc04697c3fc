//! Backup CLI commands

use clap::Subcommand;
use std::path::PathBuf;

use crate::backup::{BackupManager, RestoreManager};
use crate::config::paths::BudgetPaths;
use crate::config::settings::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::storage::{Storage, StoreKey};

/// Backup subcommands
#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Snapshot the data store
    Create,

    /// List available backups, newest first
    List {
        /// Show created time, size and age on separate lines
        #[arg(short, long)]
        details: bool,
    },

    /// Replace all data with a backup
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Check a backup without restoring it
    Validate { backup: String },

    /// Delete old backups according to the retention policy
    Prune {
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BackupCommands,
) -> BudgetResult<()> {
    let paths = storage.paths();
    let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());

    match cmd {
        BackupCommands::Create => {
            let (backup_path, deleted) = manager.create_backup_with_retention()?;
            println!("Backup created: {}", file_label(&backup_path));
            println!("Location: {}", backup_path.display());
            if !deleted.is_empty() {
                println!("Removed {} expired backup(s).", deleted.len());
            }
        }

        BackupCommands::List { details } => {
            let backups = manager.list_backups()?;

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: hbudget backup create");
                return Ok(());
            }

            for (i, backup) in backups.iter().enumerate() {
                let age = chrono::Utc::now().signed_duration_since(backup.created_at);
                let monthly_marker = if backup.is_monthly { " [monthly]" } else { "" };

                if details {
                    println!(
                        "{}. {}{}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        i + 1,
                        backup.filename,
                        monthly_marker,
                        backup.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(backup.size_bytes),
                        format_duration(age),
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {}){}",
                        i + 1,
                        backup.filename,
                        format_duration(age),
                        format_size(backup.size_bytes),
                        monthly_marker,
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore { backup, force } => {
            let backup_path = resolve_backup_path(&manager, paths, &backup)?;
            let restore_manager = RestoreManager::new(paths.clone());
            let validation = restore_manager.validate_backup(&backup_path)?;

            println!("File: {}", backup_path.display());
            println!(
                "Created: {}",
                validation.backup_date.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!("Status: {}", validation.summary());
            println!();

            if !validation.is_valid() {
                return Err(BudgetError::Backup(
                    "Backup failed validation; nothing was restored".into(),
                ));
            }

            if !force {
                println!("WARNING: This will overwrite ALL current data!");
                println!("To proceed, run again with --force:");
                println!("  hbudget backup restore {} --force", backup);
                return Ok(());
            }

            let safety = manager.create_backup()?;
            println!("Current data saved to: {}", file_label(&safety));

            let result = restore_manager.restore_from_file(&backup_path)?;
            for key in StoreKey::ALL {
                storage.reload(key)?;
            }

            println!("Restore complete.");
            println!("{}", result.summary());
        }

        BackupCommands::Validate { backup } => {
            let backup_path = resolve_backup_path(&manager, paths, &backup)?;
            let validation = RestoreManager::new(paths.clone()).validate_backup(&backup_path)?;

            println!("File: {}", backup_path.display());
            println!("Schema version: {}", validation.schema_version);
            for (key, count) in &validation.counts {
                println!("  {:<12} {}", key.as_str(), count);
            }
            println!("{}", validation.summary());

            if !validation.is_valid() {
                return Err(BudgetError::Backup(format!(
                    "{} problem(s) found",
                    validation.problems.len()
                )));
            }
        }

        BackupCommands::Prune { force } => {
            let retention = &settings.backup_retention;
            let count = manager.list_backups()?.len();
            println!(
                "Retention policy: {} daily, {} monthly ({} backup(s) on disk)",
                retention.daily_count, retention.monthly_count, count
            );

            if !force {
                println!("To delete expired backups, run again with --force:");
                println!("  hbudget backup prune --force");
                return Ok(());
            }

            let deleted = manager.enforce_retention()?;
            println!("Deleted {} backup(s).", deleted.len());
        }
    }

    Ok(())
}

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(
    manager: &BackupManager,
    paths: &BudgetPaths,
    backup: &str,
) -> BudgetResult<PathBuf> {
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .get_latest_backup()?
            .map(|b| b.path)
            .ok_or_else(|| BudgetError::NotFound {
                entity_type: "Backup",
                identifier: "latest".to_string(),
            });
    }

    let path = PathBuf::from(backup);
    if path.exists() {
        return Ok(path);
    }

    for candidate in [backup.to_string(), format!("{}.json", backup)] {
        let in_dir = paths.backup_dir().join(candidate);
        if in_dir.exists() {
            return Ok(in_dir);
        }
    }

    Err(BudgetError::NotFound {
        entity_type: "Backup",
        identifier: backup.to_string(),
    })
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }
    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }
    format!("{}d", hours / 24)
}

/// Format a byte count in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
