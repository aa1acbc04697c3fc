//! JSON Export functionality
//!
//! Exports every collection to one JSON document with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetPlan, Category, DebtRecord, Expense, Income, Task};
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full database export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
    pub loans: Vec<DebtRecord>,
    pub borrowed: Vec<DebtRecord>,
    pub tasks: Vec<Task>,
    pub plans: Vec<BudgetPlan>,
    pub categories: Vec<Category>,

    pub metadata: ExportMetadata,
}

/// Counts and date range, for reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub expense_count: usize,
    pub income_count: usize,
    pub loan_count: usize,
    pub borrowed_count: usize,
    pub task_count: usize,
    pub plan_count: usize,
    pub category_count: usize,

    /// Earliest expense or income date
    pub earliest_transaction: Option<String>,

    /// Latest expense or income date
    pub latest_transaction: Option<String>,
}

impl FullExport {
    /// Snapshot every collection from storage
    pub fn from_storage(storage: &Storage) -> BudgetResult<Self> {
        let expenses = storage.expenses.get_all()?;
        let incomes = storage.incomes.get_all()?;
        let loans = storage.loans.get_all()?;
        let borrowed = storage.borrowed.get_all()?;
        let tasks = storage.tasks.get_all()?;
        let plans = storage.plans.get_all()?;
        let categories = storage.categories.get_all()?;

        let dates = || {
            expenses
                .iter()
                .map(|e| e.date)
                .chain(incomes.iter().map(|i| i.date))
        };

        let metadata = ExportMetadata {
            expense_count: expenses.len(),
            income_count: incomes.len(),
            loan_count: loans.len(),
            borrowed_count: borrowed.len(),
            task_count: tasks.len(),
            plan_count: plans.len(),
            category_count: categories.len(),
            earliest_transaction: dates().min().map(|d| d.to_string()),
            latest_transaction: dates().max().map(|d| d.to_string()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            expenses,
            incomes,
            loans,
            borrowed,
            tasks,
            plans,
            categories,
            metadata,
        })
    }

    /// Check the export is internally consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version.split('.').next() != EXPORT_SCHEMA_VERSION.split('.').next() {
            return Err(format!(
                "Incompatible schema version {} (expected {})",
                self.schema_version, EXPORT_SCHEMA_VERSION
            ));
        }

        let checks = [
            ("expenses", self.metadata.expense_count, self.expenses.len()),
            ("incomes", self.metadata.income_count, self.incomes.len()),
            ("loans", self.metadata.loan_count, self.loans.len()),
            ("borrowed", self.metadata.borrowed_count, self.borrowed.len()),
            ("tasks", self.metadata.task_count, self.tasks.len()),
            ("plans", self.metadata.plan_count, self.plans.len()),
            ("categories", self.metadata.category_count, self.categories.len()),
        ];
        for (name, expected, actual) in checks {
            if expected != actual {
                return Err(format!(
                    "Metadata lists {} {} but the export holds {}",
                    expected, name, actual
                ));
            }
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: W, pretty: bool) -> BudgetResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| BudgetError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::Money;
    use crate::storage::initialize_storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        initialize_storage(&storage).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_full_export_metadata() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .expenses
            .upsert(Expense::new("Food", Money::from_cents(100), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()))
            .unwrap();
        storage
            .incomes
            .upsert(Income::new("Salary", Money::from_cents(100), NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()))
            .unwrap();

        let export = FullExport::from_storage(&storage).unwrap();
        assert_eq!(export.metadata.expense_count, 1);
        assert_eq!(export.metadata.category_count, 15);
        assert_eq!(export.metadata.earliest_transaction.as_deref(), Some("2025-01-15"));
        assert_eq!(export.metadata.latest_transaction.as_deref(), Some("2025-02-01"));
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_output_parses_back() {
        let (_temp_dir, storage) = create_test_storage();

        let mut out = Vec::new();
        export_full_json(&storage, &mut out, true).unwrap();

        let parsed: FullExport = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.schema_version, EXPORT_SCHEMA_VERSION);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_validate_catches_mismatch() {
        let (_temp_dir, storage) = create_test_storage();
        let mut export = FullExport::from_storage(&storage).unwrap();
        export.metadata.task_count = 3;
        assert!(export.validate().unwrap_err().contains("tasks"));

        export.metadata.task_count = 0;
        export.schema_version = "2.0.0".into();
        assert!(export.validate().is_err());
    }
}
