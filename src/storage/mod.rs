//! Storage layer for the home budget
//!
//! Every collection is kept in a single JSON preference store. Each write
//! replaces a whole collection and is followed by a local broadcast so open
//! observers know to reload.

pub mod broadcast;
pub mod categories;
pub mod file_io;
pub mod init;
pub mod preferences;
pub mod repository;

pub use broadcast::{ChangeBroadcaster, ChangeEvent, Subscription};
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use preferences::{PreferenceStore, StoreKey};
pub use repository::{Record, Repository};

use serde::Serialize;
use tracing::{debug, warn};

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::BudgetPaths;
use crate::error::BudgetError;
use crate::models::{BudgetPlan, DebtKind, DebtRecord, Expense, Income, Task};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: BudgetPaths,
    store: PreferenceStore,
    broadcaster: ChangeBroadcaster,
    audit: AuditLogger,
    pub expenses: Repository<Expense>,
    pub incomes: Repository<Income>,
    pub loans: Repository<DebtRecord>,
    pub borrowed: Repository<DebtRecord>,
    pub tasks: Repository<Task>,
    pub plans: Repository<BudgetPlan>,
    pub categories: CategoryRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: BudgetPaths) -> Result<Self, BudgetError> {
        paths.ensure_directories()?;

        Ok(Self {
            store: PreferenceStore::open(paths.preferences_file())?,
            broadcaster: ChangeBroadcaster::new(),
            audit: AuditLogger::new(paths.audit_log()),
            expenses: Repository::new(StoreKey::Expenses),
            incomes: Repository::new(StoreKey::Incomes),
            loans: Repository::new(StoreKey::Loans),
            borrowed: Repository::new(StoreKey::Borrowed),
            tasks: Repository::new(StoreKey::Tasks),
            plans: Repository::new(StoreKey::Plans),
            categories: CategoryRepository::new(),
            paths,
        })
    }

    pub fn paths(&self) -> &BudgetPaths {
        &self.paths
    }

    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// The repository holding loans or borrowed records
    pub fn debts(&self, kind: DebtKind) -> &Repository<DebtRecord> {
        match kind {
            DebtKind::Loan => &self.loans,
            DebtKind::Borrowed => &self.borrowed,
        }
    }

    /// Load all collections from the store
    pub fn load_all(&self) -> Result<(), BudgetError> {
        for key in StoreKey::ALL {
            self.load_key(key)?;
        }
        Ok(())
    }

    /// Save all collections
    pub fn save_all(&self) -> Result<(), BudgetError> {
        for key in StoreKey::ALL {
            self.save(key)?;
        }
        Ok(())
    }

    /// Write one collection back and notify observers
    pub fn save(&self, key: StoreKey) -> Result<(), BudgetError> {
        match key {
            StoreKey::Expenses => self.expenses.save(&self.store)?,
            StoreKey::Incomes => self.incomes.save(&self.store)?,
            StoreKey::Loans => self.loans.save(&self.store)?,
            StoreKey::Borrowed => self.borrowed.save(&self.store)?,
            StoreKey::Tasks => self.tasks.save(&self.store)?,
            StoreKey::Plans => self.plans.save(&self.store)?,
            StoreKey::Categories => self.categories.save(&self.store)?,
        }
        debug!(%key, "saved collection");
        self.broadcaster.publish(ChangeEvent { key });
        Ok(())
    }

    /// Re-read the store from disk and reload one collection
    pub fn reload(&self, key: StoreKey) -> Result<(), BudgetError> {
        self.store.reload()?;
        self.load_key(key)
    }

    fn load_key(&self, key: StoreKey) -> Result<(), BudgetError> {
        match key {
            StoreKey::Expenses => self.expenses.load(&self.store),
            StoreKey::Incomes => self.incomes.load(&self.store),
            StoreKey::Loans => self.loans.load(&self.store),
            StoreKey::Borrowed => self.borrowed.load(&self.store),
            StoreKey::Tasks => self.tasks.load(&self.store),
            StoreKey::Plans => self.plans.load(&self.store),
            StoreKey::Categories => self.categories.load(&self.store),
        }
    }

    /// Register an observer for change events
    pub fn subscribe(&self) -> Subscription {
        self.broadcaster.subscribe()
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), BudgetError> {
        self.write_audit(AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record an update in the audit log, deriving the diff from both states
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), BudgetError> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.write_audit(AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), BudgetError> {
        self.write_audit(AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    fn write_audit(&self, entry: AuditEntry) -> Result<(), BudgetError> {
        self.audit.log(&entry).inspect_err(|e| {
            warn!(error = %e, "failed to append audit entry");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_storage();
        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("backups").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_broadcasts_change() {
        let (_temp_dir, storage) = create_storage();
        let observer = storage.subscribe();

        let expense = Expense::new(
            "Food",
            Money::from_cents(100),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );
        storage.expenses.upsert(expense).unwrap();
        storage.save(StoreKey::Expenses).unwrap();

        assert_eq!(observer.changed_keys(), vec![StoreKey::Expenses]);
    }

    #[test]
    fn test_second_handle_reloads_after_change() {
        let (temp_dir, writer) = create_storage();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let reader = Storage::new(paths).unwrap();
        reader.load_all().unwrap();

        let task = Task::new(
            "Water plants",
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap().and_hms_opt(9, 30, 0).unwrap(),
        );
        writer.tasks.upsert(task).unwrap();
        writer.save(StoreKey::Tasks).unwrap();

        assert_eq!(reader.tasks.count().unwrap(), 0);
        reader.reload(StoreKey::Tasks).unwrap();
        assert_eq!(reader.tasks.count().unwrap(), 1);
    }

    #[test]
    fn test_debts_routes_by_kind() {
        let (_temp_dir, storage) = create_storage();
        assert_eq!(storage.debts(DebtKind::Loan).key(), StoreKey::Loans);
        assert_eq!(storage.debts(DebtKind::Borrowed).key(), StoreKey::Borrowed);
    }
}
