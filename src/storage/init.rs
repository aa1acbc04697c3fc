//! Storage initialization
//!
//! Handles first-run setup and seeding of the standard categories.

use tracing::info;

use crate::error::BudgetError;
use crate::models::{Category, CategoryKind};

use super::{Storage, StoreKey};

/// Initialize storage for a fresh installation
///
/// Seeds any standard category that is missing. Running it again is a no-op.
/// Returns the number of categories added.
pub fn initialize_storage(storage: &Storage) -> Result<usize, BudgetError> {
    storage.paths().ensure_directories()?;

    let mut added = 0;
    for kind in [CategoryKind::Expense, CategoryKind::Income] {
        for name in kind.standard_names() {
            if storage.categories.get_by_name(kind, name)?.is_none() {
                storage.categories.insert(Category::standard(*name, kind))?;
                added += 1;
            }
        }
    }

    if added > 0 {
        storage.save(StoreKey::Categories)?;
        info!(added, "seeded standard categories");
    }

    Ok(added)
}

/// Check if storage needs initialization
pub fn needs_initialization(storage: &Storage) -> Result<bool, BudgetError> {
    Ok(!storage.store().contains(StoreKey::Categories.as_str())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(BudgetPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.load_all().unwrap();

        assert!(needs_initialization(&storage).unwrap());
        let first = initialize_storage(&storage).unwrap();
        assert_eq!(
            first,
            CategoryKind::Expense.standard_names().len() + CategoryKind::Income.standard_names().len()
        );
        assert!(!needs_initialization(&storage).unwrap());

        assert_eq!(initialize_storage(&storage).unwrap(), 0);
    }

    #[test]
    fn test_user_category_survives_reinit() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(BudgetPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage.load_all().unwrap();
        storage
            .categories
            .insert(Category::new("Pets", CategoryKind::Expense))
            .unwrap();

        initialize_storage(&storage).unwrap();
        assert!(storage
            .categories
            .get_by_name(CategoryKind::Expense, "pets")
            .unwrap()
            .is_some());
    }
}
