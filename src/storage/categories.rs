//! Category repository
//!
//! Expense and income categories are stored together as one list under the
//! `categories` key, in insertion order.

use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{Category, CategoryKind};

use super::preferences::{PreferenceStore, StoreKey};

/// Repository for category persistence
pub struct CategoryRepository {
    categories: RwLock<Vec<Category>>,
}

impl Default for CategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryRepository {
    pub fn new() -> Self {
        Self {
            categories: RwLock::new(Vec::new()),
        }
    }

    /// Load categories from the store
    pub fn load(&self, store: &PreferenceStore) -> Result<(), BudgetError> {
        let loaded: Vec<Category> = store
            .get(StoreKey::Categories.as_str())?
            .unwrap_or_default();

        let mut categories = self
            .categories
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *categories = loaded;
        Ok(())
    }

    /// Save categories to the store
    pub fn save(&self, store: &PreferenceStore) -> Result<(), BudgetError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        store.put(StoreKey::Categories.as_str(), &*categories)
    }

    /// All categories of one kind, in insertion order
    pub fn get_by_kind(&self, kind: CategoryKind) -> Result<Vec<Category>, BudgetError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.iter().filter(|c| c.kind == kind).cloned().collect())
    }

    pub fn get_all(&self) -> Result<Vec<Category>, BudgetError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories.clone())
    }

    /// Case-insensitive lookup
    pub fn get_by_name(
        &self,
        kind: CategoryKind,
        name: &str,
    ) -> Result<Option<Category>, BudgetError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(categories
            .iter()
            .find(|c| c.kind == kind && c.is_named(name))
            .cloned())
    }

    /// Append a category
    pub fn insert(&self, category: Category) -> Result<(), BudgetError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        categories.push(category);
        Ok(())
    }

    /// Rename in place, keeping position; returns whether a category matched
    pub fn rename(&self, kind: CategoryKind, old: &str, new: &str) -> Result<bool, BudgetError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        match categories.iter_mut().find(|c| c.kind == kind && c.is_named(old)) {
            Some(category) => {
                category.name = new.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a category; returns it if it existed
    pub fn remove(&self, kind: CategoryKind, name: &str) -> Result<Option<Category>, BudgetError> {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let position = categories
            .iter()
            .position(|c| c.kind == kind && c.is_named(name));
        Ok(position.map(|i| categories.remove(i)))
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(categories.len())
    }
}
