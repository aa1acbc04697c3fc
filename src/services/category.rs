//! Category service
//!
//! Manages the expense and income category lists. Transactions reference
//! categories by name only; renames carry the new name over to existing
//! transactions and plans, deletes leave history untouched.

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{same_name, Category, CategoryKind};
use crate::storage::{Storage, StoreKey};

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All categories of one kind, standard ones first in seeding order
    pub fn list(&self, kind: CategoryKind) -> BudgetResult<Vec<Category>> {
        self.storage.categories.get_by_kind(kind)
    }

    /// Look up a category, failing if it does not exist
    pub fn resolve(&self, kind: CategoryKind, name: &str) -> BudgetResult<Category> {
        self.storage
            .categories
            .get_by_name(kind, name)?
            .ok_or_else(|| BudgetError::category_not_found(format!("{} ({})", name.trim(), kind)))
    }

    /// Add a user category
    pub fn add(&self, kind: CategoryKind, name: &str) -> BudgetResult<Category> {
        let category = Category::new(name.trim(), kind);
        category
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        if self.storage.categories.get_by_name(kind, name)?.is_some() {
            return Err(BudgetError::Duplicate {
                entity_type: "Category",
                identifier: category.name,
            });
        }

        self.storage.categories.insert(category.clone())?;
        self.storage.save(StoreKey::Categories)?;

        self.storage.log_create(
            EntityType::Category,
            category.name.clone(),
            Some(kind.to_string()),
            &category,
        )?;

        Ok(category)
    }

    /// Rename a user category and every transaction or plan that uses it
    ///
    /// Returns the number of records whose category string was rewritten.
    pub fn rename(&self, kind: CategoryKind, old: &str, new: &str) -> BudgetResult<usize> {
        let before = self.resolve(kind, old)?;
        if before.standard {
            return Err(BudgetError::Validation(format!(
                "Standard category '{}' cannot be renamed",
                before.name
            )));
        }

        let after = Category {
            name: new.trim().to_string(),
            ..before.clone()
        };
        after
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        if let Some(existing) = self.storage.categories.get_by_name(kind, new)? {
            if !existing.is_named(&before.name) {
                return Err(BudgetError::Duplicate {
                    entity_type: "Category",
                    identifier: after.name,
                });
            }
        }

        self.storage.categories.rename(kind, &before.name, &after.name)?;
        self.storage.save(StoreKey::Categories)?;

        let rewritten = match kind {
            CategoryKind::Expense => self.rewrite_expense_category(&before.name, &after.name)?,
            CategoryKind::Income => self.rewrite_income_category(&before.name, &after.name)?,
        };

        self.storage.log_update(
            EntityType::Category,
            after.name.clone(),
            Some(kind.to_string()),
            &before,
            &after,
        )?;

        Ok(rewritten)
    }

    /// Delete a user category; transactions keep their category string
    pub fn delete(&self, kind: CategoryKind, name: &str) -> BudgetResult<Category> {
        let category = self.resolve(kind, name)?;
        if category.standard {
            return Err(BudgetError::Validation(format!(
                "Standard category '{}' cannot be deleted",
                category.name
            )));
        }

        self.storage.categories.remove(kind, &category.name)?;
        self.storage.save(StoreKey::Categories)?;

        self.storage.log_delete(
            EntityType::Category,
            category.name.clone(),
            Some(kind.to_string()),
            &category,
        )?;

        Ok(category)
    }

    fn rewrite_expense_category(&self, old: &str, new: &str) -> BudgetResult<usize> {
        let mut count = 0;
        for mut expense in self
            .storage
            .expenses
            .filter(|e| same_name(&e.category, old))?
        {
            expense.category = new.to_string();
            self.storage.expenses.upsert(expense)?;
            count += 1;
        }
        if count > 0 {
            self.storage.save(StoreKey::Expenses)?;
        }

        let mut plan_count = 0;
        for mut plan in self.storage.plans.filter(|p| {
            p.category
                .as_deref()
                .is_some_and(|c| same_name(c, old))
        })? {
            plan.category = Some(new.to_string());
            self.storage.plans.upsert(plan)?;
            plan_count += 1;
        }
        if plan_count > 0 {
            self.storage.save(StoreKey::Plans)?;
        }

        Ok(count + plan_count)
    }

    fn rewrite_income_category(&self, old: &str, new: &str) -> BudgetResult<usize> {
        let mut count = 0;
        for mut income in self
            .storage
            .incomes
            .filter(|i| same_name(&i.category, old))?
        {
            income.category = new.to_string();
            self.storage.incomes.upsert(income)?;
            count += 1;
        }
        if count > 0 {
            self.storage.save(StoreKey::Incomes)?;
        }
        Ok(count)
    }
}
