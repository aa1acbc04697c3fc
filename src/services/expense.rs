//! Expense service
//!
//! Records spending. Amounts are stored negative whatever sign is given and
//! the category must exist in the expense category list.

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::transaction::normalize_comment;
use crate::models::{CategoryKind, Expense, ExpenseId, Money};
use crate::storage::{Storage, StoreKey};

use super::category::CategoryService;
use super::filter::TransactionFilter;

/// Input for creating a new expense
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub category: String,
    pub amount: Money,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub comment: Option<String>,
}

/// Changes to apply to an existing expense; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseInput {
    pub category: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    /// `Some(None)` clears the comment
    pub comment: Option<Option<String>>,
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new expense
    pub fn create(&self, input: CreateExpenseInput) -> BudgetResult<Expense> {
        if input.amount.is_zero() {
            return Err(BudgetError::Validation("Expense amount cannot be zero".into()));
        }

        let category = CategoryService::new(self.storage).resolve(CategoryKind::Expense, &input.category)?;

        let date = input.date.unwrap_or_else(|| Local::now().date_naive());
        let expense = Expense::new(category.name, input.amount, date).with_comment(input.comment);

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.save(StoreKey::Expenses)?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(format!("{} {}", expense.date, expense.category)),
            &expense,
        )?;
        info!(id = %expense.id, amount = %expense.amount, "expense recorded");

        Ok(expense)
    }

    pub fn get(&self, id: ExpenseId) -> BudgetResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Find an expense by full or short ID
    pub fn find(&self, identifier: &str) -> BudgetResult<Expense> {
        self.storage
            .expenses
            .find(identifier)?
            .ok_or_else(|| BudgetError::expense_not_found(identifier))
    }

    /// List expenses, newest first
    pub fn list(&self, filter: &TransactionFilter) -> BudgetResult<Vec<Expense>> {
        Ok(filter.apply(self.storage.expenses.get_all()?))
    }

    /// Update an expense
    pub fn update(&self, id: ExpenseId, input: UpdateExpenseInput) -> BudgetResult<Expense> {
        let before = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| BudgetError::expense_not_found(id.to_string()))?;
        let mut expense = before.clone();

        if let Some(category) = input.category {
            expense.category = CategoryService::new(self.storage)
                .resolve(CategoryKind::Expense, &category)?
                .name;
        }

        if let Some(amount) = input.amount {
            if amount.is_zero() {
                return Err(BudgetError::Validation("Expense amount cannot be zero".into()));
            }
            expense.set_amount(amount);
        }

        if let Some(date) = input.date {
            expense.date = date;
        }

        if let Some(comment) = input.comment {
            expense.comment = normalize_comment(comment);
        }

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.save(StoreKey::Expenses)?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(format!("{} {}", expense.date, expense.category)),
            &before,
            &expense,
        )?;

        Ok(expense)
    }

    /// Delete an expense
    pub fn delete(&self, id: ExpenseId) -> BudgetResult<Expense> {
        let expense = self
            .storage
            .expenses
            .delete(id)?
            .ok_or_else(|| BudgetError::expense_not_found(id.to_string()))?;
        self.storage.save(StoreKey::Expenses)?;

        self.storage.log_delete(
            EntityType::Expense,
            id.to_string(),
            Some(format!("{} {}", expense.date, expense.category)),
            &expense,
        )?;

        Ok(expense)
    }

    /// Sum of all expenses matching the filter (negative)
    pub fn total(&self, filter: &TransactionFilter) -> BudgetResult<Money> {
        Ok(self.list(filter)?.iter().map(|e| e.amount).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::storage::initialize_storage;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        initialize_storage(&storage).unwrap();
        (temp_dir, storage)
    }

    fn input(category: &str, cents: i64, day: u32) -> CreateExpenseInput {
        CreateExpenseInput {
            category: category.into(),
            amount: Money::from_cents(cents),
            date: Some(NaiveDate::from_ymd_opt(2025, 3, day).unwrap()),
            comment: None,
        }
    }

    #[test]
    fn test_create_normalizes_sign_and_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        let expense = service.create(input("food", 1250, 1)).unwrap();
        assert_eq!(expense.amount.cents(), -1250);
        assert_eq!(expense.category, "Food");

        let negative = service.create(input("Food", -300, 2)).unwrap();
        assert_eq!(negative.amount.cents(), -300);
    }

    #[test]
    fn test_create_rejects_unknown_category_and_zero() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        assert!(service.create(input("Yachts", 100, 1)).unwrap_err().is_not_found());
        assert!(service.create(input("Food", 0, 1)).unwrap_err().is_validation());
        // Income categories do not count as expense categories
        assert!(service.create(input("Salary", 100, 1)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let expense = service.create(input("Food", 1000, 1)).unwrap();

        let updated = service
            .update(
                expense.id,
                UpdateExpenseInput {
                    category: Some("transport".into()),
                    amount: Some(Money::from_cents(2000)),
                    comment: Some(Some("taxi".into())),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.category, "Transport");
        assert_eq!(updated.amount.cents(), -2000);
        assert_eq!(updated.comment.as_deref(), Some("taxi"));

        let found = service.find(&expense.id.to_string()).unwrap();
        assert_eq!(found.id, expense.id);

        service.delete(expense.id).unwrap();
        assert!(service.get(expense.id).unwrap().is_none());
        assert!(service.delete(expense.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_list_and_total() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        service.create(input("Food", 100, 1)).unwrap();
        service.create(input("Food", 200, 15)).unwrap();
        service.create(input("Health", 400, 20)).unwrap();

        let food = TransactionFilter::new().category("Food");
        assert_eq!(service.list(&food).unwrap().len(), 2);
        assert_eq!(service.total(&food).unwrap().cents(), -300);

        let all = service.list(&TransactionFilter::new()).unwrap();
        assert_eq!(all[0].category, "Health");
    }

    #[test]
    fn test_audit_entries_written() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);
        let expense = service.create(input("Food", 100, 1)).unwrap();
        service
            .update(
                expense.id,
                UpdateExpenseInput {
                    amount: Some(Money::from_cents(150)),
                    ..Default::default()
                },
            )
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        let last = entries.last().unwrap();
        assert_eq!(last.entity_type, EntityType::Expense);
        assert_eq!(last.diff_summary.as_deref(), Some("amount: -100 -> -150"));
    }
}
