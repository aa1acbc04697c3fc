//! Income service

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::transaction::normalize_comment;
use crate::models::{CategoryKind, Income, IncomeId, Money};
use crate::storage::{Storage, StoreKey};

use super::category::CategoryService;
use super::filter::TransactionFilter;

/// Input for recording income
#[derive(Debug, Clone)]
pub struct CreateIncomeInput {
    pub category: String,
    pub amount: Money,
    pub date: Option<NaiveDate>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateIncomeInput {
    pub category: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub comment: Option<Option<String>>,
}

/// Service for income management
pub struct IncomeService<'a> {
    storage: &'a Storage,
}

impl<'a> IncomeService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record income; the amount is stored positive
    pub fn create(&self, input: CreateIncomeInput) -> BudgetResult<Income> {
        if input.amount.is_zero() {
            return Err(BudgetError::Validation("Income amount cannot be zero".into()));
        }

        let category = CategoryService::new(self.storage).resolve(CategoryKind::Income, &input.category)?;
        let date = input.date.unwrap_or_else(|| Local::now().date_naive());
        let income = Income::new(category.name, input.amount, date).with_comment(input.comment);

        self.storage.incomes.upsert(income.clone())?;
        self.storage.save(StoreKey::Incomes)?;

        self.storage.log_create(
            EntityType::Income,
            income.id.to_string(),
            Some(format!("{} {}", income.date, income.category)),
            &income,
        )?;
        info!(id = %income.id, amount = %income.amount, "income recorded");

        Ok(income)
    }

    pub fn get(&self, id: IncomeId) -> BudgetResult<Option<Income>> {
        self.storage.incomes.get(id)
    }

    pub fn find(&self, identifier: &str) -> BudgetResult<Income> {
        self.storage
            .incomes
            .find(identifier)?
            .ok_or_else(|| BudgetError::income_not_found(identifier))
    }

    pub fn list(&self, filter: &TransactionFilter) -> BudgetResult<Vec<Income>> {
        Ok(filter.apply(self.storage.incomes.get_all()?))
    }

    pub fn update(&self, id: IncomeId, input: UpdateIncomeInput) -> BudgetResult<Income> {
        let before = self
            .storage
            .incomes
            .get(id)?
            .ok_or_else(|| BudgetError::income_not_found(id.to_string()))?;
        let mut income = before.clone();

        if let Some(category) = input.category {
            income.category = CategoryService::new(self.storage)
                .resolve(CategoryKind::Income, &category)?
                .name;
        }
        if let Some(amount) = input.amount {
            if amount.is_zero() {
                return Err(BudgetError::Validation("Income amount cannot be zero".into()));
            }
            income.set_amount(amount);
        }
        if let Some(date) = input.date {
            income.date = date;
        }
        if let Some(comment) = input.comment {
            income.comment = normalize_comment(comment);
        }

        self.storage.incomes.upsert(income.clone())?;
        self.storage.save(StoreKey::Incomes)?;

        self.storage.log_update(
            EntityType::Income,
            income.id.to_string(),
            Some(format!("{} {}", income.date, income.category)),
            &before,
            &income,
        )?;

        Ok(income)
    }

    pub fn delete(&self, id: IncomeId) -> BudgetResult<Income> {
        let income = self
            .storage
            .incomes
            .delete(id)?
            .ok_or_else(|| BudgetError::income_not_found(id.to_string()))?;
        self.storage.save(StoreKey::Incomes)?;

        self.storage.log_delete(
            EntityType::Income,
            id.to_string(),
            Some(format!("{} {}", income.date, income.category)),
            &income,
        )?;

        Ok(income)
    }

    pub fn total(&self, filter: &TransactionFilter) -> BudgetResult<Money> {
        Ok(self.list(filter)?.iter().map(|i| i.amount).sum())
    }
}
