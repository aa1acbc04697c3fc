//! Expense and income transaction models
//!
//! Both record a category name, an amount, a date and an optional comment.
//! Expenses are always stored with a negative amount and incomes with a
//! positive one, whatever sign the caller supplied.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::CategoryKind;
use super::ids::{ExpenseId, IncomeId};
use super::money::Money;

/// Common read access used by aggregation and export
pub trait CashFlow {
    /// Display form of the record's id
    fn display_id(&self) -> String;
    fn kind(&self) -> CategoryKind;
    fn category(&self) -> &str;
    fn amount(&self) -> Money;
    fn date(&self) -> NaiveDate;
    fn comment(&self) -> Option<&str>;
}

/// An expense transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    /// Category name, matched case-insensitively against the category list
    pub category: String,

    /// Always negative
    pub amount: Money,

    /// Serialized as "YYYY-MM-DD"
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense, normalizing the amount to an outflow
    pub fn new(category: impl Into<String>, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: ExpenseId::new(),
            category: category.into(),
            amount: amount.as_outflow(),
            date,
            comment: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = normalize_comment(comment);
        self
    }

    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount.as_outflow();
    }
}

/// An income transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: IncomeId,
    pub category: String,

    /// Always positive
    pub amount: Money,

    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Income {
    /// Create a new income, normalizing the amount to an inflow
    pub fn new(category: impl Into<String>, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: IncomeId::new(),
            category: category.into(),
            amount: amount.as_inflow(),
            date,
            comment: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = normalize_comment(comment);
        self
    }

    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount.as_inflow();
    }
}

/// Trim a comment and drop it when blank
pub fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

impl CashFlow for Expense {
    fn display_id(&self) -> String {
        self.id.to_string()
    }

    fn kind(&self) -> CategoryKind {
        CategoryKind::Expense
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn amount(&self) -> Money {
        self.amount
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

impl CashFlow for Income {
    fn display_id(&self) -> String {
        self.id.to_string()
    }

    fn kind(&self) -> CategoryKind {
        CategoryKind::Income
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn amount(&self) -> Money {
        self.amount
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date.format("%Y-%m-%d"), self.category, self.amount)
    }
}

impl fmt::Display for Income {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date.format("%Y-%m-%d"), self.category, self.amount)
    }
}
