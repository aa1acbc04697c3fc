//! Shared transaction filter
//!
//! Used for both expense and income listings.

use chrono::NaiveDate;

use crate::models::{same_name, CashFlow};

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Category name, matched case-insensitively
    pub category: Option<String>,
    /// Inclusive range start
    pub start_date: Option<NaiveDate>,
    /// Inclusive range end
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a single transaction passes every criterion except the limit
    pub fn matches<T: CashFlow + ?Sized>(&self, txn: &T) -> bool {
        if let Some(category) = &self.category {
            if !same_name(txn.category(), category) {
                return false;
            }
        }
        if self.start_date.is_some_and(|start| txn.date() < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date() > end) {
            return false;
        }
        true
    }

    /// Filter an already ordered list and apply the limit
    pub fn apply<T: CashFlow>(&self, mut transactions: Vec<T>) -> Vec<T> {
        transactions.retain(|t| self.matches(t));
        if let Some(limit) = self.limit {
            transactions.truncate(limit);
        }
        transactions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, Money};

    fn expense(category: &str, day: u32) -> Expense {
        Expense::new(
            category,
            Money::from_cents(100),
            NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
        )
    }

    #[test]
    fn test_category_and_range() {
        let list = vec![expense("Food", 20), expense("food", 10), expense("Transport", 5)];
        let filter = TransactionFilter::new().category("FOOD").date_range(
            NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 19).unwrap(),
        );

        let result = filter.apply(list);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, "food");
    }

    #[test]
    fn test_category_ignores_unicode_case() {
        let list = vec![expense("Їжа", 3), expense("їжа", 2), expense("Транспорт", 1)];
        let result = TransactionFilter::new().category("ЇЖА").apply(list);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_limit() {
        let list = vec![expense("Food", 3), expense("Food", 2), expense("Food", 1)];
        let result = TransactionFilter::new().limit(2).apply(list);
        assert_eq!(result.len(), 2);
    }
}
