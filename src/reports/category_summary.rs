//! Category summary report
//!
//! Groups expenses or incomes in a period by category name.

use std::collections::HashMap;
use std::io::Write;

use chrono::Weekday;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{name_key, CashFlow, CategoryKind, Money};
use crate::storage::Storage;

use super::period::Period;

/// One category's share of the period
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    /// Signed: negative for expenses
    pub total: Money,
    pub count: usize,
    /// Share of the period total, 0-100
    pub percentage: f64,
}

/// Totals by category for one kind of transaction
#[derive(Debug, Clone)]
pub struct CategorySummary {
    pub kind: CategoryKind,
    pub period: Period,
    pub rows: Vec<CategoryTotal>,
    pub total: Money,
    pub transaction_count: usize,
}

impl CategorySummary {
    /// Summarize stored expenses or incomes
    pub fn generate(
        storage: &Storage,
        kind: CategoryKind,
        period: Period,
        week_start: Weekday,
    ) -> BudgetResult<Self> {
        Ok(match kind {
            CategoryKind::Expense => {
                Self::from_transactions(kind, period, week_start, &storage.expenses.get_all()?)
            }
            CategoryKind::Income => {
                Self::from_transactions(kind, period, week_start, &storage.incomes.get_all()?)
            }
        })
    }

    /// Group transactions in the period
    ///
    /// Category names are grouped case-insensitively; the first spelling
    /// seen is the one reported. Rows are ordered by absolute total, largest
    /// first, ties broken by name.
    pub fn from_transactions<T: CashFlow>(
        kind: CategoryKind,
        period: Period,
        week_start: Weekday,
        transactions: &[T],
    ) -> Self {
        let mut groups: HashMap<String, CategoryTotal> = HashMap::new();
        let mut total = Money::zero();
        let mut transaction_count = 0;

        for txn in transactions
            .iter()
            .filter(|t| t.kind() == kind && period.contains(t.date(), week_start))
        {
            let entry = groups
                .entry(name_key(txn.category()))
                .or_insert_with(|| CategoryTotal {
                    category: txn.category().to_string(),
                    total: Money::zero(),
                    count: 0,
                    percentage: 0.0,
                });
            entry.total += txn.amount();
            entry.count += 1;
            total += txn.amount();
            transaction_count += 1;
        }

        let mut rows: Vec<CategoryTotal> = groups.into_values().collect();
        for row in &mut rows {
            row.percentage = row.total.percent_of(total);
        }
        rows.sort_by(|a, b| {
            b.total
                .abs()
                .cmp(&a.total.abs())
                .then_with(|| a.category.cmp(&b.category))
        });

        Self {
            kind,
            period,
            rows,
            total,
            transaction_count,
        }
    }

    /// The `limit` largest categories
    pub fn top(&self, limit: usize) -> &[CategoryTotal] {
        &self.rows[..limit.min(self.rows.len())]
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self) -> String {
        let title = match self.kind {
            CategoryKind::Expense => "Expenses",
            CategoryKind::Income => "Income",
        };

        let mut output = format!("{} by category: {}\n", title, self.period);
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>12} {:>6} {:>8}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<30} {:>12} {:>6} {:>7.1}%\n",
                row.category,
                row.total.abs(),
                row.count,
                row.percentage
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>12} {:>6}\n",
            "TOTAL",
            self.total.abs(),
            self.transaction_count
        ));
        output
    }

    /// Write the summary as CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> BudgetResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer
            .write_record(["Period", "Kind", "Category", "Amount", "Count", "Percentage"])
            .map_err(|e| BudgetError::Export(e.to_string()))?;

        for row in &self.rows {
            csv_writer
                .write_record([
                    self.period.to_string(),
                    self.kind.to_string(),
                    row.category.clone(),
                    format!("{:.2}", row.total.cents() as f64 / 100.0),
                    row.count.to_string(),
                    format!("{:.2}", row.percentage),
                ])
                .map_err(|e| BudgetError::Export(e.to_string()))?;
        }

        csv_writer
            .flush()
            .map_err(|e| BudgetError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, Income};
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    fn expense(category: &str, cents: i64, date: NaiveDate) -> Expense {
        Expense::new(category, Money::from_cents(cents), date)
    }

    #[test]
    fn test_groups_sorts_and_filters() {
        let expenses = vec![
            expense("Food", 3000, d(3, 1)),
            expense("Transport", 5000, d(3, 2)),
            expense("food", 2000, d(3, 20)),
            expense("Health", 1000, d(3, 5)),
            expense("Food", 9999, d(4, 1)),
        ];

        let summary = CategorySummary::from_transactions(
            CategoryKind::Expense,
            Period::Month(2025, 3),
            Weekday::Mon,
            &expenses,
        );

        assert_eq!(summary.total.cents(), -11000);
        assert_eq!(summary.transaction_count, 4);

        let names: Vec<&str> = summary.rows.iter().map(|r| r.category.as_str()).collect();
        // Food and Transport tie at 50.00; names break the tie
        assert_eq!(names, vec!["Food", "Transport", "Health"]);
        assert_eq!(summary.rows[0].count, 2);
        assert!((summary.rows[2].percentage - 100.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_period() {
        let incomes = vec![Income::new("Salary", Money::from_cents(100), d(1, 1))];
        let summary = CategorySummary::from_transactions(
            CategoryKind::Income,
            Period::Month(2025, 2),
            Weekday::Mon,
            &incomes,
        );
        assert!(summary.rows.is_empty());
        assert!(summary.total.is_zero());
        assert!(summary.top(3).is_empty());
    }

    #[test]
    fn test_csv_export() {
        let incomes = vec![
            Income::new("Salary", Money::from_cents(300000), d(1, 31)),
            Income::new("Gifts", Money::from_cents(5000), d(1, 5)),
        ];
        let summary = CategorySummary::from_transactions(
            CategoryKind::Income,
            Period::All,
            Weekday::Mon,
            &incomes,
        );

        let mut out = Vec::new();
        summary.export_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Period,Kind,Category,Amount,Count,Percentage");
        assert!(lines[1].starts_with("all time,income,Salary,3000.00,1,"));
        assert_eq!(lines.len(), 3);
    }
}
