//! Balance report
//!
//! Income against expenses for a period, alongside what is still owed in
//! either direction.

use chrono::Weekday;

use crate::error::BudgetResult;
use crate::models::{CashFlow, DebtKind, DebtRecord, Money};
use crate::storage::Storage;

use super::period::Period;

/// Period balance and open debt positions
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceReport {
    pub period: Period,
    pub total_income: Money,
    /// Negative
    pub total_expenses: Money,
    pub income_count: usize,
    pub expense_count: usize,
    /// Still owed to me across open loans
    pub loans_outstanding: Money,
    /// Still owed by me across open borrowed records
    pub borrowed_outstanding: Money,
}

impl BalanceReport {
    pub fn generate(storage: &Storage, period: Period, week_start: Weekday) -> BudgetResult<Self> {
        let expenses = storage.expenses.get_all()?;
        let incomes = storage.incomes.get_all()?;
        let loans = storage.debts(DebtKind::Loan).get_all()?;
        let borrowed = storage.debts(DebtKind::Borrowed).get_all()?;

        let (total_expenses, expense_count) = sum_in_period(&expenses, period, week_start);
        let (total_income, income_count) = sum_in_period(&incomes, period, week_start);

        Ok(Self {
            period,
            total_income,
            total_expenses,
            income_count,
            expense_count,
            loans_outstanding: open_outstanding(&loans),
            borrowed_outstanding: open_outstanding(&borrowed),
        })
    }

    /// Income plus (negative) expenses
    pub fn net(&self) -> Money {
        self.total_income + self.total_expenses
    }

    /// Savings rate as a share of income, 0 when there was no income
    pub fn savings_rate(&self) -> f64 {
        if self.total_income.is_positive() {
            self.net().cents() as f64 / self.total_income.cents() as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Net position across open debts: positive when others owe me more
    pub fn net_debt_position(&self) -> Money {
        self.loans_outstanding - self.borrowed_outstanding
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = format!("Balance: {}\n", self.period);
        output.push_str(&"=".repeat(44));
        output.push('\n');

        let mut line = |label: &str, value: String| {
            output.push_str(&format!("{:<28} {:>15}\n", label, value));
        };

        line(
            &format!("Income ({})", self.income_count),
            self.total_income.format_with_symbol(symbol),
        );
        line(
            &format!("Expenses ({})", self.expense_count),
            self.total_expenses.format_with_symbol(symbol),
        );
        line("Net", self.net().format_with_symbol(symbol));
        line("Savings rate", format!("{:.1}%", self.savings_rate()));
        line("Loans outstanding", self.loans_outstanding.format_with_symbol(symbol));
        line("Borrowed outstanding", self.borrowed_outstanding.format_with_symbol(symbol));

        output
    }
}

fn sum_in_period<T: CashFlow>(transactions: &[T], period: Period, week_start: Weekday) -> (Money, usize) {
    transactions
        .iter()
        .filter(|t| period.contains(t.date(), week_start))
        .fold((Money::zero(), 0), |(sum, count), t| (sum + t.amount(), count + 1))
}

fn open_outstanding(records: &[DebtRecord]) -> Money {
    records
        .iter()
        .filter(|r| !r.closed)
        .map(DebtRecord::outstanding)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::{DebtEntry, DebtEntryKind, Expense, Income};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[test]
    fn test_balance_for_month() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(BudgetPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();

        storage.incomes.upsert(Income::new("Salary", Money::from_cents(300000), d(3, 1))).unwrap();
        storage.incomes.upsert(Income::new("Salary", Money::from_cents(300000), d(4, 1))).unwrap();
        storage.expenses.upsert(Expense::new("Food", Money::from_cents(45000), d(3, 3))).unwrap();
        storage.expenses.upsert(Expense::new("Housing", Money::from_cents(120000), d(3, 5))).unwrap();

        let mut loan = DebtRecord::new(DebtKind::Loan, Money::from_cents(10000), "Bob", d(1, 1));
        loan.entries.push(DebtEntry::new(DebtEntryKind::Repayment, Money::from_cents(2500), d(2, 1)));
        storage.loans.upsert(loan).unwrap();

        let mut settled = DebtRecord::new(DebtKind::Borrowed, Money::from_cents(500), "Ann", d(1, 1));
        settled.closed = true;
        storage.borrowed.upsert(settled).unwrap();
        storage
            .borrowed
            .upsert(DebtRecord::new(DebtKind::Borrowed, Money::from_cents(2000), "Cy", d(1, 2)))
            .unwrap();

        let report = BalanceReport::generate(&storage, Period::Month(2025, 3), Weekday::Mon).unwrap();

        assert_eq!(report.total_income.cents(), 300000);
        assert_eq!(report.total_expenses.cents(), -165000);
        assert_eq!(report.net().cents(), 135000);
        assert_eq!(report.expense_count, 2);
        assert!((report.savings_rate() - 45.0).abs() < 1e-9);
        assert_eq!(report.loans_outstanding.cents(), 7500);
        assert_eq!(report.borrowed_outstanding.cents(), 2000);
        assert_eq!(report.net_debt_position().cents(), 5500);

        let text = report.format_terminal("$");
        assert!(text.contains("Net"));
        assert!(text.contains("$1350.00"));
    }
}
