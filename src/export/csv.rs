//! CSV Export functionality
//!
//! Exports transactions and loan/borrowed records in a spreadsheet-friendly
//! layout.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::models::{CashFlow, DebtKind, Money};
use crate::services::TransactionFilter;
use crate::storage::Storage;

fn export_err(e: impl std::fmt::Display) -> BudgetError {
    BudgetError::Export(e.to_string())
}

fn decimal(amount: Money) -> String {
    format!("{:.2}", amount.cents() as f64 / 100.0)
}

/// Export expenses and incomes as one CSV, newest first
///
/// Expense amounts are negative, incomes positive.
pub fn export_transactions_csv<W: Write>(
    storage: &Storage,
    filter: &TransactionFilter,
    writer: W,
) -> BudgetResult<usize> {
    let expenses = storage.expenses.get_all()?;
    let incomes = storage.incomes.get_all()?;

    let mut rows: Vec<&dyn CashFlow> = expenses
        .iter()
        .map(|e| e as &dyn CashFlow)
        .chain(incomes.iter().map(|i| i as &dyn CashFlow))
        .filter(|t| filter.matches(*t))
        .collect();
    rows.sort_by(|a, b| b.date().cmp(&a.date()));
    if let Some(limit) = filter.limit {
        rows.truncate(limit);
    }

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["ID", "Date", "Type", "Category", "Amount", "Comment"])
        .map_err(export_err)?;

    for txn in &rows {
        csv_writer
            .write_record([
                txn.display_id(),
                txn.date().to_string(),
                txn.kind().to_string(),
                txn.category().to_string(),
                decimal(txn.amount()),
                txn.comment().unwrap_or_default().to_string(),
            ])
            .map_err(export_err)?;
    }

    csv_writer.flush().map_err(export_err)?;
    Ok(rows.len())
}

/// Export loans and borrowed records with their current balance
pub fn export_debts_csv<W: Write>(storage: &Storage, writer: W) -> BudgetResult<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record([
            "ID",
            "Type",
            "Counterparty",
            "Issued",
            "Due",
            "Principal",
            "Repaid",
            "Outstanding",
            "Entries",
            "Closed",
            "Comment",
        ])
        .map_err(export_err)?;

    let mut count = 0;
    for kind in [DebtKind::Loan, DebtKind::Borrowed] {
        for record in storage.debts(kind).get_all()? {
            csv_writer
                .write_record([
                    record.id.to_string(),
                    kind.to_string(),
                    record.counterparty.clone(),
                    record.issue_date.to_string(),
                    record.due_date.map(|d| d.to_string()).unwrap_or_default(),
                    decimal(record.amount),
                    decimal(record.repaid()),
                    decimal(record.outstanding()),
                    record.entries.len().to_string(),
                    record.closed.to_string(),
                    record.comment.clone().unwrap_or_default(),
                ])
                .map_err(export_err)?;
            count += 1;
        }
    }

    csv_writer.flush().map_err(export_err)?;
    Ok(count)
}
