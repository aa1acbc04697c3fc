//! Expense and income display formatting
//!
//! Register tables and detail views for cash-flow records.

use tabled::Tabled;

use crate::models::{CashFlow, Money};

use super::format::{format_date, render_table, truncate};

#[derive(Tabled)]
struct CashFlowRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

/// Format expenses or incomes as a register table with a total line
pub fn format_cash_flow_register<T: CashFlow>(
    records: &[T],
    symbol: &str,
    date_format: &str,
) -> String {
    if records.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = records.iter().map(|r| CashFlowRow {
        id: r.display_id(),
        date: format_date(r.date(), date_format),
        category: truncate(r.category(), 20),
        amount: r.amount().format_with_symbol(symbol),
        comment: truncate(r.comment().unwrap_or(""), 30),
    });

    let total = records.iter().map(|r| r.amount()).sum::<Money>();
    format!(
        "{}\n{} record(s), total {}\n",
        render_table(rows),
        records.len(),
        total.format_with_symbol(symbol)
    )
}

/// Format one expense or income for display
pub fn format_cash_flow_details<T: CashFlow>(record: &T, symbol: &str, date_format: &str) -> String {
    let mut output = String::new();

    let mut label = record.kind().to_string();
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }

    output.push_str(&format!("{}: {}\n", label, record.display_id()));
    output.push_str(&format!("Date:     {}\n", format_date(record.date(), date_format)));
    output.push_str(&format!("Category: {}\n", record.category()));
    output.push_str(&format!("Amount:   {}\n", record.amount().format_with_symbol(symbol)));
    if let Some(comment) = record.comment() {
        output.push_str(&format!("Comment:  {}\n", comment));
    }

    output
}
