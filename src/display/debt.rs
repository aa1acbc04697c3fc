//! Loan and borrowed-money display formatting

use chrono::NaiveDate;
use tabled::Tabled;

use crate::models::{DebtKind, DebtRecord};
use crate::services::DebtTotals;

use super::format::{format_date, render_table, truncate};

#[derive(Tabled)]
struct DebtRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Counterparty")]
    counterparty: String,
    #[tabled(rename = "Issued")]
    issued: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Principal")]
    principal: String,
    #[tabled(rename = "Outstanding")]
    outstanding: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Comment")]
    comment: String,
}

fn status_label(record: &DebtRecord, today: NaiveDate) -> &'static str {
    if record.closed {
        "Closed"
    } else if record.is_overdue(today) {
        "Overdue"
    } else {
        "Open"
    }
}

fn heading(kind: DebtKind) -> &'static str {
    match kind {
        DebtKind::Loan => "Money lent",
        DebtKind::Borrowed => "Money borrowed",
    }
}

/// Format loan or borrowed records as a table
pub fn format_debt_list(
    kind: DebtKind,
    records: &[DebtRecord],
    totals: &DebtTotals,
    today: NaiveDate,
    symbol: &str,
    date_format: &str,
) -> String {
    if records.is_empty() {
        return format!("No {} records found.\n", kind);
    }

    let rows = records.iter().map(|r| DebtRow {
        id: r.id.to_string(),
        counterparty: truncate(&r.counterparty, 24),
        issued: format_date(r.issue_date, date_format),
        due: r
            .due_date
            .map(|d| format_date(d, date_format))
            .unwrap_or_else(|| "-".into()),
        principal: r.amount.format_with_symbol(symbol),
        outstanding: r.outstanding().format_with_symbol(symbol),
        status: status_label(r, today).to_string(),
    });

    format!(
        "{}\n{}\n{} open, {} outstanding of {} principal ({} repaid)\n",
        heading(kind),
        render_table(rows),
        totals.open_count,
        totals.outstanding.format_with_symbol(symbol),
        totals.principal.format_with_symbol(symbol),
        totals.repaid.format_with_symbol(symbol),
    )
}

/// Format one record with its adjustment ledger
pub fn format_debt_details(
    record: &DebtRecord,
    today: NaiveDate,
    symbol: &str,
    date_format: &str,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}: {}\n", heading(record.kind), record.id));
    output.push_str(&format!("Counterparty: {}\n", record.counterparty));
    output.push_str(&format!(
        "Issued:       {}\n",
        format_date(record.issue_date, date_format)
    ));
    if let Some(due) = record.due_date {
        output.push_str(&format!("Due:          {}\n", format_date(due, date_format)));
    }
    output.push_str(&format!("Principal:    {}\n", record.amount.format_with_symbol(symbol)));
    output.push_str(&format!("Repaid:       {}\n", record.repaid().format_with_symbol(symbol)));
    output.push_str(&format!(
        "Outstanding:  {}\n",
        record.outstanding().format_with_symbol(symbol)
    ));
    output.push_str(&format!("Status:       {}\n", status_label(record, today)));
    if let Some(comment) = &record.comment {
        output.push_str(&format!("Comment:      {}\n", comment));
    }

    if record.entries.is_empty() {
        output.push_str("\nNo adjustments recorded.\n");
    } else {
        let rows = record.entries.iter().map(|e| EntryRow {
            id: e.id.to_string(),
            date: format_date(e.date, date_format),
            kind: e.kind.to_string(),
            amount: e.signed_amount().format_with_symbol(symbol),
            comment: truncate(e.comment.as_deref().unwrap_or(""), 30),
        });
        output.push('\n');
        output.push_str(&render_table(rows));
        output.push('\n');
    }

    output
}
