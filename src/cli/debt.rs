//! Loan and borrowed-money CLI commands
//!
//! `loan` and `borrowed` share these subcommands; the kind decides which
//! collection they act on.

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_debt_details, format_debt_list};
use crate::error::BudgetResult;
use crate::models::{DebtEntryKind, DebtKind, Money};
use crate::services::{CreateDebtInput, DebtService, UpdateDebtInput};
use crate::storage::Storage;

use super::args::{comment_change, parse_date, parse_money, require_changes};

#[derive(Subcommand, Debug)]
pub enum DebtCommands {
    /// Record a new loan or borrowed amount
    Add {
        /// Who the money was lent to or borrowed from
        counterparty: String,
        #[arg(value_parser = parse_money)]
        amount: Money,
        /// Issue date (default today)
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Date the money should be settled by
        #[arg(long, value_parser = parse_date)]
        due: Option<NaiveDate>,
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// List records
    List {
        /// Include settled records
        #[arg(short, long)]
        all: bool,
        /// Only records past their due date
        #[arg(long, conflicts_with = "all")]
        overdue: bool,
    },

    /// Show a record with its adjustments
    Show { id: String },

    /// Edit a record
    Edit {
        id: String,
        #[arg(long)]
        counterparty: Option<String>,
        #[arg(short, long, value_parser = parse_money)]
        amount: Option<Money>,
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date)]
        due: Option<NaiveDate>,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
        #[arg(short, long)]
        comment: Option<String>,
        #[arg(long, conflicts_with = "comment")]
        clear_comment: bool,
    },

    /// Record a repayment
    Repay {
        id: String,
        #[arg(value_parser = parse_money)]
        amount: Money,
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Record an increase of the amount owed
    Increase {
        id: String,
        #[arg(value_parser = parse_money)]
        amount: Money,
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Remove an adjustment entry
    #[command(name = "remove-entry")]
    RemoveEntry {
        id: String,
        /// Entry ID (full or short)
        entry: String,
    },

    /// Delete a record and its adjustments
    Delete { id: String },
}

/// Handle a loan or borrowed command
pub fn handle_debt_command(
    storage: &Storage,
    settings: &Settings,
    kind: DebtKind,
    cmd: DebtCommands,
) -> BudgetResult<()> {
    let service = DebtService::new(storage);
    let symbol = settings.currency_symbol.as_str();
    let date_format = settings.date_format.as_str();
    let today = Local::now().date_naive();

    match cmd {
        DebtCommands::Add {
            counterparty,
            amount,
            date,
            due,
            comment,
        } => {
            let record = service.create(
                kind,
                CreateDebtInput {
                    counterparty,
                    amount,
                    issue_date: date,
                    due_date: due,
                    comment,
                },
            )?;
            println!(
                "Recorded {} {}: {} with {}",
                kind,
                record.id,
                record.amount.format_with_symbol(symbol),
                record.counterparty
            );
        }

        DebtCommands::List { all, overdue } => {
            let records = if overdue {
                service.overdue(kind, today)?
            } else {
                service.list(kind, all)?
            };
            let totals = service.totals(kind)?;
            print!("{}", format_debt_list(kind, &records, &totals, today, symbol, date_format));
        }

        DebtCommands::Show { id } => {
            let record = service.find(kind, &id)?;
            print!("{}", format_debt_details(&record, today, symbol, date_format));
        }

        DebtCommands::Edit {
            id,
            counterparty,
            amount,
            date,
            due,
            clear_due,
            comment,
            clear_comment,
        } => {
            let record = service.find(kind, &id)?;
            let due_date = if clear_due { Some(None) } else { due.map(Some) };
            let comment = comment_change(comment, clear_comment);
            require_changes(
                counterparty.is_some()
                    || amount.is_some()
                    || date.is_some()
                    || due_date.is_some()
                    || comment.is_some(),
                "--counterparty, --amount, --date, --due or --comment",
            )?;

            let updated = service.update(
                kind,
                record.id,
                UpdateDebtInput {
                    counterparty,
                    amount,
                    issue_date: date,
                    due_date,
                    comment,
                },
            )?;
            println!("Updated {} {}", kind, updated.id);
        }

        DebtCommands::Repay {
            id,
            amount,
            date,
            comment,
        } => {
            let record = service.find(kind, &id)?;
            let updated =
                service.add_entry(kind, record.id, DebtEntryKind::Repayment, amount, date, comment)?;
            print_balance(&updated.counterparty, updated.outstanding(), updated.closed, symbol);
        }

        DebtCommands::Increase {
            id,
            amount,
            date,
            comment,
        } => {
            let record = service.find(kind, &id)?;
            let updated =
                service.add_entry(kind, record.id, DebtEntryKind::Increase, amount, date, comment)?;
            print_balance(&updated.counterparty, updated.outstanding(), updated.closed, symbol);
        }

        DebtCommands::RemoveEntry { id, entry } => {
            let record = service.find(kind, &id)?;
            let entry_id = service.find_entry(&record, &entry)?;
            let updated = service.remove_entry(kind, record.id, entry_id)?;
            println!("Removed entry {}", entry_id);
            print_balance(&updated.counterparty, updated.outstanding(), updated.closed, symbol);
        }

        DebtCommands::Delete { id } => {
            let record = service.find(kind, &id)?;
            let deleted = service.delete(kind, record.id)?;
            println!("Deleted {} {} ({})", kind, deleted.id, deleted.counterparty);
        }
    }

    Ok(())
}

fn print_balance(counterparty: &str, outstanding: Money, closed: bool, symbol: &str) {
    if closed {
        println!("{} is settled.", counterparty);
    } else {
        println!(
            "Outstanding with {}: {}",
            counterparty,
            outstanding.format_with_symbol(symbol)
        );
    }
}
