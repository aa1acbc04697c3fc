//! Expense and income CLI commands
//!
//! Both ledgers take the same subcommands; only the service behind them
//! differs.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format::format_date;
use crate::display::{format_cash_flow_details, format_cash_flow_register};
use crate::error::BudgetResult;
use crate::models::Money;
use crate::services::{
    CreateExpenseInput, CreateIncomeInput, ExpenseService, IncomeService, UpdateExpenseInput,
    UpdateIncomeInput,
};
use crate::storage::Storage;

use super::args::{build_filter, comment_change, parse_date, parse_money, require_changes};

/// Expense or income subcommands
#[derive(Subcommand, Debug)]
pub enum CashFlowCommands {
    /// Record a new entry
    Add {
        /// Amount (sign is ignored)
        #[arg(value_parser = parse_money, allow_hyphen_values = true)]
        amount: Money,
        /// Category name
        category: String,
        /// Date (YYYY-MM-DD, default today)
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        /// Free-text comment
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// List entries, newest first
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<String>,
        /// Period: month, last-month, 2025-03, 2025-01-01..2025-03-31, ...
        #[arg(short, long)]
        period: Option<String>,
        /// Number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one entry
    Show {
        /// Entry ID (full or short)
        id: String,
    },

    /// Edit an entry
    Edit {
        id: String,
        #[arg(short, long, value_parser = parse_money, allow_hyphen_values = true)]
        amount: Option<Money>,
        #[arg(long)]
        category: Option<String>,
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
        #[arg(short, long)]
        comment: Option<String>,
        /// Remove the comment
        #[arg(long, conflicts_with = "comment")]
        clear_comment: bool,
    },

    /// Delete an entry
    Delete { id: String },

    /// Print the total for a category or period
    Total {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        period: Option<String>,
    },
}

const EDIT_HINT: &str = "--amount, --category, --date, --comment or --clear-comment";

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CashFlowCommands,
) -> BudgetResult<()> {
    let service = ExpenseService::new(storage);
    let symbol = settings.currency_symbol.as_str();
    let date_format = settings.date_format.as_str();

    match cmd {
        CashFlowCommands::Add {
            amount,
            category,
            date,
            comment,
        } => {
            let expense = service.create(CreateExpenseInput {
                category,
                amount,
                date,
                comment,
            })?;
            println!(
                "Recorded expense {}: {} in {} on {}",
                expense.id,
                expense.amount.format_with_symbol(symbol),
                expense.category,
                format_date(expense.date, date_format)
            );
        }

        CashFlowCommands::List {
            category,
            period,
            limit,
        } => {
            let filter = build_filter(settings, category, period.as_deref(), limit)?;
            let expenses = service.list(&filter)?;
            print!("{}", format_cash_flow_register(&expenses, symbol, date_format));
        }

        CashFlowCommands::Show { id } => {
            let expense = service.find(&id)?;
            print!("{}", format_cash_flow_details(&expense, symbol, date_format));
        }

        CashFlowCommands::Edit {
            id,
            amount,
            category,
            date,
            comment,
            clear_comment,
        } => {
            let expense = service.find(&id)?;
            let comment = comment_change(comment, clear_comment);
            require_changes(
                amount.is_some() || category.is_some() || date.is_some() || comment.is_some(),
                EDIT_HINT,
            )?;

            let updated = service.update(
                expense.id,
                UpdateExpenseInput {
                    category,
                    amount,
                    date,
                    comment,
                },
            )?;
            println!("Updated expense {}", updated.id);
            print!("{}", format_cash_flow_details(&updated, symbol, date_format));
        }

        CashFlowCommands::Delete { id } => {
            let expense = service.find(&id)?;
            let deleted = service.delete(expense.id)?;
            println!(
                "Deleted expense {} ({} in {})",
                deleted.id,
                deleted.amount.format_with_symbol(symbol),
                deleted.category
            );
        }

        CashFlowCommands::Total { category, period } => {
            let filter = build_filter(settings, category, period.as_deref(), None)?;
            println!("{}", service.total(&filter)?.format_with_symbol(symbol));
        }
    }

    Ok(())
}

/// Handle an income command
pub fn handle_income_command(
    storage: &Storage,
    settings: &Settings,
    cmd: CashFlowCommands,
) -> BudgetResult<()> {
    let service = IncomeService::new(storage);
    let symbol = settings.currency_symbol.as_str();
    let date_format = settings.date_format.as_str();

    match cmd {
        CashFlowCommands::Add {
            amount,
            category,
            date,
            comment,
        } => {
            let income = service.create(CreateIncomeInput {
                category,
                amount,
                date,
                comment,
            })?;
            println!(
                "Recorded income {}: {} in {} on {}",
                income.id,
                income.amount.format_with_symbol(symbol),
                income.category,
                format_date(income.date, date_format)
            );
        }

        CashFlowCommands::List {
            category,
            period,
            limit,
        } => {
            let filter = build_filter(settings, category, period.as_deref(), limit)?;
            let incomes = service.list(&filter)?;
            print!("{}", format_cash_flow_register(&incomes, symbol, date_format));
        }

        CashFlowCommands::Show { id } => {
            let income = service.find(&id)?;
            print!("{}", format_cash_flow_details(&income, symbol, date_format));
        }

        CashFlowCommands::Edit {
            id,
            amount,
            category,
            date,
            comment,
            clear_comment,
        } => {
            let income = service.find(&id)?;
            let comment = comment_change(comment, clear_comment);
            require_changes(
                amount.is_some() || category.is_some() || date.is_some() || comment.is_some(),
                EDIT_HINT,
            )?;

            let updated = service.update(
                income.id,
                UpdateIncomeInput {
                    category,
                    amount,
                    date,
                    comment,
                },
            )?;
            println!("Updated income {}", updated.id);
            print!("{}", format_cash_flow_details(&updated, symbol, date_format));
        }

        CashFlowCommands::Delete { id } => {
            let income = service.find(&id)?;
            let deleted = service.delete(income.id)?;
            println!(
                "Deleted income {} ({} in {})",
                deleted.id,
                deleted.amount.format_with_symbol(symbol),
                deleted.category
            );
        }

        CashFlowCommands::Total { category, period } => {
            let filter = build_filter(settings, category, period.as_deref(), None)?;
            println!("{}", service.total(&filter)?.format_with_symbol(symbol));
        }
    }

    Ok(())
}
