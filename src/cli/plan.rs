//! Budget plan and savings goal CLI commands

use chrono::{Local, NaiveDate};
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_plan_details, format_plan_progress};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Money, PlanKind};
use crate::reports::{Period, PlanProgress, PlanProgressReport};
use crate::services::{CreatePlanInput, PlanService, UpdatePlanInput};
use crate::storage::Storage;

use super::args::{comment_change, parse_date, parse_money, require_changes};

#[derive(Subcommand, Debug)]
pub enum PlanCommands {
    /// Create a spending plan or savings goal
    Add {
        name: String,
        /// Target amount
        #[arg(value_parser = parse_money)]
        target: Money,
        /// spending or savings
        #[arg(short, long, default_value = "spending")]
        kind: PlanKind,
        /// Limit a spending plan to one expense category
        #[arg(short, long)]
        category: Option<String>,
        /// Window as a period (month, 2025-03, 2025-01-01..2025-06-30)
        #[arg(short, long, conflicts_with_all = ["start", "end"])]
        period: Option<String>,
        /// Window start (default today)
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,
        /// Window end
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Show every plan with its progress
    List {
        #[arg(short, long)]
        kind: Option<PlanKind>,
    },

    Show { id: String },

    /// Edit a plan
    Edit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long, value_parser = parse_money)]
        target: Option<Money>,
        #[arg(short, long)]
        category: Option<String>,
        /// Widen a spending plan to all expenses
        #[arg(long, conflicts_with = "category")]
        all_categories: bool,
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,
        #[arg(long)]
        comment: Option<String>,
        #[arg(long, conflicts_with = "comment")]
        clear_comment: bool,
    },

    /// Put money toward a savings goal
    Contribute {
        id: String,
        #[arg(value_parser = parse_money)]
        amount: Money,
    },

    /// Take money back out of a savings goal
    Withdraw {
        id: String,
        #[arg(value_parser = parse_money)]
        amount: Money,
    },

    Delete { id: String },
}

/// Handle a plan command
pub fn handle_plan_command(storage: &Storage, settings: &Settings, cmd: PlanCommands) -> BudgetResult<()> {
    let service = PlanService::new(storage);
    let symbol = settings.currency_symbol.as_str();
    let date_format = settings.date_format.as_str();
    let today = Local::now().date_naive();

    match cmd {
        PlanCommands::Add {
            name,
            target,
            kind,
            category,
            period,
            start,
            end,
            comment,
        } => {
            let (start, end) = match period {
                Some(period) => Period::parse(&period, today)?
                    .bounds(settings.week_start())
                    .ok_or_else(|| {
                        BudgetError::Validation(format!("Period '{}' has no fixed window", period))
                    })?,
                None => {
                    let end = end.ok_or_else(|| {
                        BudgetError::Validation("Give either --period or --end".into())
                    })?;
                    (start.unwrap_or(today), end)
                }
            };

            let plan = service.create(CreatePlanInput {
                name,
                kind,
                category,
                target,
                start,
                end,
                comment,
            })?;
            println!(
                "Created {} plan {}: {} ({} .. {})",
                plan.kind,
                plan.id,
                plan.name,
                plan.start,
                plan.end
            );
        }

        PlanCommands::List { kind } => {
            let mut report = PlanProgressReport::generate(storage, today)?;
            if let Some(kind) = kind {
                report.plans.retain(|p| p.plan.kind == kind);
            }
            print!("{}", format_plan_progress(&report, symbol, date_format));
        }

        PlanCommands::Show { id } => {
            let plan = service.find(&id)?;
            let expenses = storage.expenses.get_all()?;
            let progress = PlanProgress::compute(&plan, &expenses, today);
            print!("{}", format_plan_details(&progress, symbol, date_format));
        }

        PlanCommands::Edit {
            id,
            name,
            target,
            category,
            all_categories,
            start,
            end,
            comment,
            clear_comment,
        } => {
            let plan = service.find(&id)?;
            let category = if all_categories {
                Some(None)
            } else {
                category.map(Some)
            };
            let comment = comment_change(comment, clear_comment);
            require_changes(
                name.is_some()
                    || target.is_some()
                    || category.is_some()
                    || start.is_some()
                    || end.is_some()
                    || comment.is_some(),
                "--name, --target, --category, --start, --end or --comment",
            )?;

            let updated = service.update(
                plan.id,
                UpdatePlanInput {
                    name,
                    category,
                    target,
                    start,
                    end,
                    comment,
                },
            )?;
            println!("Updated plan {}: {}", updated.id, updated.name);
        }

        PlanCommands::Contribute { id, amount } => {
            let plan = service.find(&id)?;
            let updated = service.contribute(plan.id, amount.abs())?;
            print_saved(&updated.name, updated.saved, updated.target, symbol);
        }

        PlanCommands::Withdraw { id, amount } => {
            let plan = service.find(&id)?;
            let updated = service.contribute(plan.id, -amount.abs())?;
            print_saved(&updated.name, updated.saved, updated.target, symbol);
        }

        PlanCommands::Delete { id } => {
            let plan = service.find(&id)?;
            let deleted = service.delete(plan.id)?;
            println!("Deleted plan {} ({})", deleted.id, deleted.name);
        }
    }

    Ok(())
}

fn print_saved(name: &str, saved: Money, target: Money, symbol: &str) {
    println!(
        "{}: {} of {} saved",
        name,
        saved.format_with_symbol(symbol),
        target.format_with_symbol(symbol)
    );
}
