//! Report CLI commands

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use chrono::Local;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_plan_progress;
use crate::error::{BudgetError, BudgetResult};
use crate::models::CategoryKind;
use crate::reports::{BalanceReport, CategorySummary, Period, PlanProgressReport};
use crate::storage::Storage;

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Totals per category for a period
    Summary {
        /// expense or income
        #[arg(short, long, default_value = "expense")]
        kind: CategoryKind,
        /// Period: day, week, month, year, all, last-month, 2025-03, ...
        #[arg(short, long, default_value = "month")]
        period: String,
        /// Show only the N largest categories
        #[arg(short, long)]
        top: Option<usize>,
        /// Write the summary as CSV to this file instead
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Income against expenses, plus loans and borrowed money
    Balance {
        #[arg(short, long, default_value = "month")]
        period: String,
    },

    /// Progress of every budget plan and savings goal
    Plans,
}

/// Handle a report command
pub fn handle_report_command(storage: &Storage, settings: &Settings, cmd: ReportCommands) -> BudgetResult<()> {
    let today = Local::now().date_naive();
    let week_start = settings.week_start();

    match cmd {
        ReportCommands::Summary {
            kind,
            period,
            top,
            csv,
        } => {
            let period = Period::parse(&period, today)?;
            let mut summary = CategorySummary::generate(storage, kind, period, week_start)?;
            if let Some(limit) = top {
                summary.rows = summary.top(limit).to_vec();
            }

            match csv {
                Some(path) => {
                    let file = File::create(&path).map_err(|e| {
                        BudgetError::Export(format!("Failed to create file {}: {}", path.display(), e))
                    })?;
                    summary.export_csv(BufWriter::new(file))?;
                    println!("Summary written to: {}", path.display());
                }
                None => print!("{}", summary.format_terminal()),
            }
        }

        ReportCommands::Balance { period } => {
            let period = Period::parse(&period, today)?;
            let report = BalanceReport::generate(storage, period, week_start)?;
            print!("{}", report.format_terminal(&settings.currency_symbol));
        }

        ReportCommands::Plans => {
            let report = PlanProgressReport::generate(storage, today)?;
            print!("{}", format_plan_progress(&report, &settings.currency_symbol, &settings.date_format));
        }
    }

    Ok(())
}
