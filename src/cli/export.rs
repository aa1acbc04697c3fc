//! CLI commands for data export
//!
//! Every command writes to stdout unless an output file is given.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::export::{export_debts_csv, export_full_json, export_full_yaml, export_transactions_csv};
use crate::storage::Storage;

use super::args::build_filter;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Expenses and incomes (or loan records) as CSV
    Csv {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Export loans and borrowed records instead of transactions
        #[arg(long)]
        debts: bool,
        #[arg(short, long, conflicts_with = "debts")]
        category: Option<String>,
        #[arg(short, long, conflicts_with = "debts")]
        period: Option<String>,
    },

    /// Everything as one JSON document
    Json {
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Everything as YAML
    Yaml {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, settings: &Settings, cmd: ExportCommands) -> BudgetResult<()> {
    match cmd {
        ExportCommands::Csv {
            output,
            debts,
            category,
            period,
        } => {
            let mut writer = open_output(output.as_deref())?;
            let count = if debts {
                export_debts_csv(storage, &mut writer)?
            } else {
                let filter = build_filter(settings, category, period.as_deref(), None)?;
                export_transactions_csv(storage, &filter, &mut writer)?
            };
            finish(writer, output.as_deref(), &format!("{} row(s)", count))
        }

        ExportCommands::Json { output, pretty } => {
            let mut writer = open_output(output.as_deref())?;
            export_full_json(storage, &mut writer, pretty)?;
            if output.is_none() {
                writeln!(writer).map_err(|e| BudgetError::Io(e.to_string()))?;
            }
            finish(writer, output.as_deref(), "full database")
        }

        ExportCommands::Yaml { output } => {
            let mut writer = open_output(output.as_deref())?;
            export_full_yaml(storage, &mut writer)?;
            finish(writer, output.as_deref(), "full database")
        }
    }
}

fn open_output(output: Option<&Path>) -> BudgetResult<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                BudgetError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

fn finish(mut writer: Box<dyn Write>, output: Option<&Path>, what: &str) -> BudgetResult<()> {
    writer.flush().map_err(|e| BudgetError::Io(e.to_string()))?;
    if let Some(path) = output {
        println!("Exported {} to: {}", what, path.display());
    }
    Ok(())
}
