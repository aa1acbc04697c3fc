use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use homebudget::cli::{
    handle_audit_command, handle_backup_command, handle_category_command, handle_debt_command,
    handle_expense_command, handle_export_command, handle_income_command, handle_plan_command,
    handle_report_command, handle_task_command, BackupCommands, CashFlowCommands,
    CategoryCommands, DebtCommands, ExportCommands, PlanCommands, ReportCommands, TaskCommands,
};
use homebudget::config::{paths::BudgetPaths, settings::Settings};
use homebudget::models::DebtKind;
use homebudget::storage::init::{initialize_storage, needs_initialization};
use homebudget::storage::Storage;

#[derive(Parser)]
#[command(
    name = "hbudget",
    version,
    about = "Home budget tracker: expenses, incomes, loans, plans and tasks",
    long_about = "hbudget records expenses and incomes by category, tracks money lent \
                  and borrowed, measures budget plans and savings goals, and keeps \
                  a task list with reminders. Everything is stored locally."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize storage and seed the standard categories
    Init,

    /// Show current configuration and paths
    Config,

    /// Record and browse expenses
    #[command(subcommand, alias = "exp")]
    Expense(CashFlowCommands),

    /// Record and browse incomes
    #[command(subcommand, alias = "inc")]
    Income(CashFlowCommands),

    /// Money lent to others
    #[command(subcommand)]
    Loan(DebtCommands),

    /// Money borrowed from others
    #[command(subcommand)]
    Borrowed(DebtCommands),

    /// Tasks and reminders
    #[command(subcommand)]
    Task(TaskCommands),

    /// Budget plans and savings goals
    #[command(subcommand)]
    Plan(PlanCommands),

    /// Expense and income categories
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Summaries and balances
    #[command(subcommand)]
    Report(ReportCommands),

    /// Backup management
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Export data as CSV, JSON or YAML
    #[command(subcommand)]
    Export(ExportCommands),

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    let paths = BudgetPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let Some(command) = cli.command else {
        println!("hbudget - home budget tracker");
        println!();
        println!("Run 'hbudget --help' for usage information.");
        println!("Run 'hbudget init' to set up storage.");
        return Ok(());
    };

    if !matches!(command, Commands::Init | Commands::Config) && needs_initialization(&storage)? {
        let added = initialize_storage(&storage)?;
        info!(added, "storage initialized on first use");
    }

    match command {
        Commands::Init => {
            println!("Initializing home budget at: {}", paths.base_dir().display());
            let added = initialize_storage(&storage)?;
            if !paths.settings_file().exists() {
                settings.save(&paths)?;
            }
            if added > 0 {
                println!("Added {} standard categories.", added);
            } else {
                println!("Already initialized.");
            }
            println!("Run 'hbudget category list' to see all categories.");
        }
        Commands::Config => {
            println!("Home budget configuration");
            println!("=========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data file:        {}", paths.preferences_file().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Date format:      {}", settings.date_format);
            println!("  Week starts on:   {}", settings.week_start());
            println!("  Default reminder: {}", settings.default_reminder);
            println!(
                "  Backup retention: {} daily, {} monthly",
                settings.backup_retention.daily_count, settings.backup_retention.monthly_count
            );
        }
        Commands::Expense(cmd) => handle_expense_command(&storage, &settings, cmd)?,
        Commands::Income(cmd) => handle_income_command(&storage, &settings, cmd)?,
        Commands::Loan(cmd) => handle_debt_command(&storage, &settings, DebtKind::Loan, cmd)?,
        Commands::Borrowed(cmd) => {
            handle_debt_command(&storage, &settings, DebtKind::Borrowed, cmd)?
        }
        Commands::Task(cmd) => handle_task_command(&storage, &settings, cmd)?,
        Commands::Plan(cmd) => handle_plan_command(&storage, &settings, cmd)?,
        Commands::Category(cmd) => handle_category_command(&storage, cmd)?,
        Commands::Report(cmd) => handle_report_command(&storage, &settings, cmd)?,
        Commands::Backup(cmd) => handle_backup_command(&storage, &settings, cmd)?,
        Commands::Export(cmd) => handle_export_command(&storage, &settings, cmd)?,
        Commands::Audit { count } => handle_audit_command(&storage, count)?,
    }

    Ok(())
}
