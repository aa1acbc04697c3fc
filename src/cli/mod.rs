//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod args;
pub mod audit;
pub mod backup;
pub mod category;
pub mod debt;
pub mod export;
pub mod plan;
pub mod report;
pub mod task;
pub mod transaction;

pub use audit::handle_audit_command;
pub use backup::{handle_backup_command, BackupCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use debt::{handle_debt_command, DebtCommands};
pub use export::{handle_export_command, ExportCommands};
pub use plan::{handle_plan_command, PlanCommands};
pub use report::{handle_report_command, ReportCommands};
pub use task::{handle_task_command, TaskCommands};
pub use transaction::{handle_expense_command, handle_income_command, CashFlowCommands};
