//! Display formatting for terminal output
//!
//! Provides utilities for formatting data models for terminal display,
//! including tables, progress bars, and status indicators.

pub mod category;
pub mod debt;
pub mod format;
pub mod plan;
pub mod task;
pub mod transaction;

pub use category::format_category_list;
pub use debt::{format_debt_details, format_debt_list};
pub use plan::{format_plan_details, format_plan_progress};
pub use task::{format_reminder_list, format_task_details, format_task_list};
pub use transaction::{format_cash_flow_details, format_cash_flow_register};
