//! Reports for the home budget
//!
//! Aggregations over stored transactions: totals by category, the period
//! balance, and progress on budget plans and savings goals.

pub mod balance;
pub mod category_summary;
pub mod period;
pub mod plan_progress;

pub use balance::BalanceReport;
pub use category_summary::{CategorySummary, CategoryTotal};
pub use period::Period;
pub use plan_progress::{PlanProgress, PlanProgressReport, PlanStatus};
