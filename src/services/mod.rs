//! Service layer for the home budget
//!
//! The service layer provides business rules on top of the storage layer:
//! validation, sign normalization, ledger updates, auditing and change
//! notification.

pub mod category;
pub mod debt;
pub mod expense;
pub mod filter;
pub mod income;
pub mod plan;
pub mod reminder;
pub mod task;

pub use category::CategoryService;
pub use debt::{CreateDebtInput, DebtService, DebtTotals, UpdateDebtInput};
pub use expense::{CreateExpenseInput, ExpenseService, UpdateExpenseInput};
pub use filter::TransactionFilter;
pub use income::{CreateIncomeInput, IncomeService, UpdateIncomeInput};
pub use plan::{CreatePlanInput, PlanService, UpdatePlanInput};
pub use reminder::{ReminderScheduler, ScheduledReminder};
pub use task::{CreateTaskInput, TaskFilter, TaskService, UpdateTaskInput};
