//! Core data models for the home budget
//!
//! Flat, serde-serializable records: expenses, incomes, loans and borrowed
//! money, tasks, budget plans, and the categories that label transactions.

pub mod category;
pub mod debt;
pub mod ids;
pub mod money;
pub mod plan;
pub mod task;
pub mod transaction;

pub use category::{name_key, same_name, Category, CategoryKind};
pub use debt::{DebtEntry, DebtEntryKind, DebtKind, DebtRecord};
pub use ids::{DebtEntryId, DebtId, ExpenseId, IncomeId, PlanId, TaskId};
pub use money::Money;
pub use plan::{BudgetPlan, PlanKind};
pub use task::{ReminderOffset, Task};
pub use transaction::{CashFlow, Expense, Income};
