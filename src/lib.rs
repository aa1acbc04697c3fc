//! homebudget - local home-budget tracking
//!
//! Records expenses and incomes by category, money lent and borrowed with
//! repayment sub-ledgers, budget plans and savings goals, and tasks with
//! reminders. Everything lives in one JSON preference store; every mutation
//! is audited and announced to in-process subscribers.
//!
//! # Architecture
//!
//! - `config`: paths and user settings
//! - `error`: custom error types
//! - `models`: core data records
//! - `storage`: preference store, repositories and change broadcast
//! - `services`: business logic layer
//! - `reports`: period aggregation
//! - `audit`: audit logging
//! - `backup`: snapshots and restore
//! - `export`: CSV, JSON and YAML export
//! - `display` and `cli`: terminal front end
//!
//! # Example
//!
//! ```rust,ignore
//! use homebudget::config::paths::BudgetPaths;
//! use homebudget::storage::Storage;
//!
//! let storage = Storage::new(BudgetPaths::new()?)?;
//! storage.load_all()?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
