//! Export module for the home budget
//!
//! Provides data export in multiple formats:
//! - CSV: transactions and loan/borrowed records (spreadsheet-compatible)
//! - JSON: machine-readable full export
//! - YAML: human-readable full export

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_debts_csv, export_transactions_csv};
pub use json::{export_full_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, parse_yaml_export};
