//! Audit logging
//!
//! Records every create, update and delete with before/after values in an
//! append-only, line-delimited JSON log.
//!
//! - `AuditEntry`: one logged operation
//! - `AuditLogger`: appends entries to and reads them back from the log file
//! - `generate_diff`: one-line summary of top-level field changes

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
