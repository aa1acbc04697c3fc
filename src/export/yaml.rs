//! YAML Export functionality
//!
//! Same content as the JSON export, in a human-readable form.

use std::io::Write;

use crate::error::{BudgetError, BudgetResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full database to YAML
pub fn export_full_yaml<W: Write>(storage: &Storage, mut writer: W) -> BudgetResult<()> {
    let export = FullExport::from_storage(storage)?;
    let export_err = |e: std::io::Error| BudgetError::Export(e.to_string());

    writeln!(writer, "# Home budget export").map_err(export_err)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| BudgetError::Export(e.to_string()))
}

/// Parse a YAML export back, checking it is consistent
pub fn parse_yaml_export(yaml_str: &str) -> BudgetResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| BudgetError::Export(e.to_string()))?;
    export.validate().map_err(BudgetError::Export)?;
    Ok(export)
}
