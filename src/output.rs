//! Output persistence and JSON printing.

use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::table::Table;

/// Writes the enriched table to its CSV destination, creating parent
/// directories as needed.
pub fn write_enriched(path: &str, table: &Table) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    table.write_path(path)?;
    info!(path, rows = table.len(), "enriched table written");
    Ok(())
}

/// Serializes a query result as pretty JSON onto the given writer.
pub fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Prints a query result as pretty JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    write_json(&mut std::io::stdout().lock(), value)
}
