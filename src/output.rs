//! Output formatting and export of chart data.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

use crate::observation::{ExportRow, ObservationSummary};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes export rows as CSV, header first, to any writer.
pub fn write_rows<W: Write>(writer: W, rows: &[ExportRow]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the observation export for `summary` to `path`, replacing any
/// existing file. Returns the number of data rows written.
pub fn write_export(path: &str, summary: &ObservationSummary) -> Result<usize> {
    let rows = summary.export_rows();
    debug!(path, rows = rows.len(), "Writing CSV export");

    let file = File::create(path)?;
    write_rows(file, &rows)?;

    Ok(rows.len())
}
