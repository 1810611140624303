//! Output formatting and persistence for computed views.
//!
//! Supports pretty-printed JSON on stdout, JSON files, and CSV export
//! of the tabular views.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use std::fs;
use std::path::Path;

/// Prints a computed view as pretty-printed JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes a computed view as pretty-printed JSON to `path`.
pub fn write_json(path: &str, value: &impl Serialize) -> Result<()> {
    debug!(path, "Writing JSON output");
    fs::write(path, serde_json::to_vec_pretty(value)?)?;
    Ok(())
}

/// Writes serializable rows as a CSV file with a header row.
///
/// Only the flat views (ranking, share) have a CSV form; the series
/// view is JSON-only.
pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing CSV output");

    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Returns true when `path` asks for CSV export.
pub fn is_csv(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}
