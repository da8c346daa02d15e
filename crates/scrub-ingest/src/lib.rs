//! Input/output adapters.
//!
//! The pipeline's storage formats are deliberately boring: CSV for datasets
//! and pretty JSON for report snapshots. All typing happens in the engine, so
//! ingest maps every non-empty cell to `Text` and every empty cell to
//! `Missing`, and output renders values through their display form.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use scrub_model::{Row, Table, Value};
use serde::Serialize;
use tracing::info;

/// Canonicalize a raw CSV header: strip BOM, trim, lowercase, spaces to
/// underscores. `" Store Name "` becomes `store_name`.
fn canonical_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

/// Read a CSV file into a [`Table`].
///
/// Headers are canonicalized; cells enter as trimmed `Text` or `Missing`.
/// Short records are padded with missing cells and fully empty rows are
/// kept, since dropping them is a pipeline decision, not an ingest one.
pub fn read_csv_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open input: {}", path.display()))?;
    let columns: Vec<String> = reader
        .headers()
        .with_context(|| format!("read header: {}", path.display()))?
        .iter()
        .map(canonical_header)
        .collect();

    let mut table = Table::new(columns.clone());
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let mut row = Row::new();
        for (index, column) in columns.iter().enumerate() {
            let cell = record.get(index).map_or(Value::Missing, Value::from_raw);
            row.set(column.clone(), cell);
        }
        table.push_row(row);
    }
    info!(
        path = %path.display(),
        rows = table.height(),
        columns = table.columns.len(),
        "Read dataset"
    );
    Ok(table)
}

/// Write a [`Table`] as CSV, creating parent directories. Missing cells
/// render as empty fields.
pub fn write_csv_table(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("create output: {}", path.display()))?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        let record: Vec<String> = table
            .columns
            .iter()
            .map(|column| row.get(column).to_string())
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = table.height(), "Wrote dataset");
    Ok(())
}

/// Write a report snapshot as pretty JSON, creating parent directories.
pub fn save_profile_report<T: Serialize>(report: &T, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    let json = serde_json::to_string_pretty(report).context("serialize report")?;
    fs::write(path, json).with_context(|| format!("write report: {}", path.display()))?;
    info!(path = %path.display(), "Wrote profile report");
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }
    Ok(())
}
