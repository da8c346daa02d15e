//! Row-dropping rules: duplicates, empty rows, missing required fields.
//!
//! These rules only ever remove rows; each removal is attributable to the
//! row's original identifier through the lineage log when logging is enabled.

use std::collections::HashSet;

use anyhow::Result;
use scrub_model::config::{DropMissingConfig, DropRowsConfig};
use scrub_model::{Row, RowId, ScrubError, Table, Value};
use tracing::info;

use crate::lineage::LineageWriter;

/// Identity key for duplicate detection: every cell in column order, tagged
/// with its variant so `Text("2")` and `Int(2)` stay distinct. Row ids are
/// excluded by construction.
fn dedup_key(row: &Row, columns: &[String]) -> Vec<String> {
    columns
        .iter()
        .map(|column| {
            let value = row.get(column);
            format!("{}:{}", value.dtype_name(), value)
        })
        .collect()
}

fn row_id_of(row: &Row) -> RowId {
    row.id.unwrap_or(RowId::HEADER)
}

/// Drop duplicate rows, keeping the first occurrence.
pub fn drop_duplicate_rows(
    mut table: Table,
    cfg: &DropRowsConfig,
    lineage: &mut LineageWriter,
) -> Result<Table> {
    info!("Dropping duplicate rows");
    let columns = table.columns.clone();
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    let mut kept = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;
    for row in table.rows.drain(..) {
        if seen.insert(dedup_key(&row, &columns)) {
            kept.push(row);
        } else {
            if cfg.log {
                lineage.record(
                    row_id_of(&row),
                    "all",
                    &Value::Missing,
                    &Value::Text("N/A".into()),
                    "drop_duplicates",
                )?;
            }
            dropped += 1;
        }
    }
    table.rows = kept;
    if dropped > 0 {
        info!(dropped, "Dropped duplicate rows");
    } else {
        info!("No duplicate rows found");
    }
    Ok(table)
}

/// Drop rows whose every cell is missing.
pub fn drop_empty_rows(
    mut table: Table,
    cfg: &DropRowsConfig,
    lineage: &mut LineageWriter,
) -> Result<Table> {
    info!("Dropping empty rows");
    let columns = table.columns.clone();
    let mut kept = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;
    for row in table.rows.drain(..) {
        let empty = columns.iter().all(|column| row.get(column).is_missing());
        if empty {
            if cfg.log {
                lineage.record(
                    row_id_of(&row),
                    "all",
                    &Value::Text(String::new()),
                    &Value::Text("N/A".into()),
                    "drop_empty",
                )?;
            }
            dropped += 1;
        } else {
            kept.push(row);
        }
    }
    table.rows = kept;
    if dropped > 0 {
        info!(dropped, "Dropped empty rows");
    }
    Ok(table)
}

/// Drop rows with a missing value in any required column.
///
/// A required column that does not exist in the table is a structural
/// failure and aborts the run.
pub fn drop_rows_missing_required(
    mut table: Table,
    cfg: &DropMissingConfig,
    lineage: &mut LineageWriter,
) -> Result<Table> {
    if cfg.required_columns.is_empty() {
        return Ok(table);
    }
    for column in &cfg.required_columns {
        if !table.has_column(column) {
            return Err(ScrubError::MissingColumn(column.clone()).into());
        }
    }
    info!(
        required = cfg.required_columns.join(", "),
        "Dropping rows with missing required columns"
    );
    let column_label = cfg.required_columns.join(",");
    let mut kept = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;
    for row in table.rows.drain(..) {
        let incomplete = cfg
            .required_columns
            .iter()
            .any(|column| row.get(column).is_missing());
        if incomplete {
            if cfg.log {
                lineage.record(
                    row_id_of(&row),
                    &column_label,
                    &Value::Text(String::new()),
                    &Value::Text("N/A".into()),
                    "drop_missing_required",
                )?;
            }
            dropped += 1;
        } else {
            kept.push(row);
        }
    }
    table.rows = kept;
    if dropped > 0 {
        info!(dropped, "Dropped rows due to missing required fields");
    } else {
        info!("No rows with missing required fields");
    }
    Ok(table)
}
