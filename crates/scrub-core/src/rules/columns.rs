//! Column renaming.

use std::collections::BTreeMap;

use anyhow::Result;
use scrub_model::{RowId, Table, Value};
use tracing::info;

use crate::lineage::LineageWriter;

/// Apply a source -> target column-name mapping.
///
/// Each applied rename emits one header-level lineage record with the
/// `RowId::HEADER` sentinel: `column = "column_name"`, old/new value are the
/// old/new column names, `rule = "column_rename"`. Mappings whose source
/// column is absent or identical to the target are skipped.
pub fn rename_columns(
    mut table: Table,
    mapping: &BTreeMap<String, String>,
    lineage: &mut LineageWriter,
) -> Result<Table> {
    info!("Renaming columns");
    for (old_col, new_col) in mapping {
        if old_col != new_col && table.has_column(old_col) {
            lineage.record(
                RowId::HEADER,
                "column_name",
                &Value::Text(old_col.clone()),
                &Value::Text(new_col.clone()),
                "column_rename",
            )?;
            table.rename_column(old_col, new_col);
        }
    }
    Ok(table)
}
