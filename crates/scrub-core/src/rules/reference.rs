//! Reference-map normalization for `region` and `category`.

use anyhow::Result;
use std::collections::BTreeMap;

use scrub_model::config::ReferenceConfig;
use scrub_model::{RowId, Table, Value};
use tracing::info;

use crate::lineage::LineageWriter;

/// Normalize one column against its reference map.
///
/// The lookup key is the lower-cased, trimmed raw value; a miss keeps the
/// original value, so the map never nulls out data it does not recognize.
/// Every changed value emits lineage under `rule`.
fn normalize_column(
    table: &mut Table,
    column: &str,
    map: &BTreeMap<String, String>,
    rule: &str,
    lineage: &mut LineageWriter,
) -> Result<()> {
    if !table.has_column(column) {
        return Ok(());
    }
    for row in &mut table.rows {
        let Some(text) = row.get(column).as_str() else {
            continue;
        };
        let key = text.trim().to_lowercase();
        let Some(canonical) = map.get(&key) else {
            continue;
        };
        let old = row.get(column).clone();
        let new = Value::Text(canonical.clone());
        if !old.same(&new) {
            let row_id = row.id.unwrap_or(RowId::HEADER);
            lineage.record(row_id, column, &old, &new, rule)?;
            row.set(column.to_string(), new);
        }
    }
    Ok(())
}

/// Normalize `region` and `category` values to their canonical labels.
pub fn normalize_with_reference(
    mut table: Table,
    cfg: &ReferenceConfig,
    lineage: &mut LineageWriter,
) -> Result<Table> {
    info!("Applying reference-based normalization for region and category");
    normalize_column(
        &mut table,
        "region",
        &cfg.region_map,
        "reference_region_normalization",
        lineage,
    )?;
    normalize_column(
        &mut table,
        "category",
        &cfg.category_map,
        "reference_category_normalization",
        lineage,
    )?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrub_model::Row;

    fn cfg() -> ReferenceConfig {
        ReferenceConfig {
            enabled: true,
            region_map: [
                ("north".to_string(), "NORTH".to_string()),
                ("nort".to_string(), "NORTH".to_string()),
            ]
            .into(),
            category_map: [("electronic".to_string(), "ELECTRONICS".to_string())].into(),
            log: true,
        }
    }

    fn writer() -> (tempfile::TempDir, LineageWriter) {
        let dir = tempfile::tempdir().expect("tempdir");
        let writer = LineageWriter::create(dir.path().join("lineage.csv"), 100).expect("create");
        (dir, writer)
    }

    #[test]
    fn maps_noisy_spellings_to_canonical() {
        let mut table = Table::new(vec!["region".into(), "category".into()]);
        let mut row = Row::new();
        row.set("region", Value::Text(" Nort ".into()));
        row.set("category", Value::Text("electronic".into()));
        table.push_row(row);
        table.assign_row_ids();

        let (_dir, mut lineage) = writer();
        let table = normalize_with_reference(table, &cfg(), &mut lineage).expect("normalize");
        assert_eq!(table.rows[0].get("region"), &Value::Text("NORTH".into()));
        assert_eq!(
            table.rows[0].get("category"),
            &Value::Text("ELECTRONICS".into())
        );
        assert_eq!(lineage.total_recorded(), 2);
    }

    #[test]
    fn unmapped_values_pass_through() {
        let mut table = Table::new(vec!["region".into()]);
        let mut row = Row::new();
        row.set("region", Value::Text("Midlands".into()));
        table.push_row(row);
        table.assign_row_ids();

        let (_dir, mut lineage) = writer();
        let table = normalize_with_reference(table, &cfg(), &mut lineage).expect("normalize");
        assert_eq!(table.rows[0].get("region"), &Value::Text("Midlands".into()));
        assert_eq!(lineage.total_recorded(), 0);
    }

    #[test]
    fn already_canonical_value_emits_no_lineage() {
        let mut table = Table::new(vec!["region".into()]);
        let mut row = Row::new();
        row.set("region", Value::Text("NORTH".into()));
        table.push_row(row);
        table.assign_row_ids();

        let (_dir, mut lineage) = writer();
        let table = normalize_with_reference(table, &cfg(), &mut lineage).expect("normalize");
        assert_eq!(table.rows[0].get("region"), &Value::Text("NORTH".into()));
        assert_eq!(lineage.total_recorded(), 0);
    }
}
