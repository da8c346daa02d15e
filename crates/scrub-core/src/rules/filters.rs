//! Business-predicate row filtering with drop lineage.

use anyhow::Result;
use scrub_model::config::FiltersConfig;
use scrub_model::{Row, RowId, Table, Value};
use tracing::info;

use crate::lineage::LineageWriter;

/// A row passes when every enabled predicate holds. Non-numeric or missing
/// values fail their predicate, matching the dropping behavior of a numeric
/// comparison against an unparsed cell.
fn keep_row(row: &Row, cfg: &FiltersConfig, has_quantity: bool, has_total: bool) -> bool {
    if cfg.quantity_greater_than_zero
        && has_quantity
        && !row.get("quantity").as_f64().is_some_and(|q| q > 0.0)
    {
        return false;
    }
    if cfg.total_sales_non_negative
        && has_total
        && !row.get("total_sales").as_f64().is_some_and(|t| t >= 0.0)
    {
        return false;
    }
    true
}

/// Drop rows failing the configured predicates, one lineage entry per
/// dropped row under `rule = "filters"`.
pub fn apply_filters(
    mut table: Table,
    cfg: &FiltersConfig,
    lineage: &mut LineageWriter,
) -> Result<Table> {
    info!("Applying filtering rules");
    if !(cfg.quantity_greater_than_zero || cfg.total_sales_non_negative) {
        return Ok(table);
    }
    let has_quantity = table.has_column("quantity");
    let has_total = table.has_column("total_sales");

    let mut kept = Vec::with_capacity(table.rows.len());
    let mut dropped = 0usize;
    for row in table.rows.drain(..) {
        if keep_row(&row, cfg, has_quantity, has_total) {
            kept.push(row);
        } else {
            if cfg.log {
                lineage.record(
                    row.id.unwrap_or(RowId::HEADER),
                    "quantity, total_sales",
                    &Value::Text("zero or negative numbers".into()),
                    &Value::Text("N/A".into()),
                    "filters",
                )?;
            }
            dropped += 1;
        }
    }
    table.rows = kept;
    if dropped > 0 {
        info!(dropped, remaining = table.height(), "Applied filters");
    } else {
        info!(rows = table.height(), "Filters applied, no rows dropped");
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> (tempfile::TempDir, LineageWriter) {
        let dir = tempfile::tempdir().expect("tempdir");
        let writer = LineageWriter::create(dir.path().join("lineage.csv"), 100).expect("create");
        (dir, writer)
    }

    fn table_of(rows: &[(Value, Value)]) -> Table {
        let mut table = Table::new(vec!["quantity".into(), "total_sales".into()]);
        for (quantity, total) in rows {
            let mut row = Row::new();
            row.set("quantity", quantity.clone());
            row.set("total_sales", total.clone());
            table.push_row(row);
        }
        table.assign_row_ids();
        table
    }

    #[test]
    fn negative_quantity_is_dropped_with_filters_lineage() {
        let table = table_of(&[
            (Value::Float(2.0), Value::Float(21.0)),
            (Value::Float(-1.0), Value::Float(10.0)),
        ]);
        let (_dir, mut lineage) = writer();
        let cfg = FiltersConfig {
            quantity_greater_than_zero: true,
            total_sales_non_negative: false,
            log: true,
        };
        let table = apply_filters(table, &cfg, &mut lineage).expect("filter");
        assert_eq!(table.height(), 1);
        assert_eq!(table.rows[0].id, Some(RowId(0)));
        assert_eq!(lineage.total_recorded(), 1);
    }

    #[test]
    fn missing_values_fail_their_predicate() {
        let table = table_of(&[(Value::Missing, Value::Float(5.0))]);
        let (_dir, mut lineage) = writer();
        let cfg = FiltersConfig {
            quantity_greater_than_zero: true,
            total_sales_non_negative: true,
            log: false,
        };
        let table = apply_filters(table, &cfg, &mut lineage).expect("filter");
        assert_eq!(table.height(), 0);
    }

    #[test]
    fn disabled_predicates_keep_everything() {
        let table = table_of(&[(Value::Float(-5.0), Value::Float(-5.0))]);
        let (_dir, mut lineage) = writer();
        let cfg = FiltersConfig::default();
        let table = apply_filters(table, &cfg, &mut lineage).expect("filter");
        assert_eq!(table.height(), 1);
        assert_eq!(lineage.total_recorded(), 0);
    }
}
