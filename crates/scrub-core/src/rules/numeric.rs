//! Numeric cleaning: currency symbols, thousands separators, float parsing.

use anyhow::Result;
use scrub_model::config::NumericCleaningConfig;
use scrub_model::{RowId, Table, Value};
use tracing::info;

use crate::lineage::LineageWriter;

/// Parse a raw cell into a float after stripping configured noise.
///
/// Currency symbols are stripped only for designated currency columns;
/// thousands-separator commas are stripped everywhere. Unparsable input
/// becomes `Missing`.
fn clean_value(value: &Value, symbols: &[String], is_currency: bool) -> Value {
    match value {
        Value::Int(_) | Value::Float(_) => value.clone(),
        Value::Text(raw) => {
            let mut text = raw.clone();
            if is_currency {
                for symbol in symbols {
                    text = text.replace(symbol.as_str(), "");
                }
            }
            text = text.replace(',', "");
            match text.trim().parse::<f64>() {
                Ok(parsed) => Value::Float(parsed),
                Err(_) => Value::Missing,
            }
        }
        _ => Value::Missing,
    }
}

/// Clean configured numeric columns, emitting lineage for every changed value
/// under the `numeric_cleaning_currency` rule.
pub fn clean_numeric_values(
    mut table: Table,
    cfg: &NumericCleaningConfig,
    lineage: &mut LineageWriter,
) -> Result<Table> {
    info!("Applying numeric cleaning");
    for column in &cfg.numeric_columns {
        if !table.has_column(column) {
            continue;
        }
        let is_currency = cfg.currency_columns.iter().any(|c| c == column);
        let mut changed = 0usize;
        for row in &mut table.rows {
            let old = row.get(column).clone();
            let new = clean_value(&old, &cfg.currency_symbols, is_currency);
            if !old.same(&new) {
                if cfg.log {
                    let row_id = row.id.unwrap_or(RowId::HEADER);
                    lineage.record(row_id, column, &old, &new, "numeric_cleaning_currency")?;
                }
                changed += 1;
            }
            row.set(column.clone(), new);
        }
        if cfg.log {
            info!(column, changed, "Applied numeric cleaning");
        }
    }
    Ok(table)
}
