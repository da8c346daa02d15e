//! Date parsing.

use anyhow::Result;
use chrono::NaiveDate;
use scrub_model::config::DateParsingConfig;
use scrub_model::{Table, Value};
use tracing::info;

/// Formats the raw feeds actually contain.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%b/%Y", "%Y/%m/%d"];

/// Try each accepted format in order.
pub fn parse_date_value(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Parse configured columns to dates; unparsable values become missing.
///
/// Lineage-silent: only the before/after missing counts are logged.
pub fn parse_dates(mut table: Table, cfg: &DateParsingConfig) -> Result<Table> {
    info!("Applying date parsing");
    for column in &cfg.columns {
        if !table.has_column(column) {
            continue;
        }
        let missing_before = table
            .rows
            .iter()
            .filter(|row| row.get(column).is_missing())
            .count();
        for row in &mut table.rows {
            let parsed = match row.get(column) {
                Value::Date(d) => Value::Date(*d),
                Value::Text(raw) => parse_date_value(raw).map_or(Value::Missing, Value::Date),
                _ => Value::Missing,
            };
            row.set(column.clone(), parsed);
        }
        if cfg.log {
            let missing_after = table
                .rows
                .iter()
                .filter(|row| row.get(column).is_missing())
                .count();
            info!(column, missing_before, missing_after, "Parsed date column");
        }
    }
    Ok(table)
}
