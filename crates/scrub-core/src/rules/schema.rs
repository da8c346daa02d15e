//! Schema enforcement: per-column type casts.
//!
//! Casting is explicit attempt/result handling: an individual unparsable
//! value becomes missing, while a column-level failure (unknown target type)
//! is caught, logged as a warning, and leaves that column untouched. It is
//! never fatal to the run.

use anyhow::Result;
use scrub_model::config::SchemaConfig;
use scrub_model::{ScrubError, Table, Value};
use tracing::{info, warn};

use crate::rules::dates::parse_date_value;

fn cast_value(value: &Value, target: &str) -> Result<Value> {
    let cast = match target {
        "float" => match value {
            Value::Float(_) | Value::Missing => value.clone(),
            Value::Int(v) => Value::Float(*v as f64),
            Value::Text(raw) => raw
                .trim()
                .parse::<f64>()
                .map_or(Value::Missing, Value::Float),
            Value::Date(_) => Value::Missing,
        },
        "int" => match value {
            Value::Int(_) | Value::Missing => value.clone(),
            Value::Float(v) => Value::Int(v.trunc() as i64),
            Value::Text(raw) => {
                let trimmed = raw.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().map(|v| v.trunc() as i64))
                    .map_or(Value::Missing, Value::Int)
            }
            Value::Date(_) => Value::Missing,
        },
        "datetime" => match value {
            Value::Date(_) | Value::Missing => value.clone(),
            Value::Text(raw) => parse_date_value(raw).map_or(Value::Missing, Value::Date),
            _ => Value::Missing,
        },
        "string" | "str" => match value {
            Value::Missing => Value::Missing,
            other => Value::Text(other.to_string()),
        },
        other => {
            return Err(ScrubError::Config(format!("unknown schema type: {other}")).into());
        }
    };
    Ok(cast)
}

/// Cast each configured column to its target type.
pub fn enforce_schema(mut table: Table, cfg: &SchemaConfig) -> Result<Table> {
    info!("Enforcing schema");
    for (column, target) in &cfg.columns {
        if !table.has_column(column) {
            continue;
        }
        let cast: Result<Vec<Value>> = table
            .rows
            .iter()
            .map(|row| cast_value(row.get(column), target))
            .collect();
        match cast {
            Ok(values) => {
                for (row, value) in table.rows.iter_mut().zip(values) {
                    row.set(column.clone(), value);
                }
                if cfg.log {
                    info!(column, target, "Enforced schema for column");
                }
            }
            Err(error) => {
                warn!(column, target, %error, "Failed to enforce schema, column left unchanged");
            }
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use scrub_model::Row;
    use std::collections::BTreeMap;

    fn table_with(column: &str, values: Vec<Value>) -> Table {
        let mut table = Table::new(vec![column.to_string()]);
        for value in values {
            let mut row = Row::new();
            row.set(column, value);
            table.push_row(row);
        }
        table
    }

    fn schema(column: &str, target: &str) -> SchemaConfig {
        SchemaConfig {
            columns: BTreeMap::from([(column.to_string(), target.to_string())]),
            log: false,
        }
    }

    #[test]
    fn float_cast_nulls_unparsable_values() {
        let table = table_with(
            "quantity",
            vec![
                Value::Text("2".into()),
                Value::Text("FREE".into()),
                Value::Int(3),
            ],
        );
        let table = enforce_schema(table, &schema("quantity", "float")).expect("cast");
        assert_eq!(table.rows[0].get("quantity"), &Value::Float(2.0));
        assert!(table.rows[1].get("quantity").is_missing());
        assert_eq!(table.rows[2].get("quantity"), &Value::Float(3.0));
    }

    #[test]
    fn int_cast_truncates_floats() {
        let table = table_with("quantity", vec![Value::Float(2.9)]);
        let table = enforce_schema(table, &schema("quantity", "int")).expect("cast");
        assert_eq!(table.rows[0].get("quantity"), &Value::Int(2));
    }

    #[test]
    fn datetime_cast_uses_feed_formats() {
        let table = table_with("sale_date", vec![Value::Text("01/15/2024".into())]);
        let table = enforce_schema(table, &schema("sale_date", "datetime")).expect("cast");
        assert_eq!(
            table.rows[0].get("sale_date"),
            &Value::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
    }

    #[test]
    fn unknown_type_leaves_column_unchanged() {
        let table = table_with("quantity", vec![Value::Text("2".into())]);
        let table = enforce_schema(table, &schema("quantity", "decimal128")).expect("cast");
        assert_eq!(table.rows[0].get("quantity"), &Value::Text("2".into()));
    }

    #[test]
    fn string_cast_renders_values_but_keeps_missing() {
        let table = table_with("notes", vec![Value::Float(1.5), Value::Missing]);
        let table = enforce_schema(table, &schema("notes", "string")).expect("cast");
        assert_eq!(table.rows[0].get("notes"), &Value::Text("1.5".into()));
        assert!(table.rows[1].get("notes").is_missing());
    }
}
