//! Feature derivation: total sales and date parts.

use anyhow::Result;
use chrono::Datelike;
use scrub_model::config::FeatureEngineeringConfig;
use scrub_model::{Table, Value};
use tracing::info;

/// Derive `total_sales` and configured date parts.
///
/// `total_sales` is purely additive: when the column is absent it is computed
/// for every row with numeric operands; when it already exists only missing
/// cells are filled. Existing values are never overwritten. Lineage-silent.
pub fn derive_features(mut table: Table, cfg: &FeatureEngineeringConfig) -> Result<Table> {
    info!("Applying feature engineering");

    if cfg.compute_total_sales
        && table.has_column("quantity")
        && table.has_column("unit_price")
    {
        table.add_column("total_sales");
        let mut computed = 0usize;
        for row in &mut table.rows {
            if !row.get("total_sales").is_missing() {
                continue;
            }
            if let (Some(quantity), Some(unit_price)) =
                (row.get("quantity").as_f64(), row.get("unit_price").as_f64())
            {
                row.set("total_sales", Value::Float(quantity * unit_price));
                computed += 1;
            }
        }
        if cfg.log {
            info!(computed, "Computed total_sales = quantity * unit_price");
        }
    }

    if cfg.derive_date_parts && table.has_column("sale_date") {
        for part in &cfg.date_parts {
            match part.as_str() {
                "sale_year" | "sale_month" | "sale_quarter" | "weekday" => {
                    table.add_column(part.clone());
                }
                _ => continue,
            }
            for row in &mut table.rows {
                let Some(date) = row.get("sale_date").as_date() else {
                    row.set(part.clone(), Value::Missing);
                    continue;
                };
                let derived = match part.as_str() {
                    "sale_year" => Value::Int(i64::from(date.year())),
                    "sale_month" => Value::Int(i64::from(date.month())),
                    "sale_quarter" => Value::Int(i64::from((date.month() - 1) / 3 + 1)),
                    "weekday" => Value::Text(date.format("%A").to_string()),
                    _ => unreachable!(),
                };
                row.set(part.clone(), derived);
            }
        }
        if cfg.log {
            info!(parts = cfg.date_parts.join(", "), "Derived date parts");
        }
    }

    Ok(table)
}
