//! Post-normalization curation.
//!
//! Curation applies business policy, not data-quality correction, so no
//! lineage is recorded here: a row excluded by curation was valid data that
//! simply falls outside the published business grain.

use std::collections::HashMap;

use anyhow::Result;
use scrub_model::config::CurationConfig;
use scrub_model::{Row, ScrubError, Table, Value};
use tracing::info;

fn business_validity(row: &Row) -> bool {
    row.get("quantity").as_f64().is_some_and(|q| q >= 1.0)
        && row.get("unit_price").as_f64().is_some_and(|p| p > 0.0)
        && row.get("total_sales").as_f64().is_some_and(|t| t >= 0.0)
}

fn in_allow_set(row: &Row, column: &str, allowed: &[String]) -> bool {
    row.get(column)
        .as_str()
        .is_some_and(|value| allowed.iter().any(|a| a == value))
}

/// Produce the final published dataset.
///
/// Projects to the configured columns, applies hard validity filters
/// (`quantity >= 1`, `unit_price > 0`, `total_sales >= 0`), enforces the
/// region/category allow-sets, deduplicates on the business key keeping the
/// last occurrence, and casts `quantity` to an integer.
pub fn curate(table: &Table, cfg: &CurationConfig) -> Result<Table> {
    info!("Preparing curated dataset");
    for column in &cfg.columns {
        if !table.has_column(column) {
            return Err(ScrubError::MissingColumn(column.clone()).into());
        }
    }
    let mut curated = table.select(&cfg.columns);

    curated.retain_rows(business_validity);
    curated.retain_rows(|row| {
        in_allow_set(row, "region", &cfg.reference.regions)
            && in_allow_set(row, "category", &cfg.reference.categories)
    });

    // Business-grain dedupe: keep the last occurrence per key.
    if !cfg.business_key.is_empty() {
        let mut last_for_key: HashMap<String, usize> = HashMap::new();
        for (index, row) in curated.rows.iter().enumerate() {
            let key = cfg
                .business_key
                .iter()
                .map(|column| row.get(column).to_string())
                .collect::<Vec<_>>()
                .join("\u{1f}");
            last_for_key.insert(key, index);
        }
        let mut index = 0usize;
        curated.retain_rows(|row| {
            let key = cfg
                .business_key
                .iter()
                .map(|column| row.get(column).to_string())
                .collect::<Vec<_>>()
                .join("\u{1f}");
            let keep = last_for_key[&key] == index;
            index += 1;
            keep
        });
    }

    if curated.has_column("quantity") {
        for row in &mut curated.rows {
            if let Some(quantity) = row.get("quantity").as_f64() {
                row.set("quantity", Value::Int(quantity.trunc() as i64));
            }
        }
    }

    info!(rows = curated.height(), "Curated rows");
    Ok(curated)
}
