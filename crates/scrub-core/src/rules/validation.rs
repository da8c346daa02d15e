//! Read-only validation checks.
//!
//! This rule never mutates data and never emits lineage; violations are
//! counted and surfaced as warnings only.

use std::collections::BTreeMap;

use scrub_model::config::ValidationConfig;
use scrub_model::{Table, Value};
use tracing::{info, warn};

/// Violation counts keyed by check name. Checks with zero findings are
/// omitted.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct ValidationReport {
    pub findings: BTreeMap<String, usize>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    fn note(&mut self, check: &str, count: usize) {
        if count > 0 {
            self.findings.insert(check.to_string(), count);
        }
    }
}

fn count_rows(table: &Table, column: &str, predicate: impl Fn(&Value) -> bool) -> usize {
    if !table.has_column(column) {
        return 0;
    }
    table
        .rows
        .iter()
        .filter(|row| predicate(row.get(column)))
        .count()
}

fn not_uppercase(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|text| text != text.to_uppercase())
}

/// Run the configured checks and log each finding as a warning.
pub fn run_validation(table: &Table, cfg: &ValidationConfig) -> ValidationReport {
    info!("Running validation rules (log-only)");
    let mut report = ValidationReport::default();

    if cfg.no_double_spaces_in_store {
        let count = count_rows(table, "store", |value| {
            value.as_str().is_some_and(|text| text.contains("  "))
        });
        report.note("no_double_spaces_in_store", count);
    }
    if cfg.region_not_null {
        report.note(
            "region_not_null",
            count_rows(table, "region", Value::is_missing),
        );
    }
    if cfg.category_not_null {
        report.note(
            "category_not_null",
            count_rows(table, "category", Value::is_missing),
        );
    }
    if cfg.sale_date_not_null {
        report.note(
            "sale_date_not_null",
            count_rows(table, "sale_date", Value::is_missing),
        );
    }
    if cfg.region_uppercase {
        report.note(
            "region_uppercase",
            count_rows(table, "region", not_uppercase),
        );
    }
    if cfg.category_uppercase {
        report.note(
            "category_uppercase",
            count_rows(table, "category", not_uppercase),
        );
    }

    for (check, count) in &report.findings {
        warn!(check, count, "Validation anomaly");
    }
    report
}
