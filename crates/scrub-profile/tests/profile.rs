//! Profiler integration tests built around the documented quality scenarios.

use chrono::NaiveDate;
use scrub_model::config::{OutliersConfig, ProfileConfig};
use scrub_model::{Row, Table, Value};
use scrub_profile::profile_table;

fn sales_table() -> Table {
    let mut table = Table::new(vec![
        "store".into(),
        "quantity".into(),
        "sale_date".into(),
    ]);
    for i in 0..4 {
        let mut row = Row::new();
        row.set("store", Value::Text(format!("Store {i}")));
        row.set("quantity", Value::Float(f64::from(i + 1)));
        row.set(
            "sale_date",
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, i as u32 + 1).unwrap()),
        );
        table.push_row(row);
    }
    table
}

#[test]
fn ten_percent_missing_scores_0_975() {
    // one column, ten rows, one missing cell, everything else pristine:
    // 0.25 * 0.9 + 0.25 + 0.25 + 0.25 = 0.975
    let mut table = Table::new(vec!["quantity".into()]);
    for i in 0..9 {
        let mut row = Row::new();
        row.set("quantity", Value::Float(f64::from(i)));
        table.push_row(row);
    }
    table.push_row(Row::new());

    let mut cfg = ProfileConfig::default();
    cfg.quality_score.enabled = true;
    let report = profile_table(&table, &cfg);

    let quality = report.quality.expect("quality section");
    assert_eq!(quality.score, 0.975);
    assert_eq!(quality.missing_ratio, 0.1);
    assert_eq!(quality.invalid_ratio, 0.0);
    assert_eq!(quality.duplicate_ratio, 0.0);
    assert_eq!(quality.anomaly_ratio, 0.0);
}

#[test]
fn negative_values_and_duplicates_lower_the_score() {
    let mut table = Table::new(vec!["quantity".into()]);
    for value in [1.0, 2.0, -3.0, 2.0] {
        let mut row = Row::new();
        row.set("quantity", Value::Float(value));
        table.push_row(row);
    }

    let mut cfg = ProfileConfig::default();
    cfg.quality_score.enabled = true;
    let quality = profile_table(&table, &cfg).quality.expect("quality section");

    assert_eq!(quality.invalid_ratio, 0.25); // one negative of four numerics
    assert_eq!(quality.duplicate_ratio, 0.25); // second 2.0 row repeats the first
    assert_eq!(quality.score, 0.875);
}

#[test]
fn column_metrics_cover_missing_unique_and_dtype() {
    let mut table = sales_table();
    let mut partial = Row::new();
    partial.set("store", Value::Text("Store 0".into()));
    table.push_row(partial); // quantity and sale_date missing

    let report = profile_table(&table, &ProfileConfig::default());
    assert_eq!(report.rows, 5);

    let store = &report.column_profiles["store"];
    assert_eq!(store.missing_values, Some(0));
    assert_eq!(store.unique_values, Some(4)); // Store 0 appears twice
    assert_eq!(store.dtype.as_deref(), Some("text"));
    assert!(store.numeric_summary.is_none());

    let quantity = &report.column_profiles["quantity"];
    assert_eq!(quantity.missing_values, Some(1));
    assert_eq!(quantity.missing_percent, Some(20.0));
    assert_eq!(quantity.dtype.as_deref(), Some("float"));

    let dates = &report.column_profiles["sale_date"];
    assert_eq!(dates.dtype.as_deref(), Some("date"));
}

#[test]
fn numeric_summary_matches_hand_computed_quartiles() {
    let report = profile_table(&sales_table(), &ProfileConfig::default());
    let summary = report.column_profiles["quantity"]
        .numeric_summary
        .as_ref()
        .expect("numeric summary");
    assert_eq!(summary.count, 4);
    assert_eq!(summary.mean, 2.5);
    assert_eq!(summary.min, 1.0);
    assert_eq!(summary.q25, 1.75);
    assert_eq!(summary.median, 2.5);
    assert_eq!(summary.q75, 3.25);
    assert_eq!(summary.max, 4.0);
}

#[test]
fn categorical_distribution_is_ranked_and_truncated() {
    let mut table = Table::new(vec!["region".into()]);
    for region in ["NORTH", "NORTH", "SOUTH", "EAST", "NORTH", "SOUTH"] {
        let mut row = Row::new();
        row.set("region", Value::Text(region.into()));
        table.push_row(row);
    }
    let mut cfg = ProfileConfig::default();
    cfg.metrics.categorical_top_k = 2;

    let report = profile_table(&table, &cfg);
    let ranked = report.column_profiles["region"]
        .categorical_distribution
        .as_ref()
        .expect("distribution");
    assert_eq!(ranked.len(), 2);
    assert_eq!((ranked[0].value.as_str(), ranked[0].count), ("NORTH", 3));
    assert_eq!((ranked[1].value.as_str(), ranked[1].count), ("SOUTH", 2));
}

#[test]
fn zscore_outliers_report_row_positions() {
    let mut table = Table::new(vec!["total_sales".into()]);
    let mut values = vec![10.0; 9];
    values.push(100.0);
    for value in values {
        let mut row = Row::new();
        row.set("total_sales", Value::Float(value));
        table.push_row(row);
    }

    let cfg = ProfileConfig {
        outliers: OutliersConfig {
            enabled: true,
            method: "zscore".into(),
            threshold: 2.5,
            numeric_columns: vec!["total_sales".into()],
        },
        ..ProfileConfig::default()
    };
    let report = profile_table(&table, &cfg);
    let outliers = report.outliers.expect("outlier section");
    // mean 19, population std 27, z(100) = 3.0 > 2.5
    assert_eq!(outliers["total_sales"].count, 1);
    assert_eq!(outliers["total_sales"].rows, [9]);
}

#[test]
fn constant_column_yields_no_outliers() {
    let mut table = Table::new(vec!["quantity".into()]);
    for _ in 0..5 {
        let mut row = Row::new();
        row.set("quantity", Value::Float(7.0));
        table.push_row(row);
    }
    let cfg = ProfileConfig {
        outliers: OutliersConfig {
            enabled: true,
            method: "zscore".into(),
            threshold: 3.0,
            numeric_columns: vec!["quantity".into()],
        },
        ..ProfileConfig::default()
    };
    let report = profile_table(&table, &cfg);
    assert_eq!(report.outliers.expect("outlier section")["quantity"].count, 0);
}

#[test]
fn disabled_profile_is_status_only() {
    let mut cfg = ProfileConfig::default();
    cfg.profile.enabled = false;
    let report = profile_table(&sales_table(), &cfg);
    assert!(report.is_disabled());
    assert!(report.column_profiles.is_empty());

    let json = serde_json::to_value(&report).expect("serialize");
    assert!(json.get("status").is_some());
    assert!(json.get("quality").is_none());
}

#[test]
fn configured_projection_excludes_unknown_columns() {
    let mut cfg = ProfileConfig::default();
    cfg.columns = vec!["store".into(), "nope".into()];
    let report = profile_table(&sales_table(), &cfg);
    assert_eq!(report.columns, ["store"]);
    assert!(!report.column_profiles.contains_key("nope"));
}

#[test]
fn sample_respects_configured_row_count() {
    let mut cfg = ProfileConfig::default();
    cfg.metrics.sample_rows = 2;
    let report = profile_table(&sales_table(), &cfg);
    let sample = report.sample.expect("sample section");
    assert_eq!(sample.len(), 2);
    assert_eq!(sample[0]["store"], "Store 0");
    assert_eq!(sample[1]["sale_date"], "2024-01-02");
}
