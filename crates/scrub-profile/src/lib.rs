//! Dataset profiling.
//!
//! A profile is computed twice per run, before and after normalization, over
//! the configured column projection. It never mutates the table: all metrics,
//! outlier scans and the quality score are read-only passes, and the result
//! is a serializable [`ProfileReport`] written as a JSON snapshot.

pub mod report;
mod stats;

use std::collections::{BTreeMap, BTreeSet, HashSet};

use scrub_model::{ProfileConfig, Table, Value};
use tracing::{info, warn};

pub use report::{
    CategoryCount, ColumnProfile, NumericSummary, OutlierSummary, ProfileReport, QualityScore,
};

/// Profile `table` under `cfg`.
///
/// Columns named in the configuration but absent from the table are silently
/// excluded; an empty configured projection means every column. When
/// `profile.enabled` is false the report carries only a disabled status.
pub fn profile_table(table: &Table, cfg: &ProfileConfig) -> ProfileReport {
    if !cfg.profile.enabled {
        info!("Profiling disabled, emitting status-only report");
        return ProfileReport::disabled();
    }

    let columns: Vec<String> = if cfg.columns.is_empty() {
        table.columns.clone()
    } else {
        cfg.columns
            .iter()
            .filter(|c| table.has_column(c))
            .cloned()
            .collect()
    };

    let mut column_profiles = BTreeMap::new();
    for column in &columns {
        column_profiles.insert(column.clone(), profile_column(table, column, cfg));
    }

    let sample = (cfg.metrics.sample_rows > 0).then(|| {
        table
            .rows
            .iter()
            .take(cfg.metrics.sample_rows)
            .map(|row| {
                columns
                    .iter()
                    .map(|c| (c.clone(), row.get(c).to_string()))
                    .collect()
            })
            .collect()
    });

    let outliers = detect_outliers(table, cfg);
    let quality = cfg
        .quality_score
        .enabled
        .then(|| score_quality(table, &columns, outliers.as_ref(), cfg));

    info!(
        rows = table.height(),
        columns = columns.len(),
        "Profiled dataset"
    );
    ProfileReport {
        status: None,
        rows: table.height(),
        columns,
        column_profiles,
        sample,
        outliers,
        quality,
    }
}

fn profile_column(table: &Table, column: &str, cfg: &ProfileConfig) -> ColumnProfile {
    let values = table.column_values(column);
    let rows = values.len();
    let missing = values.iter().filter(|v| v.is_missing()).count();

    let mut profile = ColumnProfile::default();
    if cfg.metrics.missing_values {
        profile.missing_values = Some(missing);
    }
    if cfg.metrics.missing_percent {
        let percent = if rows == 0 {
            0.0
        } else {
            stats::round4(missing as f64 / rows as f64 * 100.0)
        };
        profile.missing_percent = Some(percent);
    }
    if cfg.metrics.unique_values {
        let distinct: BTreeSet<String> = values
            .iter()
            .filter(|v| !v.is_missing())
            .map(|v| format!("{}:{v}", v.dtype_name()))
            .collect();
        profile.unique_values = Some(distinct.len());
    }
    if cfg.metrics.data_types {
        profile.dtype = Some(column_dtype(&values).to_string());
    }
    if cfg.metrics.numeric_summary {
        profile.numeric_summary = numeric_summary(&values);
    }
    if cfg.metrics.categorical_distribution && column_dtype(&values) == "text" {
        profile.categorical_distribution =
            Some(top_categories(&values, cfg.metrics.categorical_top_k));
    }
    profile
}

/// Dominant dtype of a column: the variant name when uniform, `float` for a
/// pure int/float mix, `mixed` otherwise, `missing` for an all-null column.
fn column_dtype(values: &[&Value]) -> &'static str {
    let kinds: BTreeSet<&'static str> = values
        .iter()
        .filter(|v| !v.is_missing())
        .map(|v| v.dtype_name())
        .collect();
    match kinds.len() {
        0 => "missing",
        1 => kinds.into_iter().next().unwrap_or("missing"),
        2 if kinds.contains("int") && kinds.contains("float") => "float",
        _ => "mixed",
    }
}

fn numeric_summary(values: &[&Value]) -> Option<NumericSummary> {
    let present: Vec<&Value> = values.iter().filter(|v| !v.is_missing()).copied().collect();
    if present.is_empty() || !present.iter().all(|v| v.as_f64().is_some()) {
        return None;
    }
    let mut numbers: Vec<f64> = present.iter().filter_map(|v| v.as_f64()).collect();
    numbers.sort_by(f64::total_cmp);
    Some(NumericSummary {
        count: numbers.len(),
        mean: stats::mean(&numbers),
        std: stats::sample_std(&numbers),
        min: numbers[0],
        q25: stats::quantile(&numbers, 0.25),
        median: stats::quantile(&numbers, 0.5),
        q75: stats::quantile(&numbers, 0.75),
        max: numbers[numbers.len() - 1],
    })
}

fn top_categories(values: &[&Value], top_k: usize) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        if let Some(text) = value.as_str() {
            *counts.entry(text).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(value, count)| CategoryCount {
            value: value.to_string(),
            count,
        })
        .collect();
    // descending by count, ties broken by value for a stable report
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    ranked.truncate(top_k);
    ranked
}

fn detect_outliers(
    table: &Table,
    cfg: &ProfileConfig,
) -> Option<BTreeMap<String, OutlierSummary>> {
    if !cfg.outliers.enabled {
        return None;
    }
    if cfg.outliers.method != "zscore" {
        warn!(method = %cfg.outliers.method, "Unknown outlier method, skipping detection");
        return None;
    }
    let mut result = BTreeMap::new();
    for column in &cfg.outliers.numeric_columns {
        if !table.has_column(column) {
            continue;
        }
        let positioned: Vec<(usize, f64)> = table
            .column_values(column)
            .iter()
            .enumerate()
            .filter_map(|(position, value)| value.as_f64().map(|number| (position, number)))
            .collect();
        let numbers: Vec<f64> = positioned.iter().map(|(_, n)| *n).collect();
        let std = stats::population_std(&numbers);
        let rows: Vec<usize> = if std == 0.0 {
            Vec::new()
        } else {
            let mean = stats::mean(&numbers);
            positioned
                .iter()
                .filter(|(_, number)| ((number - mean) / std).abs() > cfg.outliers.threshold)
                .map(|(position, _)| *position)
                .collect()
        };
        result.insert(
            column.clone(),
            OutlierSummary {
                count: rows.len(),
                rows,
            },
        );
    }
    Some(result)
}

fn score_quality(
    table: &Table,
    columns: &[String],
    outliers: Option<&BTreeMap<String, OutlierSummary>>,
    cfg: &ProfileConfig,
) -> QualityScore {
    let rows = table.height();
    let total_cells = rows * columns.len();

    let mut missing_cells = 0usize;
    let mut numeric_cells = 0usize;
    let mut negative_cells = 0usize;
    for row in &table.rows {
        for column in columns {
            let value = row.get(column);
            if value.is_missing() {
                missing_cells += 1;
            }
            if let Some(number) = value.as_f64() {
                numeric_cells += 1;
                if number < 0.0 {
                    negative_cells += 1;
                }
            }
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicate_rows = 0usize;
    for row in &table.rows {
        let key = columns
            .iter()
            .map(|column| {
                let value = row.get(column);
                format!("{}:{value}", value.dtype_name())
            })
            .collect::<Vec<_>>()
            .join("\u{1f}");
        if !seen.insert(key) {
            duplicate_rows += 1;
        }
    }

    let anomaly_count: usize = outliers
        .map(|per_column| per_column.values().map(|o| o.count).sum())
        .unwrap_or(0);

    let ratio = |numerator: usize, denominator: usize| {
        if denominator == 0 {
            0.0
        } else {
            numerator as f64 / denominator as f64
        }
    };
    let missing_ratio = ratio(missing_cells, total_cells);
    let invalid_ratio = ratio(negative_cells, numeric_cells);
    let duplicate_ratio = ratio(duplicate_rows, rows);
    let anomaly_ratio = ratio(anomaly_count, rows);

    let weights = &cfg.quality_score.weights;
    let score = weights.missing_values * (1.0 - missing_ratio)
        + weights.invalid_values * (1.0 - invalid_ratio)
        + weights.duplicates * (1.0 - duplicate_ratio)
        + weights.anomalies * (1.0 - anomaly_ratio);

    QualityScore {
        score: stats::round4(score),
        missing_ratio: stats::round4(missing_ratio),
        invalid_ratio: stats::round4(invalid_ratio),
        duplicate_ratio: stats::round4(duplicate_ratio),
        anomaly_ratio: stats::round4(anomaly_ratio),
    }
}
