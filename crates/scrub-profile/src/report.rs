//! Serializable profile report types.
//!
//! Every section is optional: a section is `None` when its metric is disabled
//! in configuration, and skipped during serialization so a report only shows
//! what was actually computed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Profile of one dataset at one point in the run (before or after cleaning).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Set only when profiling is disabled; every other field is empty then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub rows: usize,
    pub columns: Vec<String>,
    pub column_profiles: BTreeMap<String, ColumnProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<Vec<BTreeMap<String, String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outliers: Option<BTreeMap<String, OutlierSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityScore>,
}

impl ProfileReport {
    /// The report produced when `profile.enabled` is false.
    pub fn disabled() -> Self {
        Self {
            status: Some("profiling disabled by configuration".to_string()),
            rows: 0,
            columns: Vec::new(),
            column_profiles: BTreeMap::new(),
            sample: None,
            outliers: None,
            quality: None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.status.is_some()
    }

    /// Overall quality score, if scoring was enabled.
    pub fn quality_score(&self) -> Option<f64> {
        self.quality.as_ref().map(|q| q.score)
    }
}

/// Per-column metrics. Each field mirrors one metric toggle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_values: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_values: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_summary: Option<NumericSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorical_distribution: Option<Vec<CategoryCount>>,
}

/// Descriptive statistics over a column's non-missing numeric values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1); zero for fewer than two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// One entry of a top-K categorical frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Z-score outliers for one numeric column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlierSummary {
    pub count: usize,
    /// Zero-based row positions of the offending values.
    pub rows: Vec<usize>,
}

/// Weighted data-quality score with its component ratios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityScore {
    /// Weighted sum of the `(1 - ratio)` terms, rounded to 4 decimals.
    pub score: f64,
    pub missing_ratio: f64,
    pub invalid_ratio: f64,
    pub duplicate_ratio: f64,
    pub anomaly_ratio: f64,
}
