//! Typed pipeline and profiling configuration.
//!
//! Configuration is data, not code: every stage reads exactly one block and
//! an absent or disabled block means the stage is skipped (identity). The
//! documents are JSON, deserialized once at process start into these structs
//! and passed by parameter into every stage.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub log_files: LogFilesConfig,
    pub lineage: LineageConfig,
    /// Source column name -> target column name.
    pub column_mapping: BTreeMap<String, String>,
    pub duplicates: DropRowsConfig,
    pub empty_rows: DropRowsConfig,
    pub text_cleaning: Option<TextCleaningConfig>,
    pub text_standardization: Option<TextStandardizationConfig>,
    pub reference: ReferenceConfig,
    pub numeric_cleaning: Option<NumericCleaningConfig>,
    pub drop_missing: Option<DropMissingConfig>,
    pub date_parsing: Option<DateParsingConfig>,
    pub feature_engineering: Option<FeatureEngineeringConfig>,
    pub filters: Option<FiltersConfig>,
    pub schema: Option<SchemaConfig>,
    pub validation: Option<ValidationConfig>,
    pub curation: Option<CurationConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub file: PathBuf,
    /// Retained for source-workbook compatibility; the CSV adapter ignores it.
    pub sheet_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub processed: PathBuf,
    pub curated: PathBuf,
}

/// Log destinations carried in the config document. Logging is initialized
/// from CLI flags before any config is read, so `--log-file` wins; this block
/// exists so a document can state where its run expects logs to land.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFilesConfig {
    pub pipeline: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineageConfig {
    pub output_file: PathBuf,
    pub buffer_size: usize,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            output_file: PathBuf::new(),
            buffer_size: 5000,
        }
    }
}

/// Shared shape for the duplicate-row and empty-row drop stages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DropRowsConfig {
    pub drop: bool,
    pub log: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextCleaningConfig {
    pub columns: Vec<String>,
    pub cleaning: TextCleaningOps,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextCleaningOps {
    pub strip: bool,
    pub collapse_whitespace: bool,
    pub remove_special_characters: bool,
    pub log: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStandardizationConfig {
    /// Column -> transform name (`title`, `upper`, `lower`, `strip`).
    /// Unrecognized names are a per-column no-op.
    pub columns: BTreeMap<String, String>,
    pub log: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub enabled: bool,
    /// Lower-cased, trimmed raw spelling -> canonical uppercase label.
    pub region_map: BTreeMap<String, String>,
    pub category_map: BTreeMap<String, String>,
    pub log: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericCleaningConfig {
    pub numeric_columns: Vec<String>,
    /// Columns allowed to carry currency symbols.
    pub currency_columns: Vec<String>,
    pub currency_symbols: Vec<String>,
    pub log: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DropMissingConfig {
    pub required_columns: Vec<String>,
    pub log: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DateParsingConfig {
    pub columns: Vec<String>,
    pub log: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureEngineeringConfig {
    pub compute_total_sales: bool,
    pub derive_date_parts: bool,
    /// Subset of `sale_year`, `sale_month`, `sale_quarter`, `weekday`.
    pub date_parts: Vec<String>,
    pub log: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    pub quantity_greater_than_zero: bool,
    pub total_sales_non_negative: bool,
    pub log: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Column -> target type (`float`, `int`, `datetime`, `string`).
    pub columns: BTreeMap<String, String>,
    pub log: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub no_double_spaces_in_store: bool,
    pub region_not_null: bool,
    pub category_not_null: bool,
    pub sale_date_not_null: bool,
    pub region_uppercase: bool,
    pub category_uppercase: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationConfig {
    pub columns: Vec<String>,
    pub reference: CurationReference,
    /// Business grain for final deduplication; last occurrence wins.
    pub business_key: Vec<String>,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            reference: CurationReference::default(),
            business_key: vec![
                "store".to_string(),
                "product_name".to_string(),
                "sale_date".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationReference {
    pub regions: Vec<String>,
    pub categories: Vec<String>,
}

/// Top-level profiling configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub profile: ProfileToggle,
    /// Column projection the profile is computed over.
    pub columns: Vec<String>,
    pub metrics: MetricsConfig,
    pub outliers: OutliersConfig,
    pub quality_score: QualityScoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileToggle {
    pub enabled: bool,
}

impl Default for ProfileToggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub missing_values: bool,
    pub missing_percent: bool,
    pub unique_values: bool,
    pub data_types: bool,
    pub numeric_summary: bool,
    pub categorical_distribution: bool,
    pub categorical_top_k: usize,
    /// Number of rows included in the sample; 0 disables the sample.
    pub sample_rows: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            missing_values: true,
            missing_percent: true,
            unique_values: true,
            data_types: true,
            numeric_summary: true,
            categorical_distribution: true,
            categorical_top_k: 10,
            sample_rows: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutliersConfig {
    pub enabled: bool,
    pub method: String,
    pub threshold: f64,
    pub numeric_columns: Vec<String>,
}

impl Default for OutliersConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            method: "zscore".to_string(),
            threshold: 3.0,
            numeric_columns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityScoreConfig {
    pub enabled: bool,
    pub weights: QualityWeights,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityWeights {
    pub missing_values: f64,
    pub invalid_values: f64,
    pub duplicates: f64,
    pub anomalies: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            missing_values: 0.25,
            invalid_values: 0.25,
            duplicates: 0.25,
            anomalies: 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_disables_every_stage() {
        let cfg: PipelineConfig = serde_json::from_str("{}").expect("parse empty config");
        assert!(cfg.column_mapping.is_empty());
        assert!(!cfg.duplicates.drop);
        assert!(cfg.text_cleaning.is_none());
        assert!(!cfg.reference.enabled);
        assert!(cfg.filters.is_none());
        assert_eq!(cfg.lineage.buffer_size, 5000);
    }

    #[test]
    fn curation_defaults_to_business_grain() {
        let cfg = CurationConfig::default();
        assert_eq!(cfg.business_key, ["store", "product_name", "sale_date"]);
    }

    #[test]
    fn profile_weights_default_to_quarter_each() {
        let cfg: ProfileConfig = serde_json::from_str("{}").expect("parse profile config");
        assert!(cfg.profile.enabled);
        assert_eq!(cfg.quality_score.weights.missing_values, 0.25);
        assert_eq!(cfg.outliers.method, "zscore");
    }

    #[test]
    fn pipeline_config_round_trips() {
        let json = r#"{
            "column_mapping": {"Store ": "store"},
            "duplicates": {"drop": true, "log": true},
            "filters": {"quantity_greater_than_zero": true}
        }"#;
        let cfg: PipelineConfig = serde_json::from_str(json).expect("parse");
        assert_eq!(cfg.column_mapping["Store "], "store");
        assert!(cfg.duplicates.drop);
        let filters = cfg.filters.expect("filters block");
        assert!(filters.quantity_greater_than_zero);
        assert!(!filters.total_sales_non_negative);
    }
}
