//! Normalization orchestrator with ordered stage execution.
//!
//! Each stage implements the [`NormalizeStage`] trait and is executed in a
//! fixed order; its `should_skip` predicate reads enablement from the typed
//! configuration, so an absent or disabled block is an identity transform.
//!
//! # Stage order
//!
//! assign-row-ids → rename → dedup → drop-empty → clean-text →
//! standardize-text → reference-normalize → numeric-clean →
//! drop-missing-required → parse-dates → derive-features → filter →
//! enforce-schema → validate → flush-lineage → strip-row-ids
//!
//! The path is linear with no branching back: a later stage may rely on an
//! earlier one having completed (numeric cleaning assumes text cleaning
//! already ran). Apart from the per-column schema-cast recovery inside
//! `enforce_schema`, any stage failure propagates and aborts the run.

use anyhow::Result;
use scrub_model::{PipelineConfig, Table};
use tracing::info;

use crate::lineage::LineageWriter;
use crate::rules;

/// A single normalization stage.
pub trait NormalizeStage {
    /// Human-readable name, used for logging and the execution trace.
    fn stage_name(&self) -> &'static str;

    /// Whether this stage should be skipped for the given configuration.
    fn should_skip(&self, cfg: &PipelineConfig) -> bool;

    /// Execute the stage, taking ownership of the table and returning the
    /// transformed table.
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        lineage: &mut LineageWriter,
    ) -> Result<Table>;
}

struct RenameColumns;

impl NormalizeStage for RenameColumns {
    fn stage_name(&self) -> &'static str {
        "rename_columns"
    }
    fn should_skip(&self, cfg: &PipelineConfig) -> bool {
        cfg.column_mapping.is_empty()
    }
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        lineage: &mut LineageWriter,
    ) -> Result<Table> {
        rules::rename_columns(table, &cfg.column_mapping, lineage)
    }
}

struct DropDuplicates;

impl NormalizeStage for DropDuplicates {
    fn stage_name(&self) -> &'static str {
        "drop_duplicates"
    }
    fn should_skip(&self, cfg: &PipelineConfig) -> bool {
        !cfg.duplicates.drop
    }
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        lineage: &mut LineageWriter,
    ) -> Result<Table> {
        rules::drop_duplicate_rows(table, &cfg.duplicates, lineage)
    }
}

struct DropEmpty;

impl NormalizeStage for DropEmpty {
    fn stage_name(&self) -> &'static str {
        "drop_empty"
    }
    fn should_skip(&self, cfg: &PipelineConfig) -> bool {
        !cfg.empty_rows.drop
    }
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        lineage: &mut LineageWriter,
    ) -> Result<Table> {
        rules::drop_empty_rows(table, &cfg.empty_rows, lineage)
    }
}

struct CleanText;

impl NormalizeStage for CleanText {
    fn stage_name(&self) -> &'static str {
        "clean_text"
    }
    fn should_skip(&self, cfg: &PipelineConfig) -> bool {
        cfg.text_cleaning.is_none()
    }
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        _lineage: &mut LineageWriter,
    ) -> Result<Table> {
        match &cfg.text_cleaning {
            Some(block) => rules::clean_text(table, block),
            None => Ok(table),
        }
    }
}

struct StandardizeText;

impl NormalizeStage for StandardizeText {
    fn stage_name(&self) -> &'static str {
        "standardize_text"
    }
    fn should_skip(&self, cfg: &PipelineConfig) -> bool {
        cfg.text_standardization.is_none()
    }
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        _lineage: &mut LineageWriter,
    ) -> Result<Table> {
        match &cfg.text_standardization {
            Some(block) => rules::standardize_text(table, block),
            None => Ok(table),
        }
    }
}

struct ReferenceNormalize;

impl NormalizeStage for ReferenceNormalize {
    fn stage_name(&self) -> &'static str {
        "reference_normalization"
    }
    fn should_skip(&self, cfg: &PipelineConfig) -> bool {
        !cfg.reference.enabled
    }
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        lineage: &mut LineageWriter,
    ) -> Result<Table> {
        rules::normalize_with_reference(table, &cfg.reference, lineage)
    }
}

struct NumericClean;

impl NormalizeStage for NumericClean {
    fn stage_name(&self) -> &'static str {
        "numeric_cleaning"
    }
    fn should_skip(&self, cfg: &PipelineConfig) -> bool {
        cfg.numeric_cleaning.is_none()
    }
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        lineage: &mut LineageWriter,
    ) -> Result<Table> {
        match &cfg.numeric_cleaning {
            Some(block) => rules::clean_numeric_values(table, block, lineage),
            None => Ok(table),
        }
    }
}

struct DropMissingRequired;

impl NormalizeStage for DropMissingRequired {
    fn stage_name(&self) -> &'static str {
        "drop_missing_required"
    }
    fn should_skip(&self, cfg: &PipelineConfig) -> bool {
        cfg.drop_missing
            .as_ref()
            .is_none_or(|block| block.required_columns.is_empty())
    }
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        lineage: &mut LineageWriter,
    ) -> Result<Table> {
        match &cfg.drop_missing {
            Some(block) => rules::drop_rows_missing_required(table, block, lineage),
            None => Ok(table),
        }
    }
}

struct ParseDates;

impl NormalizeStage for ParseDates {
    fn stage_name(&self) -> &'static str {
        "date_parsing"
    }
    fn should_skip(&self, cfg: &PipelineConfig) -> bool {
        cfg.date_parsing.is_none()
    }
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        _lineage: &mut LineageWriter,
    ) -> Result<Table> {
        match &cfg.date_parsing {
            Some(block) => rules::parse_dates(table, block),
            None => Ok(table),
        }
    }
}

struct DeriveFeatures;

impl NormalizeStage for DeriveFeatures {
    fn stage_name(&self) -> &'static str {
        "feature_engineering"
    }
    fn should_skip(&self, cfg: &PipelineConfig) -> bool {
        cfg.feature_engineering.is_none()
    }
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        _lineage: &mut LineageWriter,
    ) -> Result<Table> {
        match &cfg.feature_engineering {
            Some(block) => rules::derive_features(table, block),
            None => Ok(table),
        }
    }
}

struct Filters;

impl NormalizeStage for Filters {
    fn stage_name(&self) -> &'static str {
        "filters"
    }
    fn should_skip(&self, cfg: &PipelineConfig) -> bool {
        cfg.filters.is_none()
    }
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        lineage: &mut LineageWriter,
    ) -> Result<Table> {
        match &cfg.filters {
            Some(block) => rules::apply_filters(table, block, lineage),
            None => Ok(table),
        }
    }
}

struct EnforceSchema;

impl NormalizeStage for EnforceSchema {
    fn stage_name(&self) -> &'static str {
        "schema_enforcement"
    }
    fn should_skip(&self, cfg: &PipelineConfig) -> bool {
        cfg.schema.is_none()
    }
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        _lineage: &mut LineageWriter,
    ) -> Result<Table> {
        match &cfg.schema {
            Some(block) => rules::enforce_schema(table, block),
            None => Ok(table),
        }
    }
}

struct Validate;

impl NormalizeStage for Validate {
    fn stage_name(&self) -> &'static str {
        "validation"
    }
    fn should_skip(&self, cfg: &PipelineConfig) -> bool {
        cfg.validation.is_none()
    }
    fn apply(
        &self,
        table: Table,
        cfg: &PipelineConfig,
        _lineage: &mut LineageWriter,
    ) -> Result<Table> {
        if let Some(block) = &cfg.validation {
            rules::run_validation(&table, block);
        }
        Ok(table)
    }
}

/// An ordered pipeline of normalization stages.
pub struct NormalizePipeline {
    stages: Vec<Box<dyn NormalizeStage>>,
    executed: Vec<&'static str>,
}

impl Default for NormalizePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalizePipeline {
    /// Build the standard pipeline in its fixed order.
    pub fn new() -> Self {
        Self {
            stages: vec![
                Box::new(RenameColumns),
                Box::new(DropDuplicates),
                Box::new(DropEmpty),
                Box::new(CleanText),
                Box::new(StandardizeText),
                Box::new(ReferenceNormalize),
                Box::new(NumericClean),
                Box::new(DropMissingRequired),
                Box::new(ParseDates),
                Box::new(DeriveFeatures),
                Box::new(Filters),
                Box::new(EnforceSchema),
                Box::new(Validate),
            ],
            executed: Vec::new(),
        }
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.stage_name()).collect()
    }

    /// Names of the stages that actually ran during the last `execute`.
    pub fn executed_stages(&self) -> &[&'static str] {
        &self.executed
    }

    /// Run the full normalization over `table`.
    ///
    /// Assigns row identifiers (idempotent), applies every enabled stage in
    /// order, flushes the lineage buffer, and strips row identifiers before
    /// returning. Row count never increases across stages.
    pub fn execute(
        &mut self,
        mut table: Table,
        cfg: &PipelineConfig,
        lineage: &mut LineageWriter,
    ) -> Result<Table> {
        self.executed.clear();
        if !table.has_row_ids() {
            table.assign_row_ids();
            info!("Assigned stable row identifiers");
        }
        for stage in &self.stages {
            if stage.should_skip(cfg) {
                continue;
            }
            let rows_before = table.height();
            table = stage.apply(table, cfg, lineage)?;
            debug_assert!(table.height() <= rows_before);
            info!(
                stage = stage.stage_name(),
                rows_before,
                rows_after = table.height(),
                "Stage complete"
            );
            self.executed.push(stage.stage_name());
        }
        lineage.flush()?;
        info!("Lineage flushed to disk");
        table.strip_row_ids();
        info!(rows = table.height(), "Normalization complete");
        Ok(table)
    }
}

/// Convenience wrapper: run the standard pipeline once.
pub fn normalize(
    table: Table,
    cfg: &PipelineConfig,
    lineage: &mut LineageWriter,
) -> Result<Table> {
    NormalizePipeline::new().execute(table, cfg, lineage)
}
