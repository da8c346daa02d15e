//! Command execution for the `run` and `profile` subcommands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use scrub_core::lineage::LineageWriter;
use scrub_core::pipeline::NormalizePipeline;
use scrub_core::curate;
use scrub_ingest::{read_csv_table, save_profile_report, write_csv_table};
use scrub_model::{PipelineConfig, ProfileConfig};
use scrub_profile::profile_table;
use tracing::{info, info_span, warn};

use crate::cli::RunArgs;
use crate::types::{ProfileResult, RunResult};

/// Fallback lineage store when the configuration names none.
const DEFAULT_LINEAGE_FILE: &str = "lineage_log.csv";

fn load_pipeline_config(path: &Path) -> Result<PipelineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read pipeline config: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parse pipeline config: {}", path.display()))
}

fn load_profile_config(path: Option<&PathBuf>) -> Result<ProfileConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("read profile config: {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parse profile config: {}", path.display()))
        }
        None => Ok(ProfileConfig::default()),
    }
}

/// Directory report snapshots land in: next to the processed output, or the
/// working directory when no processed path is configured.
fn reports_dir(cfg: &PipelineConfig) -> PathBuf {
    cfg.output
        .processed
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

fn lineage_path(cfg: &PipelineConfig) -> PathBuf {
    if cfg.lineage.output_file.as_os_str().is_empty() {
        PathBuf::from(DEFAULT_LINEAGE_FILE)
    } else {
        cfg.lineage.output_file.clone()
    }
}

pub fn run_pipeline(args: &RunArgs) -> Result<RunResult> {
    let cfg = load_pipeline_config(&args.config)?;
    let profile_cfg = load_profile_config(args.profile_config.as_ref())?;
    let span = info_span!("run", input = %cfg.input.file.display());
    let _guard = span.enter();

    let table = read_csv_table(&cfg.input.file)?;
    let rows_in = table.height();

    let before = profile_table(&table, &profile_cfg);
    let quality_before = before.quality_score();

    let lineage_file = lineage_path(&cfg);
    let mut lineage = LineageWriter::create(&lineage_file, cfg.lineage.buffer_size)?;
    let mut pipeline = NormalizePipeline::new();
    let normalized = pipeline.execute(table, &cfg, &mut lineage)?;
    let lineage_entries = lineage.total_recorded();

    let processed = if cfg.output.processed.as_os_str().is_empty() {
        warn!("No processed output path configured, skipping dataset write");
        None
    } else {
        write_csv_table(&normalized, &cfg.output.processed)?;
        Some(cfg.output.processed.clone())
    };

    let (curated_table, curated) = match &cfg.curation {
        Some(curation) => {
            let curated_table = curate(&normalized, curation)?;
            let path = if cfg.output.curated.as_os_str().is_empty() {
                warn!("No curated output path configured, skipping dataset write");
                None
            } else {
                write_csv_table(&curated_table, &cfg.output.curated)?;
                Some(cfg.output.curated.clone())
            };
            (Some(curated_table), path)
        }
        None => (None, None),
    };

    let after = profile_table(curated_table.as_ref().unwrap_or(&normalized), &profile_cfg);
    let quality_after = after.quality_score();

    let dir = reports_dir(&cfg);
    let before_path = dir.join("profile_before.json");
    let after_path = dir.join("profile_after.json");
    save_profile_report(&before, &before_path)?;
    save_profile_report(&after, &after_path)?;

    info!(
        rows_in,
        rows_normalized = normalized.height(),
        lineage_entries,
        "Pipeline run complete"
    );
    Ok(RunResult {
        input: cfg.input.file.clone(),
        processed,
        curated,
        lineage: lineage_file,
        reports: vec![before_path, after_path],
        rows_in,
        rows_normalized: normalized.height(),
        rows_curated: curated_table.as_ref().map(scrub_model::Table::height),
        lineage_entries,
        quality_before,
        quality_after,
        executed_stages: pipeline.executed_stages().to_vec(),
    })
}

pub fn run_profile(args: &RunArgs) -> Result<ProfileResult> {
    let cfg = load_pipeline_config(&args.config)?;
    let profile_cfg = load_profile_config(args.profile_config.as_ref())?;
    let span = info_span!("profile", input = %cfg.input.file.display());
    let _guard = span.enter();

    let table = read_csv_table(&cfg.input.file)?;
    let report = profile_table(&table, &profile_cfg);
    let path = reports_dir(&cfg).join("profile_report.json");
    save_profile_report(&report, &path)?;

    info!(rows = table.height(), report = %path.display(), "Profile complete");
    Ok(ProfileResult {
        input: cfg.input.file.clone(),
        report: path,
        rows: table.height(),
        quality: report.quality_score(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RunArgs;

    fn write_file(path: &Path, contents: &str) {
        fs::write(path, contents).expect("write file");
    }

    #[test]
    fn malformed_config_is_a_structural_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = dir.path().join("pipeline.json");
        write_file(&config, "{ not json");
        let args = RunArgs {
            config,
            profile_config: None,
        };
        assert!(run_pipeline(&args).is_err());
    }

    #[test]
    fn end_to_end_run_writes_all_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("sales.csv");
        write_file(
            &input,
            "store,region,product_name,category,quantity,unit_price,total_sales,sale_date\n\
             Store A,nort,Widget,electronic,2,$10.50,,01/15/2024\n\
             Store A,nort,Widget,electronic,2,$10.50,,01/15/2024\n",
        );
        let out = dir.path().join("out");
        let config_path = dir.path().join("pipeline.json");
        let config = serde_json::json!({
            "input": { "file": input },
            "output": {
                "processed": out.join("processed.csv"),
                "curated": out.join("curated.csv"),
            },
            "lineage": { "output_file": out.join("lineage_log.csv"), "buffer_size": 100 },
            "duplicates": { "drop": true, "log": true },
            "reference": {
                "enabled": true,
                "region_map": { "nort": "NORTH" },
                "category_map": { "electronic": "ELECTRONICS" },
                "log": true
            },
            "numeric_cleaning": {
                "numeric_columns": ["quantity", "unit_price"],
                "currency_columns": ["unit_price"],
                "currency_symbols": ["$"],
                "log": true
            },
            "date_parsing": { "columns": ["sale_date"], "log": true },
            "feature_engineering": { "compute_total_sales": true },
            "curation": {
                "columns": [
                    "store", "product_name", "region", "category",
                    "quantity", "unit_price", "total_sales", "sale_date"
                ],
                "reference": { "regions": ["NORTH"], "categories": ["ELECTRONICS"] }
            }
        });
        write_file(&config_path, &config.to_string());

        let result = run_pipeline(&RunArgs {
            config: config_path,
            profile_config: None,
        })
        .expect("run");

        assert_eq!(result.rows_in, 2);
        assert_eq!(result.rows_normalized, 1);
        assert_eq!(result.rows_curated, Some(1));
        assert!(result.lineage_entries > 0);
        assert!(out.join("processed.csv").exists());
        assert!(out.join("curated.csv").exists());
        assert!(out.join("lineage_log.csv").exists());
        assert!(out.join("profile_before.json").exists());
        assert!(out.join("profile_after.json").exists());

        let curated = fs::read_to_string(out.join("curated.csv")).expect("read curated");
        assert!(curated.contains("NORTH"));
        assert!(curated.contains("21"));
    }

    #[test]
    fn profile_only_writes_a_single_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("sales.csv");
        write_file(&input, "store,quantity\nStore A,2\n");
        let config_path = dir.path().join("pipeline.json");
        write_file(
            &config_path,
            &serde_json::json!({
                "input": { "file": input },
                "output": { "processed": dir.path().join("out/processed.csv") }
            })
            .to_string(),
        );

        let result = run_profile(&RunArgs {
            config: config_path,
            profile_config: None,
        })
        .expect("profile");
        assert_eq!(result.rows, 1);
        assert!(result.report.exists());
    }
}
