//! Result types shared between command execution and summary rendering.

use std::path::PathBuf;

/// Outcome of a full `run` invocation.
pub struct RunResult {
    pub input: PathBuf,
    pub processed: Option<PathBuf>,
    pub curated: Option<PathBuf>,
    pub lineage: PathBuf,
    pub reports: Vec<PathBuf>,
    pub rows_in: usize,
    pub rows_normalized: usize,
    pub rows_curated: Option<usize>,
    pub lineage_entries: usize,
    pub quality_before: Option<f64>,
    pub quality_after: Option<f64>,
    pub executed_stages: Vec<&'static str>,
}

/// Outcome of a profile-only invocation.
pub struct ProfileResult {
    pub input: PathBuf,
    pub report: PathBuf,
    pub rows: usize,
    pub quality: Option<f64>,
}
