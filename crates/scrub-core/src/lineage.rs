//! Change-lineage capture.
//!
//! Every value a rule alters and every row a rule drops is attributable to an
//! original record through a [`LineageRecord`]. Records are buffered in
//! memory and appended to a write-once CSV log in fixed-size batches; the
//! orchestrator flushes unconditionally at the end of a run so no entry is
//! lost. The store is append-only: entries are never rewritten or deleted.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use scrub_model::{RowId, Value};

/// Default number of buffered records before an automatic flush.
pub const DEFAULT_BUFFER_SIZE: usize = 5000;

/// One change entry in the lineage log.
///
/// `row_id` is the original ordinal of the affected row, or `-1` for
/// header-level changes (column renames). Values are captured as their
/// rendered form; a missing value renders as the empty string.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LineageRecord {
    pub row_id: i64,
    pub column: String,
    pub old_value: String,
    pub new_value: String,
    pub rule: String,
    pub timestamp: String,
}

/// Buffered writer over the append-only lineage store.
#[derive(Debug)]
pub struct LineageWriter {
    path: PathBuf,
    buffer: Vec<LineageRecord>,
    buffer_size: usize,
    total_recorded: usize,
}

impl LineageWriter {
    /// Open the lineage store at `path`, creating parent directories and the
    /// fixed CSV header when the file does not yet exist.
    pub fn create(path: impl Into<PathBuf>, buffer_size: usize) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create lineage dir: {}", parent.display()))?;
        }
        if !path.exists() {
            let mut writer = csv::Writer::from_path(&path)
                .with_context(|| format!("create lineage store: {}", path.display()))?;
            writer.write_record([
                "row_id",
                "column",
                "old_value",
                "new_value",
                "rule",
                "timestamp",
            ])?;
            writer.flush()?;
        }
        Ok(Self {
            path,
            buffer: Vec::new(),
            buffer_size: buffer_size.max(1),
            total_recorded: 0,
        })
    }

    /// Open a store with the default buffer capacity.
    pub fn with_default_buffer(path: impl Into<PathBuf>) -> Result<Self> {
        Self::create(path, DEFAULT_BUFFER_SIZE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Buffer a change entry unless old and new are equal under null-aware
    /// equality (two missing values are equal; missing vs present never is).
    pub fn record(
        &mut self,
        row_id: RowId,
        column: &str,
        old_value: &Value,
        new_value: &Value,
        rule: &str,
    ) -> Result<()> {
        if old_value.same(new_value) {
            return Ok(());
        }
        self.buffer.push(LineageRecord {
            row_id: row_id.as_i64(),
            column: column.to_string(),
            old_value: old_value.to_string(),
            new_value: new_value.to_string(),
            rule: rule.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        });
        self.total_recorded += 1;
        if self.buffer.len() >= self.buffer_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Append buffered entries to the store in entry order and clear the
    /// buffer. A no-op when the buffer is empty.
    pub fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("append lineage store: {}", self.path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for record in self.buffer.drain(..) {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Entries currently buffered and not yet flushed.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Entries recorded over the writer's lifetime, flushed or not.
    pub fn total_recorded(&self) -> usize {
        self.total_recorded
    }
}
