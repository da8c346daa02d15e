//! In-memory table model with run-scoped row identity.
//!
//! The table is an ordered set of rows, each mapping column name to a typed
//! [`Value`]. Rows optionally carry a [`RowId`] assigned once from their
//! original ordinal position; the id exists only to correlate lineage entries
//! back to source rows and is stripped before the table leaves the pipeline.

use std::collections::BTreeMap;
use std::fmt;

use crate::Value;

/// A run-scoped row identifier.
///
/// Assigned once, before any rule runs, from the row's original ordinal
/// position. `RowId::HEADER` (-1) is a documented sentinel used only for
/// header-level lineage (column renames); row-level rules never produce it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct RowId(pub i64);

impl RowId {
    /// Sentinel id for header-level lineage entries.
    pub const HEADER: RowId = RowId(-1);

    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One record: an optional row id plus named cells.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Row {
    pub id: Option<RowId>,
    pub cells: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self {
            id: None,
            cells: BTreeMap::new(),
        }
    }

    pub fn get(&self, column: &str) -> &Value {
        self.cells.get(column).unwrap_or(&Value::Missing)
    }

    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.cells.insert(column.into(), value);
    }

    /// True when every cell is missing.
    pub fn is_empty_record(&self) -> bool {
        self.cells.values().all(Value::is_missing)
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered table of records.
///
/// `columns` carries output order; cells live in each row keyed by column
/// name. The column set evolves as rules run, but no rule ever inserts rows.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Register a new column at the end of the output order.
    ///
    /// No-op when the column already exists; rows are not backfilled, absent
    /// cells read as `Missing`.
    pub fn add_column(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.has_column(&name) {
            self.columns.push(name);
        }
    }

    /// Rename a column in the header and in every row's cells.
    pub fn rename_column(&mut self, from: &str, to: &str) {
        if from == to || !self.has_column(from) {
            return;
        }
        for column in &mut self.columns {
            if column == from {
                *column = to.to_string();
            }
        }
        for row in &mut self.rows {
            if let Some(value) = row.cells.remove(from) {
                row.cells.insert(to.to_string(), value);
            }
        }
    }

    /// Keep only the rows for which `keep` returns true.
    pub fn retain_rows(&mut self, keep: impl FnMut(&Row) -> bool) {
        self.rows.retain(keep);
    }

    /// All values of one column, in row order (absent cells read as missing).
    pub fn column_values(&self, column: &str) -> Vec<&Value> {
        self.rows.iter().map(|row| row.get(column)).collect()
    }

    /// Project the table to the named columns, in the given order.
    ///
    /// Columns that do not exist are silently excluded; row ids are carried
    /// through unchanged.
    pub fn select(&self, columns: &[String]) -> Table {
        let kept: Vec<String> = columns
            .iter()
            .filter(|c| self.has_column(c))
            .cloned()
            .collect();
        let mut out = Table::new(kept.clone());
        for row in &self.rows {
            let mut projected = Row::new();
            projected.id = row.id;
            for column in &kept {
                projected.set(column.clone(), row.get(column).clone());
            }
            out.push_row(projected);
        }
        out
    }

    /// Assign row identifiers from ordinal position.
    ///
    /// Only rows without an id receive one, so a second invocation is a
    /// no-op and identifiers stay stable across the run.
    pub fn assign_row_ids(&mut self) {
        for (ordinal, row) in self.rows.iter_mut().enumerate() {
            if row.id.is_none() {
                row.id = Some(RowId(ordinal as i64));
            }
        }
    }

    /// True when every row already carries an identifier.
    pub fn has_row_ids(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|row| row.id.is_some())
    }

    /// Remove row identifiers before the table is returned to callers.
    pub fn strip_row_ids(&mut self) {
        for row in &mut self.rows {
            row.id = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut table = Table::new(vec!["store".into(), "quantity".into()]);
        for (store, qty) in [("Store A", 2), ("Store B", 3)] {
            let mut row = Row::new();
            row.set("store", Value::Text(store.into()));
            row.set("quantity", Value::Int(qty));
            table.push_row(row);
        }
        table
    }

    #[test]
    fn assign_row_ids_is_idempotent() {
        let mut table = sample();
        table.assign_row_ids();
        let first: Vec<_> = table.rows.iter().map(|r| r.id).collect();
        table.assign_row_ids();
        let second: Vec<_> = table.rows.iter().map(|r| r.id).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![Some(RowId(0)), Some(RowId(1))]);
    }

    #[test]
    fn strip_row_ids_clears_all() {
        let mut table = sample();
        table.assign_row_ids();
        table.strip_row_ids();
        assert!(table.rows.iter().all(|r| r.id.is_none()));
    }

    #[test]
    fn rename_column_moves_cells() {
        let mut table = sample();
        table.rename_column("store", "store_name");
        assert!(table.has_column("store_name"));
        assert!(!table.has_column("store"));
        assert_eq!(
            table.rows[0].get("store_name"),
            &Value::Text("Store A".into())
        );
        assert!(table.rows[0].get("store").is_missing());
    }

    #[test]
    fn select_skips_unknown_columns_and_keeps_ids() {
        let mut table = sample();
        table.assign_row_ids();
        let projected = table.select(&["quantity".into(), "nope".into()]);
        assert_eq!(projected.columns, vec!["quantity".to_string()]);
        assert_eq!(projected.rows[1].id, Some(RowId(1)));
        assert_eq!(projected.rows[1].get("quantity"), &Value::Int(3));
    }

    #[test]
    fn absent_cells_read_as_missing() {
        let table = sample();
        assert!(table.rows[0].get("notes").is_missing());
    }
}
