//! Named tabular dataset
//!
//! One `NamedTable` per sheet (or per merge result). Tables are never edited
//! in place: a join builds a new table from its two inputs.

use super::value::Value;

/// A named table: fixed column set, ordered rows
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTable {
    /// Unique within a session (sheet name, or a derived name for merges)
    pub name: String,
    /// Column names in display order
    pub columns: Vec<String>,
    /// Rows, each the same length as `columns`
    pub rows: Vec<Vec<Value>>,
}

impl NamedTable {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell lookup by row index and column name
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)
    }

    /// The first `n` rows, for previews
    pub fn head(&self, n: usize) -> &[Vec<Value>] {
        &self.rows[..self.rows.len().min(n)]
    }
}
