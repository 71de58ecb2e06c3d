//! Table store
//!
//! Session-owned collection of loaded sheets. Populated exactly once per
//! session: a second load while populated is a no-op so an in-progress join
//! configuration is never silently discarded. Only a full "start over"
//! (`reset`) makes the store accept a fresh load.

use super::table::NamedTable;
use thiserror::Error;

/// Errors from table lookups
///
/// `NotFound` is an internal-invariant violation: the UI only ever offers
/// names that exist in the store.
#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("no sheet named '{0}' is loaded")]
    NotFound(String),
}

/// Holds the loaded sheets in workbook order
#[derive(Debug, Default)]
pub struct TableStore {
    tables: Vec<NamedTable>,
}

impl TableStore {
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Populate the store, once
    ///
    /// Returns false without touching anything if the store already holds
    /// tables. Duplicate names (which the workbook formats should never
    /// produce) resolve last-one-wins.
    pub fn load_from(&mut self, tables: Vec<NamedTable>) -> bool {
        if !self.tables.is_empty() {
            return false;
        }
        for table in tables {
            if let Some(existing) = self.tables.iter_mut().find(|t| t.name == table.name) {
                *existing = table;
            } else {
                self.tables.push(table);
            }
        }
        true
    }

    pub fn get(&self, name: &str) -> Result<&NamedTable, StoreError> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Sheet names in workbook order
    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn tables(&self) -> &[NamedTable] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Empty the store so a fresh load is accepted again
    pub fn reset(&mut self) {
        self.tables.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::value::Value;

    fn table(name: &str) -> NamedTable {
        NamedTable::new(
            name,
            vec!["a".to_string()],
            vec![vec![Value::Number(1.0)]],
        )
    }

    #[test]
    fn test_load_populates_once() {
        let mut store = TableStore::new();
        assert!(store.load_from(vec![table("one"), table("two")]));
        assert_eq!(store.len(), 2);

        // Second load is a no-op regardless of contents
        assert!(!store.load_from(vec![table("three")]));
        assert_eq!(store.names(), vec!["one", "two"]);
    }

    #[test]
    fn test_duplicate_names_last_one_wins() {
        let mut store = TableStore::new();
        let mut second = table("dup");
        second.rows = vec![vec![Value::Number(9.0)]];
        store.load_from(vec![table("dup"), second]);

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("dup").unwrap().rows[0][0],
            Value::Number(9.0)
        );
    }

    #[test]
    fn test_get_missing_is_error() {
        let store = TableStore::new();
        assert_eq!(
            store.get("nope"),
            Err(StoreError::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn test_reset_accepts_fresh_load() {
        let mut store = TableStore::new();
        store.load_from(vec![table("one")]);
        store.reset();
        assert!(store.is_empty());

        // Not treated as a duplicate after reset
        assert!(store.load_from(vec![table("two")]));
        assert_eq!(store.names(), vec!["two"]);
    }
}
