//! Relational merge engine
//!
//! Joins two named tables on one key column per side with standard
//! relational semantics: non-unique keys produce the full cross-product of
//! matching rows, and the outer-ish kinds null-fill the missing side.
//!
//! When the two key columns share a name, the output carries a single key
//! column, filled from whichever side matched (pandas merge behavior).
//! Differently-named keys are both emitted. Any other column name present in
//! both inputs is disambiguated with `_left` / `_right` suffixes.

use super::store::StoreError;
use super::table::NamedTable;
use super::value::{kinds_comparable, Value, ValueKind};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Which unmatched rows survive the merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Outer,
}

impl JoinKind {
    pub fn all() -> [JoinKind; 4] {
        [JoinKind::Inner, JoinKind::Left, JoinKind::Right, JoinKind::Outer]
    }

    pub fn name(&self) -> &'static str {
        match self {
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::Outer => "outer",
        }
    }

    fn keeps_unmatched_left(&self) -> bool {
        matches!(self, JoinKind::Left | JoinKind::Outer)
    }

    fn keeps_unmatched_right(&self) -> bool {
        matches!(self, JoinKind::Right | JoinKind::Outer)
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One merge attempt's configuration, built fresh each time
#[derive(Debug, Clone, PartialEq)]
pub struct JoinSpec {
    pub left: String,
    pub right: String,
    pub left_key: String,
    pub right_key: String,
    pub kind: JoinKind,
}

/// Errors from validating or executing a merge
#[derive(Debug, Error, PartialEq)]
pub enum MergeError {
    #[error(transparent)]
    UnknownTable(#[from] StoreError),

    #[error("table '{0}' cannot be joined to itself")]
    SameTable(String),

    #[error("key column '{column}' does not exist in '{table}'")]
    KeyNotFound { table: String, column: String },

    #[error("key columns are incomparable: '{left_key}' holds {left_kind}, '{right_key}' holds {right_kind}")]
    IncomparableKeys {
        left_key: String,
        right_key: String,
        left_kind: ValueKind,
        right_kind: ValueKind,
    },
}

/// Merge two tables on the given key columns
///
/// Validates the keys and the key-column kinds up front, then matches rows
/// with `Value::join_matches`. Comparable keys with zero matches are not an
/// error; an inner join then simply yields zero rows.
pub fn merge(
    left: &NamedTable,
    right: &NamedTable,
    left_key: &str,
    right_key: &str,
    kind: JoinKind,
) -> Result<NamedTable, MergeError> {
    if left.name == right.name {
        return Err(MergeError::SameTable(left.name.clone()));
    }

    let lk = left
        .column_index(left_key)
        .ok_or_else(|| MergeError::KeyNotFound {
            table: left.name.clone(),
            column: left_key.to_string(),
        })?;
    let rk = right
        .column_index(right_key)
        .ok_or_else(|| MergeError::KeyNotFound {
            table: right.name.clone(),
            column: right_key.to_string(),
        })?;

    check_key_kinds(left, right, left_key, right_key, lk, rk)?;

    // Equal-named keys collapse into one output column
    let shared_key = left_key == right_key;
    let right_width = right.column_count() - usize::from(shared_key);

    let columns = output_columns(left, right, rk, shared_key);
    let mut rows = Vec::new();
    let mut right_matched = vec![false; right.rows.len()];

    let right_cells = |right_row: &[Value]| -> Vec<Value> {
        right_row
            .iter()
            .enumerate()
            .filter(|(i, _)| !(shared_key && *i == rk))
            .map(|(_, v)| v.clone())
            .collect()
    };

    for left_row in &left.rows {
        let mut matched = false;
        for (j, right_row) in right.rows.iter().enumerate() {
            if left_row[lk].join_matches(&right_row[rk]) {
                matched = true;
                right_matched[j] = true;
                let mut row = left_row.clone();
                row.extend(right_cells(right_row));
                rows.push(row);
            }
        }
        if !matched && kind.keeps_unmatched_left() {
            let mut row = left_row.clone();
            row.extend(std::iter::repeat(Value::Null).take(right_width));
            rows.push(row);
        }
    }

    if kind.keeps_unmatched_right() {
        for (j, right_row) in right.rows.iter().enumerate() {
            if !right_matched[j] {
                let mut row = vec![Value::Null; left.column_count()];
                if shared_key {
                    // The collapsed key column takes the right side's value
                    row[lk] = right_row[rk].clone();
                }
                row.extend(right_cells(right_row));
                rows.push(row);
            }
        }
    }

    Ok(NamedTable::new(
        format!("{}_{}", left.name, right.name),
        columns,
        rows,
    ))
}

/// Fail fast when the two key columns hold kinds with no comparison rule
///
/// The dominant kind of a column is its most frequent non-null kind. A key
/// column with no non-null values is trivially comparable (zero matches).
fn check_key_kinds(
    left: &NamedTable,
    right: &NamedTable,
    left_key: &str,
    right_key: &str,
    lk: usize,
    rk: usize,
) -> Result<(), MergeError> {
    let left_kind = dominant_kind(&left.rows, lk);
    let right_kind = dominant_kind(&right.rows, rk);

    if let (Some(a), Some(b)) = (left_kind, right_kind) {
        if !kinds_comparable(a, b) {
            return Err(MergeError::IncomparableKeys {
                left_key: left_key.to_string(),
                right_key: right_key.to_string(),
                left_kind: a,
                right_kind: b,
            });
        }
    }
    Ok(())
}

fn dominant_kind(rows: &[Vec<Value>], col: usize) -> Option<ValueKind> {
    let mut counts: Vec<(ValueKind, usize)> = Vec::new();
    for row in rows {
        let kind = row[col].kind();
        if kind == ValueKind::Null {
            continue;
        }
        if let Some(entry) = counts.iter_mut().find(|(k, _)| *k == kind) {
            entry.1 += 1;
        } else {
            counts.push((kind, 1));
        }
    }
    counts.into_iter().max_by_key(|(_, n)| *n).map(|(k, _)| k)
}

/// Output column names
///
/// With `shared_key` the right key column (index `rk`) is dropped and its
/// name is never treated as a collision, so the single key column keeps its
/// plain name. Other colliding names are suffixed per side.
fn output_columns(
    left: &NamedTable,
    right: &NamedTable,
    rk: usize,
    shared_key: bool,
) -> Vec<String> {
    let left_set: HashSet<&String> = left.columns.iter().collect();
    let collisions: HashSet<&String> = right
        .columns
        .iter()
        .enumerate()
        .filter(|(i, c)| !(shared_key && *i == rk) && left_set.contains(*c))
        .map(|(_, c)| c)
        .collect();

    let mut columns = Vec::with_capacity(left.column_count() + right.column_count());
    for c in &left.columns {
        if collisions.contains(c) {
            columns.push(format!("{}_left", c));
        } else {
            columns.push(c.clone());
        }
    }
    for (i, c) in right.columns.iter().enumerate() {
        if shared_key && i == rk {
            continue;
        }
        if collisions.contains(c) {
            columns.push(format!("{}_right", c));
        } else {
            columns.push(c.clone());
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::value::Value;

    fn left_table() -> NamedTable {
        NamedTable::new(
            "orders",
            vec!["id".to_string(), "a".to_string()],
            vec![
                vec![Value::Number(1.0), Value::Text("x".into())],
                vec![Value::Number(2.0), Value::Text("y".into())],
            ],
        )
    }

    fn right_table() -> NamedTable {
        NamedTable::new(
            "customers",
            vec!["id".to_string(), "b".to_string()],
            vec![
                vec![Value::Number(1.0), Value::Text("p".into())],
                vec![Value::Number(3.0), Value::Text("q".into())],
            ],
        )
    }

    #[test]
    fn test_inner_join_keeps_only_matches() {
        let merged = merge(&left_table(), &right_table(), "id", "id", JoinKind::Inner).unwrap();

        assert_eq!(merged.columns, vec!["id", "a", "b"]);
        assert_eq!(merged.rows.len(), 1);
        assert_eq!(
            merged.rows[0],
            vec![
                Value::Number(1.0),
                Value::Text("x".into()),
                Value::Text("p".into()),
            ]
        );
    }

    #[test]
    fn test_outer_join_null_fills_both_sides() {
        let merged = merge(&left_table(), &right_table(), "id", "id", JoinKind::Outer).unwrap();

        assert_eq!(merged.rows.len(), 3);
        // Matched row first, then the unmatched left row with null b
        assert_eq!(merged.rows[1][0], Value::Number(2.0));
        assert_eq!(merged.rows[1][2], Value::Null);
        // Unmatched right row: key filled from the right, null a
        assert_eq!(merged.rows[2][0], Value::Number(3.0));
        assert_eq!(merged.rows[2][1], Value::Null);
        assert_eq!(merged.rows[2][2], Value::Text("q".into()));
    }

    #[test]
    fn test_left_join_keeps_all_left_rows() {
        let merged = merge(&left_table(), &right_table(), "id", "id", JoinKind::Left).unwrap();

        assert_eq!(merged.rows.len(), 2);
        assert_eq!(merged.rows[1][2], Value::Null);
    }

    #[test]
    fn test_right_join_keeps_all_right_rows() {
        let merged = merge(&left_table(), &right_table(), "id", "id", JoinKind::Right).unwrap();

        assert_eq!(merged.rows.len(), 2);
        assert_eq!(merged.rows[1][0], Value::Number(3.0));
        assert_eq!(merged.rows[1][1], Value::Null);
        assert_eq!(merged.rows[1][2], Value::Text("q".into()));
    }

    #[test]
    fn test_shared_key_name_yields_single_key_column() {
        let merged = merge(&left_table(), &right_table(), "id", "id", JoinKind::Inner).unwrap();

        assert_eq!(
            merged.columns.iter().filter(|c| *c == "id").count(),
            1
        );
        assert!(!merged.columns.iter().any(|c| c.starts_with("id_")));
    }

    #[test]
    fn test_non_key_collisions_still_suffixed_with_shared_key() {
        let left = NamedTable::new(
            "l",
            vec!["id".to_string(), "v".to_string()],
            vec![vec![Value::Number(1.0), Value::Text("lv".into())]],
        );
        let right = NamedTable::new(
            "r",
            vec!["id".to_string(), "v".to_string()],
            vec![vec![Value::Number(1.0), Value::Text("rv".into())]],
        );

        let merged = merge(&left, &right, "id", "id", JoinKind::Inner).unwrap();
        assert_eq!(merged.columns, vec!["id", "v_left", "v_right"]);
        assert_eq!(
            merged.rows[0],
            vec![
                Value::Number(1.0),
                Value::Text("lv".into()),
                Value::Text("rv".into()),
            ]
        );
    }

    #[test]
    fn test_duplicate_keys_cross_product() {
        let left = NamedTable::new(
            "l",
            vec!["k".to_string()],
            vec![vec![Value::Number(5.0)], vec![Value::Number(5.0)]],
        );
        let right = NamedTable::new(
            "r",
            vec!["k".to_string(), "v".to_string()],
            vec![vec![Value::Number(5.0), Value::Text("only".into())]],
        );

        let merged = merge(&left, &right, "k", "k", JoinKind::Inner).unwrap();
        assert_eq!(merged.rows.len(), 2);
    }

    #[test]
    fn test_distinct_column_names_not_suffixed() {
        let left = NamedTable::new(
            "l",
            vec!["order_id".to_string()],
            vec![vec![Value::Number(1.0)]],
        );
        let right = NamedTable::new(
            "r",
            vec!["customer_id".to_string()],
            vec![vec![Value::Number(1.0)]],
        );

        let merged = merge(&left, &right, "order_id", "customer_id", JoinKind::Inner).unwrap();
        assert_eq!(merged.columns, vec!["order_id", "customer_id"]);
    }

    #[test]
    fn test_incomparable_key_columns_fail() {
        let left = NamedTable::new(
            "l",
            vec!["k".to_string()],
            vec![vec![Value::Bool(true)]],
        );
        let right = NamedTable::new(
            "r",
            vec!["k".to_string()],
            vec![vec![Value::Number(1.0)]],
        );

        let err = merge(&left, &right, "k", "k", JoinKind::Inner).unwrap_err();
        assert!(matches!(err, MergeError::IncomparableKeys { .. }));
    }

    #[test]
    fn test_zero_matches_is_not_an_error() {
        let left = NamedTable::new(
            "l",
            vec!["k".to_string()],
            vec![vec![Value::Number(1.0)]],
        );
        let right = NamedTable::new(
            "r",
            vec!["k".to_string()],
            vec![vec![Value::Number(2.0)]],
        );

        let merged = merge(&left, &right, "k", "k", JoinKind::Inner).unwrap();
        assert!(merged.rows.is_empty());
    }

    #[test]
    fn test_missing_key_column_fails() {
        let err = merge(&left_table(), &right_table(), "nope", "id", JoinKind::Inner).unwrap_err();
        assert_eq!(
            err,
            MergeError::KeyNotFound {
                table: "orders".to_string(),
                column: "nope".to_string(),
            }
        );
    }

    #[test]
    fn test_self_join_rejected() {
        let t = left_table();
        let err = merge(&t, &t, "id", "id", JoinKind::Inner).unwrap_err();
        assert_eq!(err, MergeError::SameTable("orders".to_string()));
    }

    #[test]
    fn test_nulls_in_key_column_never_match() {
        let left = NamedTable::new(
            "l",
            vec!["k".to_string()],
            vec![vec![Value::Null], vec![Value::Number(1.0)]],
        );
        let right = NamedTable::new(
            "r",
            vec!["k".to_string()],
            vec![vec![Value::Null], vec![Value::Number(1.0)]],
        );

        let merged = merge(&left, &right, "k", "k", JoinKind::Inner).unwrap();
        assert_eq!(merged.rows.len(), 1);
    }
}
