//! Workbook loading
//!
//! Reads every sheet of an `.xlsx`/`.xls` file into `NamedTable`s via the
//! calamine crate. The first row of each sheet supplies the column names;
//! blank header cells get positional names. Rows shorter than the header are
//! padded with nulls so every row matches the column set.

use crate::model::{NamedTable, Value};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use thiserror::Error;

/// Errors surfaced to the user on the Upload step
///
/// None of these mutate session state; the user just corrects the path and
/// retries.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension '{0}' (expected .xlsx or .xls)")]
    UnsupportedExtension(String),

    #[error("failed to open workbook: {0}")]
    Open(#[from] calamine::Error),

    #[error("failed to read sheet '{name}': {source}")]
    Sheet {
        name: String,
        source: calamine::Error,
    },

    #[error("the workbook contains no sheets")]
    NoSheets,

    #[error("every sheet in the workbook is empty")]
    AllSheetsEmpty,
}

/// Load every sheet of the workbook at `path`, in workbook order
pub fn load_workbook(path: &Path) -> Result<Vec<NamedTable>, LoadError> {
    check_extension(path)?;

    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_owned();
    if sheet_names.is_empty() {
        return Err(LoadError::NoSheets);
    }

    let mut tables = Vec::new();
    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|source| LoadError::Sheet {
                name: name.clone(),
                source,
            })?;

        let mut rows_iter = range.rows();
        let header_row = match rows_iter.next() {
            Some(row) => row,
            None => continue, // empty sheet
        };

        let columns: Vec<String> = header_row
            .iter()
            .enumerate()
            .map(|(i, cell)| header_name(cell, i))
            .collect();

        let rows: Vec<Vec<Value>> = rows_iter
            .map(|row| {
                let mut values: Vec<Value> = row.iter().map(cell_value).collect();
                values.resize(columns.len(), Value::Null);
                values.truncate(columns.len());
                values
            })
            .collect();

        tables.push(NamedTable::new(name, columns, rows));
    }

    if tables.is_empty() {
        return Err(LoadError::AllSheetsEmpty);
    }
    Ok(tables)
}

fn check_extension(path: &Path) -> Result<(), LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xls" => Ok(()),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

/// Column name from a header cell, falling back to a positional name
fn header_name(cell: &Data, index: usize) -> String {
    let text = match cell_value(cell) {
        Value::Null => String::new(),
        v => v.display_text(),
    };
    if text.trim().is_empty() {
        format!("column_{}", index + 1)
    } else {
        text.trim().to_string()
    }
}

/// Map a calamine cell into our value model
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::Text(s.clone()),
        Data::Float(f) => Value::Number(*f),
        Data::Int(i) => Value::Number(*i as f64),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Value::DateTime(naive),
            None => Value::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Value::DateTime)
            .unwrap_or_else(|| Value::Text(s.clone())),
        Data::DurationIso(s) => Value::Text(s.clone()),
        // Formula errors (#DIV/0! and friends) carry no usable value
        Data::Error(_) => Value::Null,
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_mapping() {
        assert_eq!(cell_value(&Data::Empty), Value::Null);
        assert_eq!(cell_value(&Data::Float(2.5)), Value::Number(2.5));
        assert_eq!(cell_value(&Data::Int(7)), Value::Number(7.0));
        assert_eq!(cell_value(&Data::Bool(true)), Value::Bool(true));
        assert_eq!(
            cell_value(&Data::String("hi".to_string())),
            Value::Text("hi".to_string())
        );
    }

    #[test]
    fn test_iso_datetime_cells() {
        let v = cell_value(&Data::DateTimeIso("2024-03-01T12:30:00".to_string()));
        match v {
            Value::DateTime(dt) => {
                assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-03-01 12:30")
            }
            other => panic!("expected datetime, got {:?}", other),
        }

        // Date-only ISO strings become midnight datetimes
        assert!(matches!(
            cell_value(&Data::DateTimeIso("2024-03-01".to_string())),
            Value::DateTime(_)
        ));

        // Unparseable strings fall back to text
        assert_eq!(
            cell_value(&Data::DateTimeIso("not a date".to_string())),
            Value::Text("not a date".to_string())
        );
    }

    #[test]
    fn test_header_name_fallback() {
        assert_eq!(header_name(&Data::String("id".to_string()), 0), "id");
        assert_eq!(header_name(&Data::Empty, 2), "column_3");
        assert_eq!(header_name(&Data::String("  ".to_string()), 0), "column_1");
        assert_eq!(header_name(&Data::Int(2024), 0), "2024");
    }

    #[test]
    fn test_extension_check() {
        assert!(check_extension(Path::new("book.xlsx")).is_ok());
        assert!(check_extension(Path::new("Book.XLS")).is_ok());
        assert!(matches!(
            check_extension(Path::new("data.csv")),
            Err(LoadError::UnsupportedExtension(_))
        ));
        assert!(matches!(
            check_extension(Path::new("noext")),
            Err(LoadError::UnsupportedExtension(_))
        ));
    }
}
