//! Cell value model
//!
//! Spreadsheet cells are loosely typed at parse time, so a cell is a tagged
//! variant over the kinds we care about. Join-key matching has explicit
//! coercion rules: same kind compares by value, numeric-looking text can be
//! compared against numbers, and null never matches anything.

use chrono::NaiveDateTime;
use std::fmt;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent/empty cell
    Null,
    Number(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
}

/// The kind of a value, used to decide whether two key columns are comparable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Number,
    Text,
    Bool,
    DateTime,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Number => "number",
            ValueKind::Text => "text",
            ValueKind::Bool => "bool",
            ValueKind::DateTime => "datetime",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Whether two key-column kinds have a defined comparison rule
///
/// Same kind always compares. Text can be coerced to number for comparison.
/// Everything else is incomparable and makes a merge fail up front.
pub fn kinds_comparable(a: ValueKind, b: ValueKind) -> bool {
    if a == b {
        return true;
    }
    matches!(
        (a, b),
        (ValueKind::Number, ValueKind::Text) | (ValueKind::Text, ValueKind::Number)
    )
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Number(_) => ValueKind::Number,
            Value::Text(_) => ValueKind::Text,
            Value::Bool(_) => ValueKind::Bool,
            Value::DateTime(_) => ValueKind::DateTime,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Join-key equality with coercion
    ///
    /// Null matches nothing, including another null (SQL-style). Text paired
    /// with a number is parsed and compared numerically; unparseable text is
    /// simply a non-match, not an error.
    pub fn join_matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => false,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Number(n), Value::Text(t)) | (Value::Text(t), Value::Number(n)) => {
                t.trim().parse::<f64>().map(|p| p == *n).unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Text shown in table views
    pub fn display_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Number(n) => {
                // Integral floats render without the trailing ".0"
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Text written to CSV exports: nulls become empty fields, datetimes ISO-8601
    pub fn export_text(&self) -> String {
        match self {
            Value::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            other => other.display_text(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_same_kind_matches_by_value() {
        assert!(Value::Number(5.0).join_matches(&Value::Number(5.0)));
        assert!(!Value::Number(5.0).join_matches(&Value::Number(6.0)));
        assert!(Value::Text("x".into()).join_matches(&Value::Text("x".into())));
        assert!(!Value::Text("x".into()).join_matches(&Value::Text("X".into())));
        assert!(Value::Bool(true).join_matches(&Value::Bool(true)));
    }

    #[test]
    fn test_null_never_matches() {
        assert!(!Value::Null.join_matches(&Value::Null));
        assert!(!Value::Null.join_matches(&Value::Number(0.0)));
        assert!(!Value::Text(String::new()).join_matches(&Value::Null));
    }

    #[test]
    fn test_text_number_coercion() {
        assert!(Value::Text("42".into()).join_matches(&Value::Number(42.0)));
        assert!(Value::Number(3.5).join_matches(&Value::Text(" 3.5 ".into())));
        assert!(!Value::Text("abc".into()).join_matches(&Value::Number(42.0)));
    }

    #[test]
    fn test_cross_kind_without_rule_is_non_match() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(!Value::DateTime(dt).join_matches(&Value::Text("2024-01-01".into())));
        assert!(!Value::Bool(true).join_matches(&Value::Number(1.0)));
    }

    #[test]
    fn test_kinds_comparable() {
        assert!(kinds_comparable(ValueKind::Number, ValueKind::Number));
        assert!(kinds_comparable(ValueKind::Text, ValueKind::Number));
        assert!(kinds_comparable(ValueKind::Number, ValueKind::Text));
        assert!(!kinds_comparable(ValueKind::Bool, ValueKind::Number));
        assert!(!kinds_comparable(ValueKind::DateTime, ValueKind::Text));
    }

    #[test]
    fn test_display_text() {
        assert_eq!(Value::Number(42.0).display_text(), "42");
        assert_eq!(Value::Number(1.5).display_text(), "1.5");
        assert_eq!(Value::Null.display_text(), "");
        assert_eq!(Value::Bool(false).display_text(), "false");
    }
}
