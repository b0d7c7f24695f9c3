use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};

// ---------------------------------------------------------------------------
// CellValue – a single cell of a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value. `Null` is the missing-value marker.
/// Frequency counting keys maps by `CellValue`, so it must be `Eq` and `Hash`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(f64),
    Datetime(NaiveDateTime),
    Text(String),
}

// -- Manual Eq/Hash so we can count CellValues in a HashMap --

/// Bit pattern used to compare and hash numbers: `-0.0` folds into `0.0` and
/// every NaN into one canonical NaN, so equality stays reflexive and agrees
/// with the hash.
fn number_key(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Null, CellValue::Null) => true,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Number(a), CellValue::Number(b)) => number_key(*a) == number_key(*b),
            (CellValue::Datetime(a), CellValue::Datetime(b)) => a == b,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Number(f) => number_key(*f).hash(state),
            CellValue::Datetime(d) => d.hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

/// Renders the value the way it is written back to CSV: numbers in their
/// shortest round-trippable form, booleans pandas-style, missing as empty.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Datetime(d) if d.time() == NaiveTime::MIN => {
                write!(f, "{}", d.format("%Y-%m-%d"))
            }
            CellValue::Datetime(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S%.f")),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Label for table cells: like `Display`, but missing shows as `NaN`.
    pub fn preview_label(&self) -> String {
        match self {
            CellValue::Null => "NaN".to_string(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnType – the inferred type tag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Numeric,
    Boolean,
    Datetime,
    Text,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        self == ColumnType::Numeric
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Numeric => "float64",
            ColumnType::Boolean => "bool",
            ColumnType::Datetime => "datetime64",
            ColumnType::Text => "object",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Column / Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Non-missing numeric values, in row order.
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(CellValue::as_f64)
    }
}

/// A loaded dataset: ordered, equally long columns. Never mutated after
/// construction; a new upload replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table from columns. Shorter columns are padded with `Null`
    /// so every column ends up `row_count` long.
    pub fn new(mut columns: Vec<Column>) -> Self {
        let row_count = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        for column in &mut columns {
            column.values.resize(row_count, CellValue::Null);
        }
        Table { columns, row_count }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell at `(row, col)`; `None` when out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.columns.get(col)?.values.get(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, values: Vec<CellValue>) -> Column {
        Column {
            name: name.to_string(),
            dtype: ColumnType::Numeric,
            values,
        }
    }

    #[test]
    fn test_table_pads_short_columns() {
        let a = col("a", vec![CellValue::Number(1.0), CellValue::Number(2.0)]);
        let b = col("b", vec![CellValue::Number(1.0)]);
        let table = Table::new(vec![a, b]);
        assert_eq!(table.row_count(), 2);
        assert!(table.columns().iter().all(|c| c.values.len() == 2));
        assert_eq!(table.cell(1, 1), Some(&CellValue::Null));
    }

    #[test]
    fn test_display_formats() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Bool(true).to_string(), "True");
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Null.preview_label(), "NaN");

        let d = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(CellValue::Datetime(d).to_string(), "2024-03-01");
    }

    #[test]
    fn test_number_equality_agrees_with_hash() {
        use std::collections::HashMap;

        let zero = CellValue::Number(0.0);
        let neg_zero = CellValue::Number(-0.0);
        let nan = CellValue::Number(f64::NAN);
        assert_eq!(zero, neg_zero);
        assert_eq!(nan, nan.clone());
        assert_ne!(zero, CellValue::Text("0".into()));

        let mut counts: HashMap<&CellValue, usize> = HashMap::new();
        for v in [&zero, &neg_zero, &nan, &nan] {
            *counts.entry(v).or_default() += 1;
        }
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&zero], 2);
        assert_eq!(counts[&nan], 2);
    }
}
