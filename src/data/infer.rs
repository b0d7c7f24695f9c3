use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::{CellValue, Column, ColumnType};

// ---------------------------------------------------------------------------
// Missing-value tokens
// ---------------------------------------------------------------------------

/// Cell texts read as missing. Matches the default NA set of common
/// dataframe readers.
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_TOKENS: &[&str] = &["True", "true", "TRUE"];
const FALSE_TOKENS: &[&str] = &["False", "false", "FALSE"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Whether a raw cell text denotes a missing value.
pub fn is_na(raw: &str) -> bool {
    NA_TOKENS.contains(&raw)
}

// ---------------------------------------------------------------------------
// Scalar parsers
// ---------------------------------------------------------------------------

pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    if TRUE_TOKENS.contains(&raw) {
        Some(true)
    } else if FALSE_TOKENS.contains(&raw) {
        Some(false)
    } else {
        None
    }
}

/// ISO dates and date-times; RFC 3339 offsets are normalised to UTC.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.naive_utc())
}

// ---------------------------------------------------------------------------
// Column type inference
// ---------------------------------------------------------------------------

/// Infer the type tag of a column from its raw cells (`None` = missing).
///
/// * every present value is a number → `Numeric`
/// * every present value is a true/false token → `Boolean`
/// * every present value is an ISO date/date-time → `Datetime`
/// * otherwise → `Text`
///
/// A column with rows but no present values is `Numeric` (all-NaN float);
/// a column with no rows at all is `Text`.
pub fn infer_column_type(cells: &[Option<&str>]) -> ColumnType {
    if cells.is_empty() {
        return ColumnType::Text;
    }
    let present: Vec<&str> = cells.iter().flatten().copied().collect();

    if present.iter().all(|s| parse_number(s).is_some()) {
        return ColumnType::Numeric;
    }
    if present.iter().all(|s| parse_bool(s).is_some()) {
        return ColumnType::Boolean;
    }
    if present.iter().all(|s| parse_datetime(s).is_some()) {
        return ColumnType::Datetime;
    }
    ColumnType::Text
}

/// Convert one raw cell under an already inferred type.
fn convert_cell(raw: Option<&str>, dtype: ColumnType) -> CellValue {
    let Some(s) = raw else {
        return CellValue::Null;
    };
    let converted = match dtype {
        ColumnType::Numeric => parse_number(s).map(CellValue::Number),
        ColumnType::Boolean => parse_bool(s).map(CellValue::Bool),
        ColumnType::Datetime => parse_datetime(s).map(CellValue::Datetime),
        ColumnType::Text => Some(CellValue::Text(s.to_string())),
    };
    converted.unwrap_or(CellValue::Null)
}

/// Build a typed column from raw cell texts. NA tokens become `Null`.
pub fn build_column(name: String, raw: &[Option<String>]) -> Column {
    let cells: Vec<Option<&str>> = raw
        .iter()
        .map(|c| c.as_deref().filter(|s| !is_na(s)))
        .collect();
    let dtype = infer_column_type(&cells);
    let values = cells.iter().map(|c| convert_cell(*c, dtype)).collect();
    Column {
        name,
        dtype,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_numeric_ignores_missing() {
        let cells = [Some("1"), None, Some("2.5"), Some("-3e2")];
        assert_eq!(infer_column_type(&cells), ColumnType::Numeric);
    }

    #[test]
    fn test_infer_text_when_any_value_is_not_numeric() {
        let cells = [Some("1"), Some("two"), Some("3")];
        assert_eq!(infer_column_type(&cells), ColumnType::Text);
    }

    #[test]
    fn test_infer_bool_and_datetime() {
        assert_eq!(
            infer_column_type(&[Some("True"), Some("false"), None]),
            ColumnType::Boolean
        );
        assert_eq!(
            infer_column_type(&[Some("2024-01-05"), Some("2024-02-01 10:30:00")]),
            ColumnType::Datetime
        );
    }

    #[test]
    fn test_infer_all_missing_and_zero_rows() {
        assert_eq!(infer_column_type(&[None, None]), ColumnType::Numeric);
        assert_eq!(infer_column_type(&[]), ColumnType::Text);
    }

    #[test]
    fn test_build_column_maps_na_tokens() {
        let raw = vec![
            Some("4".to_string()),
            Some("NA".to_string()),
            Some("".to_string()),
            None,
            Some("6".to_string()),
        ];
        let col = build_column("x".into(), &raw);
        assert_eq!(col.dtype, ColumnType::Numeric);
        assert_eq!(col.missing_count(), 3);
        assert_eq!(col.numbers().collect::<Vec<_>>(), vec![4.0, 6.0]);
    }

    #[test]
    fn test_uppercase_nan_is_missing_not_a_number() {
        assert_eq!(parse_number("NAN"), None);
        assert_eq!(parse_number(" 7 "), Some(7.0));
    }
}
