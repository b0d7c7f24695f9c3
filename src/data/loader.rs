use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::infer::build_column;
use super::model::Table;
use crate::error::ParseError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Options for delimited-text ingestion.
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – delimited text using `options.delimiter`
/// * `.tsv`          – tab-separated text
/// * `.json`         – `[{ "col": value, ... }, ...]`
/// * `.parquet`      – any flat Arrow schema
///
/// The file handle lives only for the duration of this call.
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" | "" => {
            let bytes = std::fs::read(path).context("reading delimited file")?;
            Ok(parse(&bytes, options)?)
        }
        "tsv" | "tab" => {
            let bytes = std::fs::read(path).context("reading TSV file")?;
            Ok(parse(&bytes, &LoadOptions { delimiter: b'\t' })?)
        }
        "json" => {
            let bytes = std::fs::read(path).context("reading JSON file")?;
            parse_json(&bytes)
        }
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Parse raw uploaded bytes as delimited text with a header row.
///
/// Blank lines are skipped by the reader, short rows are padded with
/// missing values and NA tokens become `Null`. Fails on empty input, an
/// unterminated quoted field, or a row with more fields than the header.
/// Nothing is returned on failure.
pub fn parse(bytes: &[u8], options: &LoadOptions) -> std::result::Result<Table, ParseError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::Empty);
    }
    check_quotes(bytes, options.delimiter)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = normalise_headers(reader.headers()?.iter());
    let width = headers.len();
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); width];

    for result in reader.records() {
        let record = result?;
        if record.len() > width {
            let line = record.position().map_or(0, |p| p.line() as usize);
            return Err(ParseError::TooManyFields {
                line,
                expected: width,
                found: record.len(),
            });
        }
        for (i, column) in cells.iter_mut().enumerate() {
            column.push(record.get(i).map(str::to_string));
        }
    }

    Ok(assemble(headers, cells))
}

fn assemble(headers: Vec<String>, cells: Vec<Vec<Option<String>>>) -> Table {
    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| build_column(name, &raw))
        .collect();
    Table::new(columns)
}

// ---------------------------------------------------------------------------
// Delimited-text helpers
// ---------------------------------------------------------------------------

/// Reject input whose last quoted field is never closed. A quote only opens
/// a quoted field at the start of a field; `""` inside one is an escape.
fn check_quotes(bytes: &[u8], delimiter: u8) -> std::result::Result<(), ParseError> {
    let mut line = 1;
    let mut open_line = 0;
    let mut in_quotes = false;
    let mut field_start = true;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if in_quotes {
            match b {
                b'"' if bytes.get(i + 1) == Some(&b'"') => i += 1,
                b'"' => in_quotes = false,
                b'\n' => line += 1,
                _ => {}
            }
        } else if b == b'\n' {
            line += 1;
            field_start = true;
        } else if b == b'\r' || b == delimiter {
            field_start = true;
        } else {
            if b == b'"' && field_start {
                in_quotes = true;
                open_line = line;
            }
            field_start = false;
        }
        i += 1;
    }

    if in_quotes {
        return Err(ParseError::UnterminatedQuote { line: open_line });
    }
    Ok(())
}

/// Name blank headers `Unnamed: {i}` and suffix repeats as `name.1`, `name.2`.
fn normalise_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::new();
    for (i, h) in raw.enumerate() {
        let base = if h.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            h.to_string()
        };
        let mut name = base.clone();
        while let Some(count) = seen.get_mut(&name) {
            *count += 1;
            name = format!("{base}.{count}");
        }
        seen.insert(name.clone(), 0);
        out.push(name);
    }
    out
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "height": 171.2, "group": "A", "smoker": false },
///   { "height": null,  "group": "B" }
/// ]
/// ```
///
/// A column is created the first time its key is seen; absent keys are
/// missing.
fn parse_json(bytes: &[u8]) -> Result<Table> {
    let root: JsonValue = serde_json::from_slice(bytes).context("parsing JSON")?;
    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut cells: Vec<Vec<Option<String>>> = Vec::new();

    for (row, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {row} is not a JSON object"))?;

        for (key, val) in obj {
            let col = *index.entry(key.clone()).or_insert_with(|| {
                headers.push(key.clone());
                cells.push(vec![None; row]);
                headers.len() - 1
            });
            cells[col].push(json_to_raw(val));
        }
        for column in &mut cells {
            column.resize(row + 1, None);
        }
    }

    Ok(assemble(headers, cells))
}

fn json_to_raw(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with a flat schema. Every Arrow column is rendered to
/// text and re-inferred so all formats share one type model.
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, column) in cells.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                if array.is_null(row) {
                    column.push(None);
                    continue;
                }
                let text = array_value_to_string(array.as_ref(), row)
                    .with_context(|| format!("Row {row}: failed to read '{}'", headers[col_idx]))?;
                column.push(Some(text));
            }
        }
    }

    Ok(assemble(headers, cells))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, ColumnType};

    fn parse_str(s: &str) -> std::result::Result<Table, ParseError> {
        parse(s.as_bytes(), &LoadOptions::default())
    }

    #[test]
    fn test_parse_with_missing_value() {
        let table = parse_str("a,b\n1,2\n3,\n5,6\n").unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 2);

        let a = table.column("a").unwrap();
        let b = table.column("b").unwrap();
        assert_eq!(a.dtype, ColumnType::Numeric);
        assert_eq!(a.numbers().collect::<Vec<_>>(), vec![1.0, 3.0, 5.0]);
        assert_eq!(
            b.values,
            vec![CellValue::Number(2.0), CellValue::Null, CellValue::Number(6.0)]
        );
    }

    #[test]
    fn test_header_only_input_has_zero_rows() {
        let table = parse_str("a,b\n").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
        assert!(table.columns().iter().all(|c| c.values.is_empty()));
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(matches!(parse_str(""), Err(ParseError::Empty)));
        assert!(matches!(parse_str(" \n\n"), Err(ParseError::Empty)));
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        let err = parse_str("a,b\n1,\"oops\n3,4\n").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedQuote { line: 2 }));
    }

    #[test]
    fn test_quotes_inside_fields() {
        let table = parse_str("name,size\n\"Smith, J\",5\"\n\"say \"\"hi\"\"\",6\n").unwrap();
        let name = table.column("name").unwrap();
        assert_eq!(name.values[0], CellValue::Text("Smith, J".into()));
        assert_eq!(name.values[1], CellValue::Text("say \"hi\"".into()));
        // a bare quote mid-field is literal
        assert_eq!(table.column("size").unwrap().dtype, ColumnType::Text);
    }

    #[test]
    fn test_too_many_fields_is_an_error() {
        let err = parse_str("a,b\n1,2\n3,4,5\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::TooManyFields {
                line: 3,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = parse_str("a,b,c\n1,2\n4,5,6\n").unwrap();
        assert_eq!(table.cell(0, 2), Some(&CellValue::Null));
        assert_eq!(table.cell(1, 2), Some(&CellValue::Number(6.0)));
    }

    #[test]
    fn test_headers_are_normalised() {
        let table = parse_str(",a,a,b\n1,2,3,4\n").unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["Unnamed: 0", "a", "a.1", "b"]);
    }

    #[test]
    fn test_bom_and_blank_lines() {
        let table = parse(b"\xEF\xBB\xBFx,y\n1,2\n\n3,4\n", &LoadOptions::default()).unwrap();
        assert_eq!(table.column_names().next(), Some("x"));
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_custom_delimiter() {
        let opts = LoadOptions { delimiter: b';' };
        let table = parse(b"a;b\n1,5;x\n", &opts).unwrap();
        assert_eq!(table.column("a").unwrap().dtype, ColumnType::Text);
        assert_eq!(table.column("b").unwrap().dtype, ColumnType::Text);
    }

    #[test]
    fn test_parse_json_records() {
        let json = br#"[{"a": 1, "b": "x"}, {"a": null, "c": true}, {"a": 2.5}]"#;
        let table = parse_json(json).unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(table.row_count(), 3);
        let a = table.column("a").unwrap();
        assert_eq!(a.dtype, ColumnType::Numeric);
        assert_eq!(a.missing_count(), 1);
        let c = table.column("c").unwrap();
        assert_eq!(c.dtype, ColumnType::Boolean);
        assert_eq!(c.values, vec![CellValue::Null, CellValue::Bool(true), CellValue::Null]);
    }

    #[test]
    fn test_parse_json_rejects_non_array() {
        assert!(parse_json(br#"{"a": 1}"#).is_err());
    }

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("rusty-eda-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_file_dispatches_on_extension() {
        let tsv = write_temp("data.tsv", "a\tb\n1\t2\n3\t\n");
        let table = load_file(&tsv, &LoadOptions::default()).unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("b").unwrap().missing_count(), 1);

        let json = write_temp("data.json", r#"[{"x": 1}, {"x": 2}]"#);
        let table = load_file(&json, &LoadOptions::default()).unwrap();
        assert_eq!(table.row_count(), 2);

        std::fs::remove_file(tsv).ok();
        std::fs::remove_file(json).ok();
    }

    #[test]
    fn test_load_parquet_infers_types_and_nulls() {
        use std::sync::Arc;

        use arrow::array::{ArrayRef, BooleanArray, Float64Array, StringArray};
        use arrow::datatypes::{DataType, Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("age", DataType::Float64, true),
            Field::new("smoker", DataType::Boolean, false),
            Field::new("visit", DataType::Utf8, true),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Float64Array::from(vec![Some(45.0), None, Some(31.5)])),
            Arc::new(BooleanArray::from(vec![true, false, true])),
            Arc::new(StringArray::from(vec![Some("2024-01-02"), Some("2024-02-03"), None])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let path = std::env::temp_dir().join(format!("rusty-eda-{}-data.parquet", std::process::id()));
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path, &LoadOptions::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.row_count(), 3);
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["age", "smoker", "visit"]);

        let age = table.column("age").unwrap();
        assert_eq!(age.dtype, ColumnType::Numeric);
        assert_eq!(age.missing_count(), 1);
        assert_eq!(age.numbers().collect::<Vec<_>>(), vec![45.0, 31.5]);

        let smoker = table.column("smoker").unwrap();
        assert_eq!(smoker.dtype, ColumnType::Boolean);
        assert_eq!(smoker.values[1], CellValue::Bool(false));

        let visit = table.column("visit").unwrap();
        assert_eq!(visit.dtype, ColumnType::Datetime);
        assert_eq!(visit.missing_count(), 1);
        assert_eq!(visit.values[0].to_string(), "2024-01-02");
    }

    #[test]
    fn test_load_file_rejects_unknown_extension() {
        let path = write_temp("data.xlsx", "a,b\n1,2\n");
        let err = load_file(&path, &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
        std::fs::remove_file(path).ok();
    }
}
