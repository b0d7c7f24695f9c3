//! Column profiling: descriptive statistics, inferred types and the
//! missing-value report for a loaded [`Table`].

use std::collections::HashMap;

use serde::Serialize;

use super::model::{CellValue, Column, ColumnType, Table};

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Describe-style statistics for a numeric column. Every field except
/// `count` is `NaN` when the column has no values; `std` is `NaN` below two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl NumericSummary {
    pub fn from_values(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self {
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                p25: f64::NAN,
                p50: f64::NAN,
                p75: f64::NAN,
                max: f64::NAN,
            };
        }

        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = if count < 2 {
            f64::NAN
        } else {
            (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        };

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Self {
            count,
            mean,
            std,
            min: sorted[0],
            p25: percentile(&sorted, 0.25),
            p50: percentile(&sorted, 0.50),
            p75: percentile(&sorted, 0.75),
            max: sorted[count - 1],
        }
    }

    /// `(label, value)` rows in display order.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.p25),
            ("50%", self.p50),
            ("75%", self.p75),
            ("max", self.max),
        ]
    }
}

/// Linear-interpolation percentile of an ascending, non-empty slice.
/// `q` is a fraction in `[0, 1]`.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Count / unique / top / freq for non-numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    /// Most frequent value; the earliest one wins a tie.
    pub top: Option<String>,
    pub freq: usize,
}

impl CategoricalSummary {
    pub fn from_column(column: &Column) -> Self {
        // value -> (count, first row)
        let mut counts: HashMap<&CellValue, (usize, usize)> = HashMap::new();
        for (row, value) in column.values.iter().enumerate() {
            if value.is_null() {
                continue;
            }
            counts.entry(value).or_insert((0, row)).0 += 1;
        }

        let top = counts
            .iter()
            .max_by(|(_, (ca, ra)), (_, (cb, rb))| ca.cmp(cb).then(rb.cmp(ra)));

        Self {
            count: counts.values().map(|(c, _)| c).sum(),
            unique: counts.len(),
            top: top.map(|(v, _)| v.to_string()),
            freq: top.map_or(0, |(_, (c, _))| *c),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    #[serde(serialize_with = "serialize_dtype")]
    pub dtype: ColumnType,
    pub missing: usize,
    pub summary: ColumnSummary,
}

fn serialize_dtype<S: serde::Serializer>(dtype: &ColumnType, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(dtype)
}

impl ColumnProfile {
    pub fn from_column(column: &Column) -> Self {
        let summary = if column.dtype.is_numeric() {
            let values: Vec<f64> = column.numbers().collect();
            ColumnSummary::Numeric(NumericSummary::from_values(&values))
        } else {
            ColumnSummary::Categorical(CategoricalSummary::from_column(column))
        };
        Self {
            name: column.name.clone(),
            dtype: column.dtype,
            missing: column.missing_count(),
            summary,
        }
    }

    pub fn numeric(&self) -> Option<&NumericSummary> {
        match &self.summary {
            ColumnSummary::Numeric(s) => Some(s),
            ColumnSummary::Categorical(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Missing-value report
// ---------------------------------------------------------------------------

/// Missing counts per column, restricted to columns with at least one
/// missing value, in table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MissingReport {
    entries: Vec<(String, usize)>,
}

impl MissingReport {
    pub fn from_profiles(profiles: &[ColumnProfile]) -> Self {
        let entries = profiles
            .iter()
            .filter(|p| p.missing > 0)
            .map(|p| (p.name.clone(), p.missing))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dataset profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnProfile>,
    pub missing: MissingReport,
}

impl DatasetProfile {
    /// Profiles of numeric columns only, for the summary-statistics table.
    pub fn numeric_columns(&self) -> impl Iterator<Item = (&str, &NumericSummary)> {
        self.columns
            .iter()
            .filter_map(|p| p.numeric().map(|s| (p.name.as_str(), s)))
    }
}

/// Profile every column of the table. Never fails; an empty table yields an
/// empty profile.
pub fn profile(table: &Table) -> DatasetProfile {
    let columns: Vec<ColumnProfile> = table
        .columns()
        .iter()
        .map(ColumnProfile::from_column)
        .collect();
    let missing = MissingReport::from_profiles(&columns);

    DatasetProfile {
        row_count: table.row_count(),
        column_count: table.column_count(),
        columns,
        missing,
    }
}
