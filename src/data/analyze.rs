use serde::Serialize;

use super::model::{CellValue, Column, Table};
use crate::error::{EdaError, EdaResult, View};

// ---------------------------------------------------------------------------
// Column eligibility
// ---------------------------------------------------------------------------

/// Names of numeric columns in table order. Errors with
/// `SelectionUnavailable` when the table has none, so callers can tell
/// "no numeric data" apart from an empty result.
pub fn eligible_numeric_columns(table: &Table) -> EdaResult<Vec<String>> {
    let names = numeric_names(table);
    if names.is_empty() {
        return Err(EdaError::unavailable(View::Univariate, 0));
    }
    Ok(names)
}

fn numeric_names(table: &Table) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| c.dtype.is_numeric())
        .map(|c| c.name.clone())
        .collect()
}

fn require(table: &Table, view: View) -> EdaResult<Vec<String>> {
    let names = numeric_names(table);
    if names.len() < view.required_columns() {
        return Err(EdaError::unavailable(view, names.len()));
    }
    Ok(names)
}

fn numeric_column<'a>(table: &'a Table, name: &str) -> EdaResult<&'a Column> {
    let column = table
        .column(name)
        .ok_or_else(|| EdaError::Compute(format!("unknown column '{name}'")))?;
    if !column.dtype.is_numeric() {
        return Err(EdaError::Compute(format!(
            "column '{name}' is {}, not numeric",
            column.dtype
        )));
    }
    Ok(column)
}

// ---------------------------------------------------------------------------
// Univariate / bivariate
// ---------------------------------------------------------------------------

/// Non-missing values of one numeric column, in row order. Missing values
/// are dropped, not imputed.
pub fn univariate(table: &Table, column: &str) -> EdaResult<Vec<f64>> {
    require(table, View::Univariate)?;
    Ok(numeric_column(table, column)?.numbers().collect())
}

/// Row-aligned `(x, y)` pairs. Rows where either side is missing are kept
/// as-is; the renderer skips them.
pub fn bivariate(table: &Table, x: &str, y: &str) -> EdaResult<Vec<(Option<f64>, Option<f64>)>> {
    require(table, View::Bivariate)?;
    let xs = numeric_column(table, x)?;
    let ys = numeric_column(table, y)?;
    Ok(xs
        .values
        .iter()
        .zip(&ys.values)
        .map(|(a, b)| (a.as_f64(), b.as_f64()))
        .collect())
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Square Pearson correlation matrix over the numeric columns.
///
/// Symmetric; the diagonal is exactly 1 for columns with nonzero variance.
/// Pairs with fewer than two complete rows, or zero variance on either side,
/// are `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size() + j]
    }
}

/// Pairwise-complete Pearson correlation over numeric columns. Non-numeric
/// columns are left out silently.
pub fn correlation(table: &Table) -> EdaResult<CorrelationMatrix> {
    let names = require(table, View::Correlation)?;
    let columns: Vec<&Column> = names
        .iter()
        .map(|n| numeric_column(table, n))
        .collect::<EdaResult<_>>()?;

    let n = columns.len();
    let mut values = vec![f64::NAN; n * n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&columns[i].values, &columns[j].values);
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: names,
        values,
    })
}

/// Pearson r over rows where both values are present.
fn pearson(a: &[CellValue], b: &[CellValue]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{LoadOptions, parse};

    fn table(s: &str) -> Table {
        parse(s.as_bytes(), &LoadOptions::default()).unwrap()
    }

    fn corr(m: &CorrelationMatrix, a: &str, b: &str) -> f64 {
        let i = m.columns().iter().position(|c| c == a).unwrap();
        let j = m.columns().iter().position(|c| c == b).unwrap();
        m.at(i, j)
    }

    #[test]
    fn test_univariate_drops_missing() {
        let t = table("a,b\n1,2\n3,\n5,6\n");
        assert_eq!(univariate(&t, "b").unwrap(), vec![2.0, 6.0]);
        assert_eq!(univariate(&t, "a").unwrap(), vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_bivariate_keeps_rows_aligned() {
        let t = table("a,b\n1,2\n3,\n5,6\n");
        let pairs = bivariate(&t, "a", "b").unwrap();
        assert_eq!(
            pairs,
            vec![(Some(1.0), Some(2.0)), (Some(3.0), None), (Some(5.0), Some(6.0))]
        );
    }

    #[test]
    fn test_one_numeric_column_limits_views() {
        let t = table("n,label\n1,x\n2,y\n3,z\n");
        assert_eq!(eligible_numeric_columns(&t).unwrap(), vec!["n".to_string()]);
        assert!(univariate(&t, "n").is_ok());

        let err = bivariate(&t, "n", "n").unwrap_err();
        assert!(matches!(
            err,
            EdaError::SelectionUnavailable {
                view: View::Bivariate,
                required: 2,
                available: 1
            }
        ));
        assert!(correlation(&t).unwrap_err().is_unavailable());
    }

    #[test]
    fn test_no_numeric_columns_is_unavailable() {
        let t = table("a,b\n");
        assert!(eligible_numeric_columns(&t).unwrap_err().is_unavailable());
        assert!(univariate(&t, "a").unwrap_err().is_unavailable());
    }

    #[test]
    fn test_unknown_or_text_column_is_compute_error() {
        let t = table("a,b,c\n1,2,x\n2,4,y\n");
        assert!(matches!(univariate(&t, "zzz"), Err(EdaError::Compute(_))));
        assert!(matches!(bivariate(&t, "a", "c"), Err(EdaError::Compute(_))));
    }

    #[test]
    fn test_correlation_symmetric_with_unit_diagonal() {
        let t = table("x,y,z,label\n1,2,9,a\n2,4.5,7,b\n3,5.5,8,c\n4,8,1,d\n,10,0,e\n");
        let m = correlation(&t).unwrap();
        assert_eq!(m.columns(), &["x", "y", "z"]);
        for i in 0..m.size() {
            assert_eq!(m.at(i, i), 1.0);
            for j in 0..m.size() {
                assert_eq!(m.at(i, j), m.at(j, i));
                assert!((-1.0..=1.0).contains(&m.at(i, j)));
            }
        }
        assert!(corr(&m, "x", "y") > 0.9);
        assert!(corr(&m, "y", "z") < 0.0);
    }

    #[test]
    fn test_correlation_perfect_and_constant() {
        let t = table("a,b,c\n1,2,5\n2,4,5\n3,6,5\n");
        let m = correlation(&t).unwrap();
        assert!((corr(&m, "a", "b") - 1.0).abs() < 1e-12);
        assert!(corr(&m, "a", "c").is_nan());
        assert!(corr(&m, "c", "c").is_nan());
    }
}
