use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Ingestion errors
// ---------------------------------------------------------------------------

/// Why an uploaded file could not be turned into a [`Table`](crate::data::model::Table).
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no columns to parse from file (input is empty)")]
    Empty,

    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },

    #[error("expected {expected} fields on line {line}, saw {found}")]
    TooManyFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

// ---------------------------------------------------------------------------
// Pipeline errors
// ---------------------------------------------------------------------------

/// The analysis views that depend on numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Univariate,
    Bivariate,
    Correlation,
}

impl View {
    /// Minimum number of numeric columns the view needs.
    pub fn required_columns(self) -> usize {
        match self {
            View::Univariate => 1,
            View::Bivariate | View::Correlation => 2,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Univariate => write!(f, "univariate"),
            View::Bivariate => write!(f, "bivariate"),
            View::Correlation => write!(f, "correlation"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EdaError {
    #[error("Error reading the file: {0}")]
    Parse(#[from] ParseError),

    /// Not enough numeric columns for a view. The UI hides the view rather
    /// than reporting this as a failure.
    #[error("{view} view needs at least {required} numeric column(s), found {available}")]
    SelectionUnavailable {
        view: View,
        required: usize,
        available: usize,
    },

    #[error("{0}")]
    Compute(String),
}

impl EdaError {
    pub fn unavailable(view: View, available: usize) -> Self {
        EdaError::SelectionUnavailable {
            view,
            required: view.required_columns(),
            available,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, EdaError::SelectionUnavailable { .. })
    }
}

pub type EdaResult<T> = std::result::Result<T, EdaError>;
