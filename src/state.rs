use std::path::Path;

use anyhow::{Context, Result};

use crate::config::ViewerConfig;
use crate::data::analyze::{self, CorrelationMatrix};
use crate::data::density::{self, Histogram};
use crate::data::export::{self, Download};
use crate::data::loader;
use crate::data::model::Table;
use crate::data::profile::{self, DatasetProfile};
use crate::data::selection::Selection;
use crate::error::{EdaError, EdaResult};

// ---------------------------------------------------------------------------
// Session – one successfully loaded dataset and its derived views
// ---------------------------------------------------------------------------

/// Everything derived from one upload. Built once, never mutated; the next
/// upload replaces it.
pub struct Session {
    /// File name shown in the UI.
    pub source: String,
    pub table: Table,
    pub profile: DatasetProfile,
    pub numeric: EdaResult<Vec<String>>,
    pub correlation: EdaResult<CorrelationMatrix>,
}

impl Session {
    pub fn new(source: impl Into<String>, table: Table) -> Self {
        let profile = profile::profile(&table);
        let numeric = analyze::eligible_numeric_columns(&table);
        let correlation = analyze::correlation(&table);
        Self {
            source: source.into(),
            table,
            profile,
            numeric,
            correlation,
        }
    }

    pub fn numeric_columns(&self) -> &[String] {
        self.numeric.as_deref().unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Selection-driven views
// ---------------------------------------------------------------------------

pub struct UnivariateView {
    pub column: String,
    pub values: Vec<f64>,
    pub histogram: Histogram,
    /// KDE curve scaled to histogram counts.
    pub kde: Vec<[f64; 2]>,
}

#[derive(Debug)]
pub struct BivariateView {
    pub x: String,
    pub y: String,
    /// Plottable points only.
    pub points: Vec<[f64; 2]>,
    /// Rows left out because one side is missing.
    pub skipped: usize,
}

pub struct Views {
    pub univariate: EdaResult<UnivariateView>,
    pub bivariate: EdaResult<BivariateView>,
}

impl Views {
    pub fn compute(session: &Session, selection: &Selection, config: &ViewerConfig) -> Self {
        Self {
            univariate: univariate_view(session, selection, config),
            bivariate: bivariate_view(session, selection),
        }
    }
}

fn univariate_view(
    session: &Session,
    selection: &Selection,
    config: &ViewerConfig,
) -> EdaResult<UnivariateView> {
    let column = selection.univariate.as_deref().unwrap_or_default();
    let values = analyze::univariate(&session.table, column)?;
    let histogram = density::histogram(&values);
    let scale = values.len() as f64 * histogram.bin_width();
    let kde = density::kde(&values, config.kde_points, scale);
    Ok(UnivariateView {
        column: column.to_string(),
        values,
        histogram,
        kde,
    })
}

/// Rows with a missing side stay in the analyzer output and are only
/// dropped here, when turning pairs into plot points.
fn bivariate_view(session: &Session, selection: &Selection) -> EdaResult<BivariateView> {
    let x = selection.x.as_deref().unwrap_or_default();
    let y = selection.y.as_deref().unwrap_or_default();
    let pairs = analyze::bivariate(&session.table, x, y)?;
    let points: Vec<[f64; 2]> = pairs
        .iter()
        .filter_map(|(x, y)| Some([(*x)?, (*y)?]))
        .collect();
    Ok(BivariateView {
        x: x.to_string(),
        y: y.to_string(),
        skipped: pairs.len() - points.len(),
        points,
    })
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. UI events call the methods
/// below; each replaces the session or the views wholesale.
pub struct AppState {
    pub config: ViewerConfig,

    /// Loaded dataset (None until the user loads a file, or after a failure).
    pub session: Option<Session>,

    /// Column choices for the univariate / bivariate views.
    pub selection: Selection,

    /// Views for the current session and selection (cached).
    pub views: Option<Views>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            session: None,
            selection: Selection::default(),
            views: None,
            status_message: None,
        }
    }

    /// Load a file from disk and install it, or record the error.
    pub fn open_path(&mut self, path: &Path) {
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match loader::load_file(path, &self.config.load_options()) {
            Ok(table) => self.set_table(source, table),
            Err(e) => self.fail_upload(&format!("Error reading the file: {e:#}")),
        }
    }

    /// Upload raw delimited bytes, e.g. from a dropped file.
    pub fn upload_bytes(&mut self, source: &str, bytes: &[u8]) {
        match loader::parse(bytes, &self.config.load_options()) {
            Ok(table) => self.set_table(source.to_string(), table),
            Err(e) => self.fail_upload(&EdaError::from(e).to_string()),
        }
    }

    /// Install a freshly loaded table: profile it, re-validate the selection
    /// and rebuild the views.
    pub fn set_table(&mut self, source: String, table: Table) {
        log::info!(
            "Loaded {source}: {} rows x {} columns",
            table.row_count(),
            table.column_count()
        );
        let session = Session::new(source, table);
        self.selection.revalidate(session.numeric_columns());
        self.session = Some(session);
        self.status_message = None;
        self.refresh_views();
    }

    /// Drop any previous session so old data is never shown next to a new
    /// error.
    fn fail_upload(&mut self, message: &str) {
        log::error!("Failed to load file: {message}");
        self.session = None;
        self.views = None;
        self.selection = Selection::default();
        self.status_message = Some(message.to_string());
    }

    pub fn set_univariate(&mut self, column: String) {
        self.selection.univariate = Some(column);
        self.refresh_views();
    }

    pub fn set_x(&mut self, column: String) {
        self.selection.x = Some(column);
        self.refresh_views();
    }

    pub fn set_y(&mut self, column: String) {
        self.selection.y = Some(column);
        self.refresh_views();
    }

    /// Recompute `views` after a table or selection change.
    pub fn refresh_views(&mut self) {
        self.views = self.session.as_ref().map(|session| {
            log::debug!("Recomputing views for {:?}", self.selection);
            Views::compute(session, &self.selection, &self.config)
        });
    }

    /// Serialize the current table for download.
    pub fn download(&self) -> Option<EdaResult<Download>> {
        self.session
            .as_ref()
            .map(|session| export::download(&session.table))
    }

    /// Write the current table to `path` as CSV.
    pub fn save_download(&self, path: &Path) -> Result<()> {
        let download = self
            .download()
            .context("no dataset loaded")?
            .context("serializing dataset")?;
        std::fs::write(path, &download.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!(
            "Saved {} ({}, {} bytes) to {}",
            download.file_name,
            download.content_type,
            download.bytes.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(csv: &str) -> AppState {
        let mut state = AppState::default();
        state.upload_bytes("test.csv", csv.as_bytes());
        state
    }

    #[test]
    fn test_upload_builds_session_and_views() {
        let state = loaded("a,b\n1,2\n3,\n5,6\n");
        let session = state.session.as_ref().unwrap();
        assert_eq!(session.profile.row_count, 3);
        assert_eq!(session.numeric_columns(), &["a", "b"]);
        assert!(session.correlation.is_ok());
        assert_eq!(state.selection.univariate.as_deref(), Some("a"));

        let views = state.views.as_ref().unwrap();
        let uni = views.univariate.as_ref().unwrap();
        assert_eq!(uni.values, vec![1.0, 3.0, 5.0]);
        let bi = views.bivariate.as_ref().unwrap();
        assert_eq!(bi.points, vec![[1.0, 2.0], [5.0, 6.0]]);
        assert_eq!(bi.skipped, 1);
    }

    #[test]
    fn test_selection_change_recomputes_univariate() {
        let mut state = loaded("a,b\n1,2\n3,\n5,6\n");
        state.set_univariate("b".to_string());
        let uni = state.views.as_ref().unwrap().univariate.as_ref().unwrap();
        assert_eq!(uni.column, "b");
        assert_eq!(uni.values, vec![2.0, 6.0]);
    }

    #[test]
    fn test_failed_upload_clears_previous_session() {
        let mut state = loaded("a,b\n1,2\n");
        state.upload_bytes("bad.csv", b"a,b\n1,\"2\n");
        assert!(state.session.is_none());
        assert!(state.views.is_none());
        assert_eq!(state.selection, Selection::default());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.contains("unterminated"), "{msg}");
    }

    #[test]
    fn test_new_upload_replaces_session_and_revalidates() {
        let mut state = loaded("a,b\n1,2\n3,4\n");
        state.set_x("b".to_string());
        state.upload_bytes("next.csv", b"b,c,label\n1,2,x\n2,3,y\n");
        assert!(state.status_message.is_none());
        assert_eq!(state.session.as_ref().unwrap().source, "next.csv");
        assert_eq!(state.selection.x.as_deref(), Some("b"));
        assert_eq!(state.selection.univariate.as_deref(), Some("b"));
        // "b" was the default y and is still numeric
        assert_eq!(state.selection.y.as_deref(), Some("b"));
    }

    #[test]
    fn test_single_numeric_column_marks_views_unavailable() {
        let state = loaded("n,label\n1,x\n2,y\n");
        let session = state.session.as_ref().unwrap();
        assert!(session.correlation.as_ref().unwrap_err().is_unavailable());
        let views = state.views.as_ref().unwrap();
        assert!(views.univariate.is_ok());
        assert!(views.bivariate.as_ref().unwrap_err().is_unavailable());
    }

    #[test]
    fn test_download_requires_session() {
        assert!(AppState::default().download().is_none());
        let state = loaded("a\n1\n");
        let d = state.download().unwrap().unwrap();
        assert_eq!(d.file_name, "cleaned_data.csv");
    }
}
