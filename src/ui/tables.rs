use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Table;
use crate::data::profile::{ColumnSummary, DatasetProfile};

// ---------------------------------------------------------------------------
// Generic read-only grid
// ---------------------------------------------------------------------------

/// Render a static table. `cell(row, col)` supplies each cell's text.
fn grid(ui: &mut Ui, id: &str, header: &[String], rows: usize, cell: impl Fn(usize, usize) -> String) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .columns(Column::auto().at_least(60.0), header.len())
            .header(20.0, |mut row| {
                for h in header {
                    row.col(|ui: &mut Ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|mut body| {
                for r in 0..rows {
                    body.row(18.0, |mut row| {
                        for c in 0..header.len() {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell(r, c));
                            });
                        }
                    });
                }
            });
    });
}

fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.4}")
    }
}

// ---------------------------------------------------------------------------
// Report tables
// ---------------------------------------------------------------------------

/// First `rows` rows with a leading index column.
pub fn preview(ui: &mut Ui, table: &Table, rows: usize) {
    let mut header = vec![String::new()];
    header.extend(table.column_names().map(str::to_string));
    let shown = rows.min(table.row_count());

    grid(ui, "preview", &header, shown, |r, c| {
        if c == 0 {
            r.to_string()
        } else {
            table
                .cell(r, c - 1)
                .map(|v| v.preview_label())
                .unwrap_or_default()
        }
    });
}

/// Describe-style statistics. Numeric columns when there are any, otherwise
/// count / unique / top / freq of the remaining columns.
pub fn summary(ui: &mut Ui, profile: &DatasetProfile) {
    let numeric: Vec<_> = profile.numeric_columns().collect();

    if !numeric.is_empty() {
        let mut header = vec![String::new()];
        header.extend(numeric.iter().map(|(name, _)| name.to_string()));
        let labels = numeric[0].1.rows().map(|(label, _)| label);

        grid(ui, "summary", &header, labels.len(), |r, c| {
            if c == 0 {
                labels[r].to_string()
            } else {
                let (label, value) = numeric[c - 1].1.rows()[r];
                if label == "count" {
                    format!("{}", value as usize)
                } else {
                    fmt_stat(value)
                }
            }
        });
        return;
    }

    let categorical: Vec<_> = profile
        .columns
        .iter()
        .filter_map(|p| match &p.summary {
            ColumnSummary::Categorical(s) => Some((p.name.as_str(), s)),
            ColumnSummary::Numeric(_) => None,
        })
        .collect();
    if categorical.is_empty() {
        ui.label(RichText::new("No columns to summarise.").weak());
        return;
    }

    let mut header = vec![String::new()];
    header.extend(categorical.iter().map(|(name, _)| name.to_string()));
    const LABELS: [&str; 4] = ["count", "unique", "top", "freq"];

    grid(ui, "summary_categorical", &header, LABELS.len(), |r, c| {
        if c == 0 {
            return LABELS[r].to_string();
        }
        let s = categorical[c - 1].1;
        match r {
            0 => s.count.to_string(),
            1 => s.unique.to_string(),
            2 => s.top.clone().unwrap_or_else(|| "NaN".to_string()),
            _ => s.freq.to_string(),
        }
    });
}

pub fn dtypes(ui: &mut Ui, profile: &DatasetProfile) {
    let header = vec!["column".to_string(), "dtype".to_string()];
    grid(ui, "dtypes", &header, profile.columns.len(), |r, c| {
        let p = &profile.columns[r];
        if c == 0 {
            p.name.clone()
        } else {
            p.dtype.to_string()
        }
    });
}

pub fn missing(ui: &mut Ui, profile: &DatasetProfile) {
    if profile.missing.is_empty() {
        ui.label("No missing values.");
        return;
    }
    let entries = profile.missing.entries();
    let header = vec!["column".to_string(), "missing".to_string()];
    grid(ui, "missing", &header, entries.len(), |r, c| {
        let (name, count) = &entries[r];
        if c == 0 {
            name.clone()
        } else {
            count.to_string()
        }
    });
}
