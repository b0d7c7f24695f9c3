pub mod panels;
pub mod plot;
pub mod tables;

use eframe::egui::Ui;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central report
// ---------------------------------------------------------------------------

/// Render every report section for the loaded dataset, top to bottom.
pub fn report(ui: &mut Ui, state: &mut AppState) {
    let Some(session) = &state.session else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("📌 Upload a CSV file to start EDA  (File → Open…)");
        });
        return;
    };

    ui.heading("🔍 Preview Dataset");
    tables::preview(ui, &session.table, state.config.preview_rows);
    ui.label(format!(
        "🧾 Rows: {}  |  Columns: {}",
        session.profile.row_count, session.profile.column_count
    ));
    ui.separator();

    ui.heading("📈 Summary Statistics");
    tables::summary(ui, &session.profile);
    ui.separator();

    ui.columns(2, |cols| {
        cols[0].heading("🧬 Data Types");
        tables::dtypes(&mut cols[0], &session.profile);
        cols[1].heading("❌ Missing Values");
        tables::missing(&mut cols[1], &session.profile);
    });
    ui.separator();

    // Pickers mutate state, so collect choices first and apply afterwards.
    let numeric = session.numeric_columns().to_vec();
    let mut picked_uni = None;
    let mut picked_x = None;
    let mut picked_y = None;

    ui.heading("📊 Univariate Analysis");
    if !numeric.is_empty() {
        picked_uni = plot::column_picker(
            ui,
            "univariate",
            "Select a column",
            state.selection.univariate.as_deref(),
            &numeric,
        );
    }
    if let Some(views) = &state.views {
        match &views.univariate {
            Ok(view) => plot::histogram(ui, view),
            Err(e) => plot::view_error(ui, e),
        }
    }
    ui.separator();

    ui.heading("🔁 Bivariate Analysis");
    if numeric.len() >= 2 {
        picked_x = plot::column_picker(ui, "bivariate_x", "X-axis", state.selection.x.as_deref(), &numeric);
        picked_y = plot::column_picker(ui, "bivariate_y", "Y-axis", state.selection.y.as_deref(), &numeric);
    }
    if let Some(views) = &state.views {
        match &views.bivariate {
            Ok(view) => plot::scatter(ui, view),
            Err(e) => plot::view_error(ui, e),
        }
    }
    ui.separator();

    ui.heading("🔗 Correlation Heatmap");
    match &session.correlation {
        Ok(matrix) => plot::heatmap(ui, matrix, state.config.annotate_heatmap),
        Err(e) => plot::view_error(ui, e),
    }

    if let Some(col) = picked_uni {
        state.set_univariate(col);
    }
    if let Some(col) = picked_x {
        state.set_x(col);
    }
    if let Some(col) = picked_y {
        state.set_y(col);
    }
}
