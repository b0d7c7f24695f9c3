use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::export::DOWNLOAD_FILE_NAME;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – upload / download
// ---------------------------------------------------------------------------

/// Render the left panel: file upload, dataset info and download.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("📁 Upload your CSV file");
    ui.separator();

    if ui.button("Choose a file…").clicked() {
        open_file_dialog(state);
    }
    ui.label(RichText::new("or drop a file onto the window").weak().small());
    ui.add_space(8.0);

    let Some(session) = &state.session else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.strong(&session.source);
    ui.label(format!(
        "Rows: {}  |  Columns: {}",
        session.profile.row_count, session.profile.column_count
    ));
    ui.label(format!("Numeric columns: {}", session.numeric_columns().len()));

    ui.add_space(8.0);
    ui.separator();
    ui.heading("⬇ Download Cleaned Data");
    if ui.button("Download CSV").clicked() {
        save_file_dialog(state);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let loaded = state.session.is_some();
            if ui
                .add_enabled(loaded, egui::Button::new("Save cleaned CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(loaded, egui::Button::new("Copy profile as JSON"))
                .clicked()
            {
                copy_profile(ui, state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(format!(
                "{}: {} rows, {} columns",
                session.source, session.profile.row_count, session.profile.column_count
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload a dataset")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download cleaned data")
        .set_file_name(DOWNLOAD_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.save_download(&path) {
            log::error!("Failed to save file: {e:#}");
            state.status_message = Some(format!("Error saving the file: {e:#}"));
        }
    }
}

fn copy_profile(ui: &Ui, state: &mut AppState) {
    let Some(session) = &state.session else {
        return;
    };
    match serde_json::to_string_pretty(&session.profile) {
        Ok(json) => ui.ctx().copy_text(json),
        Err(e) => {
            log::error!("Failed to serialize profile: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
    }
}
