use eframe::egui::{self, Align2, Color32, FontId, Rect, RichText, Sense, Ui, vec2};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{self, HISTOGRAM_FILL};
use crate::data::analyze::CorrelationMatrix;
use crate::error::EdaError;
use crate::state::{BivariateView, UnivariateView};

const PLOT_HEIGHT: f32 = 300.0;

/// Explain why a view is missing. Unavailable views get a muted note,
/// anything else is shown as an error.
pub fn view_error(ui: &mut Ui, err: &EdaError) {
    if err.is_unavailable() {
        ui.label(RichText::new(err.to_string()).weak());
    } else {
        ui.label(RichText::new(format!("Error: {err}")).color(Color32::RED));
    }
}

// ---------------------------------------------------------------------------
// Histogram + KDE
// ---------------------------------------------------------------------------

pub fn histogram(ui: &mut Ui, view: &UnivariateView) {
    if view.values.is_empty() {
        ui.label(RichText::new(format!("'{}' has no non-missing values.", view.column)).weak());
        return;
    }

    let width = view.histogram.bin_width();
    let bars: Vec<Bar> = view
        .histogram
        .bars()
        .map(|(center, count)| Bar::new(center, count as f64).width(width))
        .collect();
    let kde: PlotPoints = view.kde.iter().copied().collect();

    Plot::new("histogram_plot")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(view.column.as_str())
        .y_axis_label("Count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(HISTOGRAM_FILL)
                    .name(&view.column),
            );
            if !view.kde.is_empty() {
                plot_ui.line(
                    Line::new(kde)
                        .color(Color32::from_rgb(70, 130, 180))
                        .width(2.0)
                        .name("KDE"),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

pub fn scatter(ui: &mut Ui, view: &BivariateView) {
    if view.skipped > 0 {
        ui.label(
            RichText::new(format!("{} row(s) with a missing value not plotted.", view.skipped))
                .weak(),
        );
    }
    let points: PlotPoints = view.points.iter().copied().collect();

    Plot::new("scatter_plot")
        .height(PLOT_HEIGHT)
        .x_axis_label(view.x.as_str())
        .y_axis_label(view.y.as_str())
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .radius(2.5)
                    .color(Color32::from_rgb(31, 119, 180))
                    .name(format!("{} vs {}", view.y, view.x)),
            );
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn truncate(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

/// Annotated heatmap painted cell by cell; hovering a cell shows the pair.
pub fn heatmap(ui: &mut Ui, matrix: &CorrelationMatrix, annotate: bool) {
    let n = matrix.size();
    let label_width = 110.0;
    let cell = ((ui.available_width() - label_width) / n as f32).clamp(28.0, 72.0);
    let size = vec2(label_width + cell * n as f32, cell * n as f32 + 24.0);

    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let font = FontId::proportional(12.0);
    let text_color = ui.visuals().text_color();
    let max_chars = ((cell / 7.0) as usize).max(3);

    let cell_rect = |i: usize, j: usize| {
        Rect::from_min_size(
            origin + vec2(label_width + cell * j as f32, cell * i as f32),
            vec2(cell, cell),
        )
    };

    for (i, row_name) in matrix.columns().iter().enumerate() {
        for j in 0..n {
            let r = matrix.at(i, j);
            let rect = cell_rect(i, j);
            let fill = color::coolwarm(r);
            painter.rect_filled(rect.shrink(0.5), 0.0, fill);
            if annotate {
                let label = if r.is_nan() { "NaN".to_string() } else { format!("{r:.2}") };
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    label,
                    font.clone(),
                    color::contrasting_text(fill),
                );
            }
        }
        painter.text(
            origin + vec2(label_width - 6.0, cell * (i as f32 + 0.5)),
            Align2::RIGHT_CENTER,
            truncate(row_name, 16),
            font.clone(),
            text_color,
        );
        painter.text(
            origin + vec2(label_width + cell * (i as f32 + 0.5), cell * n as f32 + 4.0),
            Align2::CENTER_TOP,
            truncate(row_name, max_chars),
            font.clone(),
            text_color,
        );
    }

    let hovered = response.hover_pos().and_then(|pos| {
        (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .find(|&(i, j)| cell_rect(i, j).contains(pos))
    });
    if let Some((i, j)) = hovered {
        let names = matrix.columns();
        response.on_hover_text(format!("{} × {}: {:.4}", names[i], names[j], matrix.at(i, j)));
    }
}

/// Combo box over column names; returns the newly picked column, if any.
pub fn column_picker(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: Option<&str>,
    options: &[String],
) -> Option<String> {
    let mut picked = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current.unwrap_or("—"))
            .show_ui(ui, |ui: &mut Ui| {
                for col in options {
                    let is_current = current == Some(col.as_str());
                    if ui.selectable_label(is_current, col).clicked() && !is_current {
                        picked = Some(col.clone());
                    }
                }
            });
    });
    picked
}
