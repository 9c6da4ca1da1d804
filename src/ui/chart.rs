use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::color::value_colors;
use crate::data::aggregate;
use crate::data::resolve::Role;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Región bar chart (bottom panel)
// ---------------------------------------------------------------------------

/// Render record counts per región for the filtered subset. One chart per
/// región so the legend carries the names and colours. Skipped entirely
/// when no región column resolved.
pub fn region_chart(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let Some(region_col) = dataset.bindings.get(Role::Region) else {
        return;
    };

    let counts = aggregate::count_by(&dataset.table, &state.visible_indices, region_col);
    if counts.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Ninguna fila pasa los filtros.");
        });
        return;
    }

    let labels: Vec<String> = counts.iter().map(|(value, _)| value.clone()).collect();
    let colors = value_colors(&labels);

    ui.strong("Distribución por Región");
    Plot::new("region_chart")
        .legend(Legend::default())
        .y_axis_label("Registros")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for (i, (value, count)) in counts.iter().enumerate() {
                let color = colors.get(value).copied().unwrap_or(Color32::GRAY);
                let bar = Bar::new(i as f64, *count as f64)
                    .width(0.7)
                    .fill(color)
                    .name(value);
                plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(value));
            }
        });
}
