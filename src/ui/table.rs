use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Results table (central panel)
// ---------------------------------------------------------------------------

/// Render the filtered rows. Column set and order mirror the source CSV.
pub fn results_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Sin datos — use «Actualizar» para reintentar la descarga.");
        });
        return;
    };

    let table = &dataset.table;
    let indices = &state.visible_indices;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(60.0), table.headers.len())
        .header(22.0, |mut header| {
            for name in &table.headers {
                header.col(|ui| {
                    ui.strong(name.as_str());
                });
            }
        })
        .body(|body| {
            body.rows(20.0, indices.len(), |mut row| {
                let cells = &table.rows[indices[row.index()]];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });
}
