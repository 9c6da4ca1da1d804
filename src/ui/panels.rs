use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::{self, DOWNLOAD_FILENAME};
use crate::data::resolve::Role;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar – reload, metrics, status
// ---------------------------------------------------------------------------

/// Render the top toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Oficinas y Teléfonos de Sucursales");
        ui.separator();

        if ui.button("Actualizar").clicked() {
            state.load();
        }

        if let Some(ds) = &state.dataset {
            ui.separator();
            ui.label(format!(
                "{} registros, {} visibles, {} columnas",
                ds.table.len(),
                state.visible_indices.len(),
                ds.table.headers.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
    ui.label(RichText::new(format!("Fuente de datos: {}", state.source_url)).weak());
}

// ---------------------------------------------------------------------------
// Left side panel – search and per-role filters
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtros");
    ui.separator();

    // Clone the widget inputs so the loop below can mutate state.
    let (bound, role_values) = match &state.dataset {
        Some(ds) => (
            ds.bindings
                .bound_roles()
                .map(|(role, header)| (role, header.to_string()))
                .collect::<Vec<_>>(),
            ds.role_values.clone(),
        ),
        None => {
            ui.label("Sin datos cargados.");
            return;
        }
    };

    ui.label("Búsqueda global");
    if ui.text_edit_singleline(&mut state.filters.query).changed() {
        state.refilter();
    }
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (role, header) in &bound {
                let Some(values) = role_values.get(role) else {
                    continue;
                };

                let n_selected = state
                    .filters
                    .selected
                    .get(role)
                    .map_or(0, BTreeSet::len);
                let header_text =
                    format!("{} — {header} ({n_selected}/{})", role.label(), values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(header)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        // An empty selection means "no constraint", so one
                        // clear button replaces select-all.
                        if ui.small_button("Quitar filtro").clicked() {
                            state.clear_role(*role);
                        }

                        for value in values {
                            let mut checked = state
                                .filters
                                .selected
                                .get(role)
                                .is_some_and(|s| s.contains(value));
                            if ui.checkbox(&mut checked, value.as_str()).changed() {
                                state.toggle_filter_value(*role, value);
                            }
                        }
                    });
            }
        });

    ui.separator();
    download_button(ui, state);
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

/// Offer the filtered subset as a CSV file via a native save dialog.
fn download_button(ui: &mut Ui, state: &mut AppState) {
    let enabled = state.dataset.is_some();
    if !ui
        .add_enabled(enabled, egui::Button::new("⬇ Descargar CSV filtrado"))
        .clicked()
    {
        return;
    }
    let Some(ds) = &state.dataset else {
        return;
    };

    let subset = ds.table.subset(&state.visible_indices);
    let bytes = match export::to_csv_bytes(&subset) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("CSV export failed: {e}");
            state.status_message = Some(format!("Error al exportar: {e}"));
            return;
        }
    };

    let file = rfd::FileDialog::new()
        .set_title("Guardar CSV filtrado")
        .set_file_name(DOWNLOAD_FILENAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match std::fs::write(&path, &bytes) {
            Ok(()) => {
                log::info!("wrote {} filtered rows to {}", subset.len(), path.display());
            }
            Err(e) => {
                log::error!("saving filtered CSV failed: {e}");
                state.status_message = Some(format!("Error al guardar: {e}"));
            }
        }
    }
}
