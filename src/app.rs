use eframe::egui;

use crate::state::AppState;
use crate::ui::{chart, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct OficinasApp {
    pub state: AppState,
}

impl OficinasApp {
    /// Build the app and run the first load so the window opens populated.
    /// A failed load leaves the error in the status bar; the user retries
    /// with "Actualizar".
    pub fn new() -> Self {
        let mut state = AppState::default();
        state.load();
        Self { state }
    }
}

impl eframe::App for OficinasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: toolbar and metrics ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: search + filters + download ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: región bar chart ----
        egui::TopBottomPanel::bottom("region_chart_panel")
            .resizable(true)
            .default_height(240.0)
            .show(ctx, |ui| {
                chart::region_chart(ui, &self.state);
            });

        // ---- Central panel: results table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::results_table(ui, &self.state);
        });
    }
}
