use eframe::egui;

use case_browser::state::BrowserState;

use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CaseBrowserApp {
    pub state: BrowserState,
}

impl CaseBrowserApp {
    pub fn new(state: BrowserState) -> Self {
        Self { state }
    }
}

impl eframe::App for CaseBrowserApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: file + filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(300.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: row details ----
        if self.state.dataset.is_some() {
            egui::TopBottomPanel::bottom("row_details")
                .resizable(true)
                .default_height(180.0)
                .show(ctx, |ui| {
                    table::row_details(ui, &self.state);
                });
        }

        // ---- Central panel: case table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::case_table(ui, &mut self.state);
        });
    }
}
