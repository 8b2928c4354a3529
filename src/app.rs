use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct TriboApp {
    pub state: AppState,
}

impl TriboApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for TriboApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: run parameters ----
        egui::SidePanel::left("run_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: per-cycle table ----
        if self.state.series.is_some() {
            egui::TopBottomPanel::bottom("cycle_table")
                .resizable(true)
                .default_height(180.0)
                .show(ctx, |ui| {
                    table::cycle_table(ui, &self.state);
                });
        }

        // ---- Central panel: trend plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::trend_plot(ui, &self.state);
        });
    }
}
