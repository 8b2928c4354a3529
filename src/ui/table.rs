use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Per-cycle results table (bottom panel)
// ---------------------------------------------------------------------------

pub fn cycle_table(ui: &mut Ui, state: &AppState) {
    let Some(series) = &state.series else {
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(70.0))
        .columns(Column::remainder().at_least(90.0), 3)
        .header(20.0, |mut header| {
            for title in ["Cycles", "Friction coef. [-]", "Amplitude [µm]", "Humidity [%]"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, series.len(), |mut row| {
                let i = row.index();
                let Some(metric) = series.metric(i) else {
                    return;
                };
                row.col(|ui| {
                    ui.label(series.cycle_counts[i].to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.4}", metric.friction_coefficient));
                });
                row.col(|ui| {
                    ui.label(format!("{:.2}", metric.amplitude));
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", metric.humidity));
                });
            });
        });
}
