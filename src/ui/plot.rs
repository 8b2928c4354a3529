use eframe::egui::Ui;
use egui_plot::{Legend, Plot, PlotPoints, Points};

use crate::color;
use crate::state::AppState;

const MARKER_RADIUS: f32 = 1.5;

// ---------------------------------------------------------------------------
// Trend plots (central panel)
// ---------------------------------------------------------------------------

/// Render the cycle trend: friction coefficient on top, amplitude and
/// humidity below, sharing the cycle-count axis range.
pub fn trend_plot(ui: &mut Ui, state: &AppState) {
    let series = match &state.series {
        Some(s) => s,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Choose a run folder and press Run analysis");
            });
            return;
        }
    };

    let x_max = (series.last_cycle() + 10) as f64;
    let points = |values: &[f64]| {
        series
            .cycle_counts
            .iter()
            .zip(values)
            .map(|(&x, &y)| [x as f64, y])
            .collect::<PlotPoints>()
    };
    let half = (ui.available_height() / 2.0 - 4.0).max(120.0);

    Plot::new("friction_plot")
        .height(half)
        .legend(Legend::default())
        .x_axis_label("Cycles")
        .y_axis_label("Friction coefficient [-]")
        .include_x(0.0)
        .include_x(x_max)
        .include_y(0.0)
        .include_y(2.0)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points(&series.friction_coefficient))
                    .name("Friction coefficient")
                    .color(color::FRICTION)
                    .radius(MARKER_RADIUS),
            );
        });

    Plot::new("amplitude_plot")
        .height(half)
        .legend(Legend::default())
        .x_axis_label("Cycles")
        .y_axis_label("Amplitude [µm], humidity [%]")
        .include_x(0.0)
        .include_x(x_max)
        .include_y(0.0)
        .include_y(100.0)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points(&series.amplitude))
                    .name("Relative amplitude")
                    .color(color::AMPLITUDE)
                    .radius(MARKER_RADIUS),
            );
            plot_ui.points(
                Points::new(points(&series.humidity))
                    .name("Relative humidity")
                    .color(color::HUMIDITY)
                    .radius(MARKER_RADIUS),
            );
        });
}
