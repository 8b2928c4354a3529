mod app;
mod color;
mod state;
mod ui;

use app::TriboApp;
use eframe::egui;
use state::AppState;
use tribo_cycles::prefs::JsonPreferences;

fn main() -> eframe::Result {
    env_logger::init();

    let prefs = JsonPreferences::from_env();
    log::info!("Preferences file: {}", prefs.path().display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Tribo Cycles – Friction Trend",
        options,
        Box::new(move |_cc| Ok(Box::new(TriboApp::new(AppState::new(prefs))))),
    )
}
