use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};

use tribo_cycles::ExtremaPolicy;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – run parameters
// ---------------------------------------------------------------------------

/// Render the run parameter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Run");
    ui.separator();

    folder_row(ui, "Run folder", &mut state.input_dir);
    ui.add_space(4.0);
    folder_row(ui, "Output folder", &mut state.output_dir);
    ui.add_space(8.0);

    egui::Grid::new("run_params")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("Load [N]");
            ui.add(egui::TextEdit::singleline(&mut state.load_text).hint_text("9.8"));
            ui.end_row();

            ui.label("Peak estimate");
            egui::ComboBox::from_id_salt("policy")
                .selected_text(policy_label(state.policy))
                .show_ui(ui, |ui: &mut Ui| {
                    for policy in ExtremaPolicy::ALL {
                        ui.selectable_value(&mut state.policy, policy, policy_label(policy));
                    }
                });
            ui.end_row();
        });

    ui.add_space(8.0);
    let ready = state.input_dir.is_some();
    if ui
        .add_enabled(ready, egui::Button::new(RichText::new("Run analysis").strong()))
        .clicked()
    {
        state.set_status("Running…");
        state.run();
    }

    ui.add_space(12.0);
    egui::CollapsingHeader::new(RichText::new("Calibration").strong())
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("calibration")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui: &mut Ui| {
                    ui.label("Friction scale");
                    ui.text_edit_singleline(&mut state.friction_scale_text);
                    ui.end_row();

                    ui.label("Amplitude scale");
                    ui.text_edit_singleline(&mut state.amp_scale_text);
                    ui.end_row();
                });
            if ui.button("Save settings").clicked() {
                state.save_preferences();
            }
        });
}

fn policy_label(policy: ExtremaPolicy) -> &'static str {
    match policy {
        ExtremaPolicy::TrimmedMean => "Trimmed mean (20 per side)",
        ExtremaPolicy::Simple => "Max − min",
    }
}

fn folder_row(ui: &mut Ui, label: &str, dir: &mut Option<PathBuf>) {
    ui.strong(label);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Browse…").clicked() {
            if let Some(path) = pick_folder(label) {
                *dir = Some(path);
            }
        }
        match dir {
            Some(path) => ui.label(path.display().to_string()),
            None => ui.weak("not set"),
        };
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / status bar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open run folder…").clicked() {
                if let Some(path) = pick_folder("Run folder") {
                    state.input_dir = Some(path);
                }
                ui.close_menu();
            }
            if ui.button("Output folder…").clicked() {
                if let Some(path) = pick_folder("Output folder") {
                    state.output_dir = Some(path);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(series) = &state.series {
            ui.label(format!(
                "{} cycles, cutoff {} Hz",
                series.len(),
                series.params.motor_frequency_hz
            ));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            let color = if state.status_is_error {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

fn pick_folder(title: &str) -> Option<PathBuf> {
    let folder = rfd::FileDialog::new().set_title(title).pick_folder();
    if let Some(path) = &folder {
        log::info!("{title}: {}", path.display());
    }
    folder
}
