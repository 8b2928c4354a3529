use eframe::egui::Color32;

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// Friction coefficient markers.
pub const FRICTION: Color32 = Color32::from_rgb(0xB8, 0x46, 0x44);

/// Displacement amplitude markers.
pub const AMPLITUDE: Color32 = Color32::from_rgb(0x90, 0xB3, 0x4F);

/// Humidity markers.
pub const HUMIDITY: Color32 = Color32::from_rgb(0x46, 0x76, 0xB5);
