use crate::form::LabelTone;
use eframe::egui::Color32;

/// Map a label tone to an egui colour (matches the TUI palette).
pub fn tone_color(tone: LabelTone) -> Color32 {
    match tone {
        LabelTone::Neutral => Color32::from_rgb(180, 180, 180),
        LabelTone::Info => Color32::from_rgb(100, 180, 255),
        LabelTone::Success => Color32::from_rgb(80, 200, 80),
        LabelTone::Warning => Color32::from_rgb(255, 220, 80),
        LabelTone::Error => Color32::from_rgb(255, 100, 100),
    }
}
