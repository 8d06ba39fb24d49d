use crate::form::LabelTone;
use ratatui::style::Color;

pub const BAR_BG: Color = Color::Rgb(0, 95, 135);
pub const HEADER_BG: Color = Color::Rgb(40, 40, 50);
pub const FOCUSED: Color = Color::Cyan;
pub const UNFOCUSED: Color = Color::DarkGray;

pub fn tone_color(tone: LabelTone) -> Color {
    match tone {
        LabelTone::Neutral => Color::Gray,
        LabelTone::Info => Color::LightBlue,
        LabelTone::Success => Color::Green,
        LabelTone::Warning => Color::Yellow,
        LabelTone::Error => Color::LightRed,
    }
}

pub fn tone_icon(tone: LabelTone) -> &'static str {
    match tone {
        LabelTone::Neutral => "",
        LabelTone::Info => "\u{1F50D} ",    // magnifier
        LabelTone::Success => "\u{2705} ",  // check
        LabelTone::Warning => "\u{26A0}\u{FE0F} ", // warning
        LabelTone::Error => "\u{274C} ",    // cross
    }
}
