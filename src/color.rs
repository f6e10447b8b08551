use bike_dash::DayType;
use eframe::egui::Color32;
use palette::{Darken, Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed chart palette
// ---------------------------------------------------------------------------

const HOLIDAY: Srgb<u8> = Srgb::new(0xFF, 0xA5, 0x00);
const WEEKDAY: Srgb<u8> = Srgb::new(0x00, 0x80, 0x00);
const WEEKEND: Srgb<u8> = Srgb::new(0x00, 0x00, 0xFF);

/// Scatter points share the weekend blue.
const SCATTER: Srgb<u8> = WEEKEND;

fn to_color32(c: Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

/// Bar colour for a day type (orange / green / blue).
pub fn day_type_color(day_type: DayType) -> Color32 {
    to_color32(match day_type {
        DayType::Holiday => HOLIDAY,
        DayType::Weekday => WEEKDAY,
        DayType::Weekend => WEEKEND,
    })
}

pub fn scatter_color() -> Color32 {
    to_color32(SCATTER)
}

/// The regression line: the scatter colour, darkened in HSL space.
pub fn regression_color() -> Color32 {
    let hsl: Hsl = SCATTER.into_format::<f32>().into_color();
    let rgb: Srgb = hsl.darken(0.35).into_color();
    let rgb: Srgb<u8> = rgb.into_format();
    to_color32(rgb)
}
