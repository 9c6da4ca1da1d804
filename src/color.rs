use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette for the región chart
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.50);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Assign each label a stable colour, in the order given. Labels beyond
/// the palette (never the case here: one label, one colour) fall back to
/// grey at the lookup site.
pub fn value_colors(labels: &[String]) -> BTreeMap<String, Color32> {
    labels
        .iter()
        .cloned()
        .zip(generate_palette(labels.len()))
        .collect()
}
