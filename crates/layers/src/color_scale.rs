//! Scalar-to-color mapping for accessibility scores.
//!
//! A score in `[0, 100]` is spread across the palette's control points, which
//! are evenly spaced, and blended linearly per RGB channel. Scores outside the
//! range clamp to the ends of the palette instead of being rejected, since
//! upstream indices are not guaranteed to be strictly bounded.

use geojson::Feature;

use crate::color::Color;
use crate::palette::Palette;

/// Upper end of the score domain.
pub const SCORE_MAX: f64 = 100.0;

/// Color for `value` on `palette`.
///
/// Exact stops (including 0 and 100) return the palette entry unchanged.
/// When either neighbouring stop is an unresolved literal there is nothing to
/// blend, so the lower stop is returned.
pub fn color_for(value: f64, palette: &Palette) -> Color {
    let colors = palette.colors();
    let last = colors.len() - 1;
    let value = if value.is_nan() { 0.0 } else { value };
    let index = (value * last as f64 / SCORE_MAX).clamp(0.0, last as f64);
    let i = index.floor() as usize;
    let t = index - i as f64;

    let start = &colors[i];
    if t == 0.0 {
        return start.clone();
    }
    let end = &colors[(i + 1).min(last)];
    match (start.rgb(), end.rgb()) {
        (Some(a), Some(b)) => Color::Rgb(a.lerp(b, t)),
        _ => start.clone(),
    }
}

/// Score of the stop at `index`, e.g. 0, 16.7, ... 100 for seven colors.
pub fn stop_value(index: usize, palette: &Palette) -> f64 {
    index as f64 * SCORE_MAX / (palette.len() - 1) as f64
}

/// Numeric value of `property` on `feature`.
///
/// Accepts JSON numbers and numeric strings; anything else is `None`.
pub fn scalar_value(feature: &Feature, property: &str) -> Option<f64> {
    let value = feature.properties.as_ref()?.get(property)?;
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
