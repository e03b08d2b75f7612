//! Legend model for scalar-encoded layers.
//!
//! The legend mirrors the palette used by `color_for`: one labeled swatch per
//! palette stop, low end first. It is built once per session and carries no
//! interaction; drawing it is up to the UI.

use bevy::prelude::*;

use crate::color::Color;
use crate::color_scale::{color_for, stop_value, SCORE_MAX};
use crate::palette::Palette;

#[derive(Debug, Clone, PartialEq)]
pub struct LegendSwatch {
    pub color: Color,
    /// Score at this stop, rounded for display.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: &'static str,
    pub min_label: &'static str,
    pub max_label: &'static str,
    pub swatches: Vec<LegendSwatch>,
    palette: Palette,
}

impl Legend {
    /// `steps` colors evenly sampled from the low to the high end.
    pub fn gradient(&self, steps: usize) -> Vec<Color> {
        if steps < 2 {
            return vec![color_for(0.0, &self.palette)];
        }
        (0..steps)
            .map(|i| color_for(i as f64 * SCORE_MAX / (steps - 1) as f64, &self.palette))
            .collect()
    }
}

pub struct LegendRenderer;

impl LegendRenderer {
    /// Legend for `palette`, or `None` when the legend is disabled.
    pub fn render(palette: &Palette, enabled: bool) -> Option<Legend> {
        if !enabled {
            return None;
        }
        let swatches = palette
            .colors()
            .iter()
            .enumerate()
            .map(|(i, color)| LegendSwatch {
                color: color.clone(),
                label: format!("{:.0}", stop_value(i, palette)),
            })
            .collect();
        Some(Legend {
            title: "Accessibility index",
            min_label: "Poor",
            max_label: "Good",
            swatches,
            palette: palette.clone(),
        })
    }
}

/// The session legend; `None` hides the legend panel entirely.
#[derive(Resource, Debug, Default)]
pub struct ActiveLegend(pub Option<Legend>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_legend_renders_nothing() {
        assert!(LegendRenderer::render(&Palette::accessibility(), false).is_none());
    }

    #[test]
    fn swatches_follow_palette_order() {
        let palette = Palette::accessibility();
        let legend = LegendRenderer::render(&palette, true).unwrap();
        let colors: Vec<Color> = legend.swatches.iter().map(|s| s.color.clone()).collect();
        assert_eq!(colors, palette.colors());
        let labels: Vec<&str> = legend.swatches.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["0", "17", "33", "50", "67", "83", "100"]);
    }

    #[test]
    fn gradient_spans_both_ends() {
        let palette = Palette::accessibility();
        let legend = LegendRenderer::render(&palette, true).unwrap();
        let ramp = legend.gradient(13);
        assert_eq!(ramp.len(), 13);
        assert_eq!(ramp[0], *palette.first());
        assert_eq!(ramp[12], *palette.last());
        assert_eq!(ramp[6], Color::parse("gold"));
    }
}
