//! Types and constants for the legend panel.

use bevy::prelude::*;
use bevy_egui::egui;

/// Height of the gradient bar in pixels.
pub(crate) const GRADIENT_HEIGHT: f32 = 140.0;
/// Width of the gradient bar in pixels.
pub(crate) const GRADIENT_WIDTH: f32 = 18.0;
/// Number of vertical samples in the gradient texture.
pub(crate) const GRADIENT_STEPS: usize = 64;
pub(crate) const SWATCH_SIZE: f32 = 12.0;

/// Gradient texture, generated on first display.
#[derive(Resource, Default)]
pub struct LegendTextureCache {
    pub(crate) texture: Option<egui::TextureHandle>,
}
