//! Accessibility legend panel.
//!
//! Shown in the bottom-left corner when the session legend is active:
//! - Title
//! - Vertical color ramp with the good end at the top
//! - One labeled swatch per palette stop
//!
//! The legend never changes during a session, so the ramp texture is built
//! once and cached.

mod systems;
#[cfg(test)]
mod tests;
mod types;

pub use types::LegendTextureCache;

use bevy::prelude::*;

pub struct LegendPanelPlugin;

impl Plugin for LegendPanelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LegendTextureCache>()
            .add_systems(Update, systems::legend_panel_ui);
    }
}
