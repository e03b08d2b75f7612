use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use layers::LayerSet;

pub mod layer_toggles;
pub mod legend_panel;
pub mod popup;
pub mod theme;
pub mod zoom_control;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EguiPlugin)
            .add_plugins(legend_panel::LegendPanelPlugin)
            .add_systems(Startup, theme::apply_map_theme)
            .add_systems(
                Update,
                (
                    layer_toggles::layer_toggles_ui,
                    popup::feature_popup_ui,
                    zoom_control::zoom_control_ui,
                )
                    .before(LayerSet::Toggle),
            );
    }
}
