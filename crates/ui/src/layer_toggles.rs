//! Layer control: one row per layer with a checkbox, a color swatch and the
//! layer name. Checking a row attaches the layer, unchecking detaches it.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use layers::registry::LayerRegistry;
use layers::ToggleLayer;

use crate::theme::{egui_color, MARGIN, MUTED_TEXT, PANEL_FILL, PANEL_TEXT};

const SWATCH_SIZE: f32 = 12.0;

/// What one toggle row shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleRow {
    pub name: String,
    pub swatch: egui::Color32,
    pub visible: bool,
    pub feature_count: usize,
}

/// Rows in registration order, which is also the draw order.
pub fn toggle_rows(registry: &LayerRegistry) -> Vec<ToggleRow> {
    registry
        .iter()
        .map(|(layer, visible)| ToggleRow {
            name: layer.name.clone(),
            swatch: egui_color(&layer.swatch, 1.0),
            visible,
            feature_count: layer.feature_count(),
        })
        .collect()
}

pub fn layer_toggles_ui(
    mut contexts: EguiContexts,
    registry: Res<LayerRegistry>,
    mut toggles: EventWriter<ToggleLayer>,
) {
    if registry.is_empty() {
        return;
    }
    let ctx = contexts.ctx_mut();

    egui::Window::new("Layers")
        .anchor(egui::Align2::RIGHT_TOP, [-MARGIN, MARGIN])
        .resizable(false)
        .collapsible(true)
        .frame(
            egui::Frame::new()
                .fill(PANEL_FILL)
                .corner_radius(egui::CornerRadius::same(4))
                .inner_margin(egui::Margin::same(8)),
        )
        .show(ctx, |ui| {
            for mut row in toggle_rows(&registry) {
                ui.horizontal(|ui| {
                    let checkbox = ui.checkbox(&mut row.visible, "");
                    let (rect, _) = ui.allocate_exact_size(
                        egui::vec2(SWATCH_SIZE, SWATCH_SIZE),
                        egui::Sense::hover(),
                    );
                    ui.painter().rect_filled(rect, 2.0, row.swatch);
                    ui.label(egui::RichText::new(&row.name).color(PANEL_TEXT))
                        .on_hover_text(format!("{} feature(s)", row.feature_count));
                    if row.feature_count == 0 {
                        ui.label(egui::RichText::new("(empty)").small().color(MUTED_TEXT));
                    }
                    if checkbox.changed() {
                        toggles.send(ToggleLayer {
                            name: row.name.clone(),
                            visible: row.visible,
                        });
                    }
                });
            }
        });
}
