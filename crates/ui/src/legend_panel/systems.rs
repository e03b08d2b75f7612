//! Legend panel system and helpers.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use layers::legend::{ActiveLegend, Legend};

use super::types::{
    LegendTextureCache, GRADIENT_HEIGHT, GRADIENT_STEPS, GRADIENT_WIDTH, SWATCH_SIZE,
};
use crate::theme::{egui_color, MARGIN, MUTED_TEXT, PANEL_FILL, PANEL_TEXT};

pub(crate) fn legend_panel_ui(
    mut contexts: EguiContexts,
    legend: Res<ActiveLegend>,
    mut cache: ResMut<LegendTextureCache>,
) {
    let Some(legend) = &legend.0 else {
        return;
    };
    let ctx = contexts.ctx_mut();
    if cache.texture.is_none() {
        cache.texture = Some(ctx.load_texture(
            "accessibility_legend",
            gradient_image(legend, GRADIENT_STEPS),
            egui::TextureOptions::LINEAR,
        ));
    }

    egui::Area::new(egui::Id::new("accessibility_legend"))
        .anchor(egui::Align2::LEFT_BOTTOM, [MARGIN, -MARGIN])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(PANEL_FILL)
                .corner_radius(egui::CornerRadius::same(4))
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.label(
                        egui::RichText::new(legend.title)
                            .strong()
                            .size(13.0)
                            .color(PANEL_TEXT),
                    );
                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        if let Some(tex) = &cache.texture {
                            let size = egui::vec2(GRADIENT_WIDTH, GRADIENT_HEIGHT);
                            ui.image(egui::load::SizedTexture::new(tex.id(), size));
                        }
                        ui.vertical(|ui| {
                            ui.set_height(GRADIENT_HEIGHT);
                            ui.label(small(legend.max_label));
                            ui.add_space((ui.available_height() - 16.0).max(0.0));
                            ui.label(small(legend.min_label));
                        });
                        ui.add_space(8.0);
                        ui.vertical(|ui| {
                            // High scores first, matching the ramp.
                            for swatch in legend.swatches.iter().rev() {
                                ui.horizontal(|ui| {
                                    let (rect, _) = ui.allocate_exact_size(
                                        egui::vec2(SWATCH_SIZE, SWATCH_SIZE),
                                        egui::Sense::hover(),
                                    );
                                    ui.painter().rect_filled(
                                        rect,
                                        2.0,
                                        egui_color(&swatch.color, 1.0),
                                    );
                                    ui.label(small(&swatch.label));
                                });
                            }
                        });
                    });
                });
        });
}

fn small(text: &str) -> egui::RichText {
    egui::RichText::new(text).size(11.0).color(MUTED_TEXT)
}

/// One-column image of the legend ramp: row 0 (top) is the high end.
pub(crate) fn gradient_image(legend: &Legend, steps: usize) -> egui::ColorImage {
    let pixels = legend
        .gradient(steps)
        .iter()
        .rev()
        .map(|c| egui_color(c, 1.0))
        .collect::<Vec<_>>();
    egui::ColorImage {
        size: [1, pixels.len()],
        pixels,
    }
}
