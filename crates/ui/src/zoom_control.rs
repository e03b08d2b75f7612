//! On-screen zoom buttons in the top-left corner, one zoom level per click.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use layers::viewport::MapViewport;

use crate::theme::{MARGIN, PANEL_FILL, PANEL_TEXT};

const BUTTON_SIZE: f32 = 26.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomStep {
    In,
    Out,
}

impl ZoomStep {
    /// Scale factor for one zoom level.
    fn factor(self) -> f32 {
        match self {
            ZoomStep::In => 0.5,
            ZoomStep::Out => 2.0,
        }
    }
}

/// Zoom one level about the center of the map.
pub fn apply_zoom_step(viewport: &mut MapViewport, step: ZoomStep) {
    let center = viewport.size * 0.5;
    viewport.zoom_about(step.factor(), center);
}

pub fn zoom_control_ui(mut contexts: EguiContexts, mut viewport: ResMut<MapViewport>) {
    let ctx = contexts.ctx_mut();
    let mut clicked = None;

    egui::Area::new(egui::Id::new("zoom_control"))
        .anchor(egui::Align2::LEFT_TOP, [MARGIN, MARGIN])
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(PANEL_FILL)
                .corner_radius(egui::CornerRadius::same(4))
                .inner_margin(egui::Margin::same(2))
                .show(ui, |ui| {
                    ui.spacing_mut().item_spacing.y = 2.0;
                    for (label, step, hover) in [
                        ("+", ZoomStep::In, "Zoom in"),
                        ("\u{2212}", ZoomStep::Out, "Zoom out"),
                    ] {
                        let button = egui::Button::new(
                            egui::RichText::new(label).size(16.0).strong().color(PANEL_TEXT),
                        )
                        .min_size(egui::vec2(BUTTON_SIZE, BUTTON_SIZE));
                        if ui.add(button).on_hover_text(hover).clicked() {
                            clicked = Some(step);
                        }
                    }
                });
        });

    if let Some(step) = clicked {
        apply_zoom_step(&mut viewport, step);
    }
}
