//! Feature popup: the clicked feature's properties, pinned above the point
//! that was clicked and following it while the map moves.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use layers::hit_test::ActivePopup;
use layers::layer_factory::PopupContent;
use layers::viewport::MapViewport;

use crate::theme::{MUTED_TEXT, PANEL_FILL, PANEL_TEXT};

/// Gap between the anchor point and the bottom edge of the popup.
const ANCHOR_GAP: f32 = 10.0;
const MAX_WIDTH: f32 = 280.0;

/// Grid cells for each property: the bold key label and its value.
pub fn popup_rows(content: &PopupContent) -> Vec<(String, &str)> {
    content
        .rows
        .iter()
        .map(|row| (format!("{}:", row.key), row.value.as_str()))
        .collect()
}

pub fn feature_popup_ui(
    mut contexts: EguiContexts,
    viewport: Res<MapViewport>,
    mut popup: ResMut<ActivePopup>,
) {
    let Some(hit) = &popup.0 else {
        return;
    };
    let screen = viewport.world_to_screen(hit.anchor);
    let ctx = contexts.ctx_mut();

    let mut close = false;
    egui::Area::new(egui::Id::new("feature_popup"))
        .fixed_pos(egui::pos2(screen.x, screen.y - ANCHOR_GAP))
        .pivot(egui::Align2::CENTER_BOTTOM)
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::new()
                .fill(PANEL_FILL)
                .stroke(egui::Stroke::new(1.0, MUTED_TEXT))
                .corner_radius(egui::CornerRadius::same(6))
                .inner_margin(egui::Margin::same(8))
                .show(ui, |ui| {
                    ui.set_max_width(MAX_WIDTH);
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new(&hit.layer).small().color(MUTED_TEXT));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("x").clicked() {
                                close = true;
                            }
                        });
                    });
                    ui.separator();
                    egui::Grid::new("feature_popup_rows")
                        .num_columns(2)
                        .spacing([8.0, 2.0])
                        .show(ui, |ui| {
                            for (key, value) in popup_rows(&hit.content) {
                                ui.label(egui::RichText::new(key).strong().color(PANEL_TEXT));
                                ui.label(egui::RichText::new(value).color(PANEL_TEXT));
                                ui.end_row();
                            }
                        });
                });
        });

    if close {
        popup.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layers::layer_factory::PopupRow;

    fn content(rows: &[(&str, &str)]) -> PopupContent {
        PopupContent {
            rows: rows
                .iter()
                .map(|(key, value)| PopupRow {
                    key: key.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn one_grid_row_per_property() {
        let content = content(&[("name", "12th School"), ("index", "57.3")]);
        let rows = popup_rows(&content);
        assert_eq!(rows, vec![("name:".to_string(), "12th School"), ("index:".to_string(), "57.3")]);
    }

    #[test]
    fn multiline_value_is_a_single_row() {
        let content = content(&[("name", "School\nAnnex"), ("gid", "3")]);
        let rows = popup_rows(&content);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ("name:".to_string(), "School\nAnnex"));
    }

    #[test]
    fn separator_inside_key_is_kept() {
        let content = content(&[("note: extra", "opens: 8am")]);
        let rows = popup_rows(&content);
        assert_eq!(rows, vec![("note: extra:".to_string(), "opens: 8am")]);
    }
}
