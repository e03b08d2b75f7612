use bevy_egui::{egui, EguiContexts};

use layers::color::Color as MapColor;

/// Panel background; translucent so the map stays readable underneath.
pub const PANEL_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(250, 250, 247, 235);
pub const PANEL_TEXT: egui::Color32 = egui::Color32::from_rgb(40, 40, 40);
pub const MUTED_TEXT: egui::Color32 = egui::Color32::from_rgb(110, 110, 110);
pub const MARGIN: f32 = 12.0;

/// Light panels over a light basemap.
pub fn apply_map_theme(mut contexts: EguiContexts) {
    let ctx = contexts.ctx_mut();
    let mut style = (*ctx.style()).clone();
    style.visuals = egui::Visuals::light();

    let accent = egui::Color32::from_rgb(51, 136, 255);
    style.visuals.window_fill = PANEL_FILL;
    style.visuals.panel_fill = PANEL_FILL;
    style.visuals.selection.bg_fill = accent;
    style.visuals.selection.stroke = egui::Stroke::new(1.0, accent);
    style.visuals.window_shadow = egui::epaint::Shadow::NONE;

    let rounding = egui::CornerRadius::same(4);
    style.visuals.window_corner_radius = rounding;
    style.visuals.widgets.inactive.corner_radius = rounding;
    style.visuals.widgets.hovered.corner_radius = rounding;
    style.visuals.widgets.active.corner_radius = rounding;

    ctx.set_style(style);
}

/// Convert a layer color to egui. Literals render in the fallback color.
pub fn egui_color(color: &MapColor, opacity: f32) -> egui::Color32 {
    let rgb = color.rgb_or_fallback();
    egui::Color32::from_rgba_unmultiplied(
        rgb.r,
        rgb.g,
        rgb.b,
        (opacity.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_convert_exactly() {
        let gold = egui_color(&MapColor::parse("gold"), 1.0);
        assert_eq!(gold, egui::Color32::from_rgb(255, 215, 0));
    }

    #[test]
    fn literals_use_the_fallback() {
        let c = egui_color(&MapColor::parse("var(--accent)"), 1.0);
        assert_eq!(c, egui::Color32::from_rgb(0x33, 0x88, 0xff));
    }
}
