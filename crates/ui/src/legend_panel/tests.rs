//! Tests for the legend panel module.

use bevy_egui::egui;
use layers::legend::LegendRenderer;
use layers::palette::Palette;

use super::systems::gradient_image;

#[test]
fn gradient_has_good_end_on_top() {
    let legend = LegendRenderer::render(&Palette::accessibility(), true).unwrap();
    let image = gradient_image(&legend, 16);
    assert_eq!(image.size, [1, 16]);
    // darkgreen at the top, maroon at the bottom
    assert_eq!(image.pixels[0], egui::Color32::from_rgb(0x00, 0x64, 0x00));
    assert_eq!(image.pixels[15], egui::Color32::from_rgb(0x80, 0x00, 0x00));
}

#[test]
fn single_step_gradient_is_one_pixel() {
    let legend = LegendRenderer::render(&Palette::accessibility(), true).unwrap();
    let image = gradient_image(&legend, 1);
    assert_eq!(image.size, [1, 1]);
}
