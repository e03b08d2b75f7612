use bevy::prelude::*;

use layers::LayerSet;

pub mod camera;
pub mod layer_meshes;
pub mod picking;
pub mod strokes;
pub mod triangulate;

use camera::MapDrag;
use strokes::{LineStrokes, MarkerStrokes, PolygonStrokes};

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapDrag>()
            .init_gizmo_group::<LineStrokes>()
            .init_gizmo_group::<PolygonStrokes>()
            .init_gizmo_group::<MarkerStrokes>()
            .insert_resource(ClearColor(Color::srgb(0.95, 0.94, 0.91)))
            .add_systems(
                Startup,
                (
                    camera::sync_initial_size.before(layers::build_layers),
                    (camera::setup_camera, layer_meshes::spawn_layers)
                        .after(layers::build_layers),
                    strokes::configure_stroke_widths,
                ),
            )
            // Map input
            .add_systems(
                Update,
                (
                    camera::pan_drag,
                    picking::pick_on_click,
                    camera::end_drag,
                    camera::scroll_zoom,
                    camera::keyboard_navigation,
                    camera::schedule_refresh_on_resize,
                )
                    .chain()
                    .before(LayerSet::Toggle),
            )
            // Drawing, after membership and viewport settle for the frame
            .add_systems(
                Update,
                (
                    layer_meshes::sync_layer_visibility,
                    layer_meshes::scale_markers,
                    camera::apply_viewport,
                    strokes::draw_layer_strokes,
                )
                    .after(LayerSet::Refresh),
            );
    }
}
