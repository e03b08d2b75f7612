use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use layers::hit_test::{hit_test, ActivePopup};
use layers::registry::LayerRegistry;
use layers::viewport::MapViewport;

use crate::camera::{pointer_over_ui, MapDrag};

/// A click (press and release without panning) opens the popup of the
/// feature under the cursor; clicking empty map closes it.
pub fn pick_on_click(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut contexts: EguiContexts,
    drag: Res<MapDrag>,
    registry: Res<LayerRegistry>,
    viewport: Res<MapViewport>,
    mut popup: ResMut<ActivePopup>,
) {
    if !buttons.just_released(MouseButton::Left) || !drag.pressed || drag.is_dragging {
        return;
    }
    if pointer_over_ui(&mut contexts) {
        return;
    }
    let Some(cursor) = windows.get_single().ok().and_then(Window::cursor_position) else {
        return;
    };
    let world = viewport.screen_to_world(cursor);
    let hit = hit_test(&registry, world, viewport.scale);
    if let Some(hit) = &hit {
        debug!("Picked feature {} of '{}'", hit.feature, hit.layer);
    }
    popup.0 = hit;
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_egui::EguiUserTextures;
    use geojson::{Feature, FeatureCollection, Geometry, Value};
    use layers::descriptor::{GeometryKind, LayerDescriptor};
    use layers::geometry::project;
    use layers::hit_test::Hit;
    use layers::layer_factory::{LayerFactory, PopupContent};

    const CURSOR: Vec2 = Vec2::new(400.0, 300.0);

    fn schools() -> LayerRegistry {
        let feature = Feature {
            geometry: Some(Geometry::new(Value::Point(vec![23.3, 42.7]))),
            properties: serde_json::json!({ "name": "School 1" }).as_object().cloned(),
            ..Default::default()
        };
        let d = LayerDescriptor::new(
            "Schools",
            GeometryKind::Point,
            FeatureCollection {
                bbox: None,
                features: vec![feature],
                foreign_members: None,
            },
        );
        let mut registry = LayerRegistry::default();
        registry.register(LayerFactory::default().build(&d)).unwrap();
        registry
    }

    /// Map centered on the school with the cursor over it, and a left click
    /// (press and release) queued for the next update.
    fn clicked_map(drag: MapDrag) -> App {
        let mut app = App::new();
        app.init_resource::<ButtonInput<MouseButton>>()
            .init_resource::<EguiUserTextures>()
            .init_resource::<ActivePopup>()
            .insert_resource(drag)
            .insert_resource(schools())
            .insert_resource(MapViewport {
                center: project(23.3, 42.7),
                scale: 1.0,
                size: Vec2::new(800.0, 600.0),
            })
            .add_systems(Update, pick_on_click);

        let mut window = Window::default();
        window.set_cursor_position(Some(CURSOR));
        app.world_mut().spawn((window, PrimaryWindow));

        let mut buttons = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
        buttons.press(MouseButton::Left);
        buttons.release(MouseButton::Left);
        app
    }

    fn pressed() -> MapDrag {
        MapDrag {
            pressed: true,
            start_pos: CURSOR,
            last_pos: CURSOR,
            is_dragging: false,
        }
    }

    #[test]
    fn click_opens_popup_of_feature_under_cursor() {
        let mut app = clicked_map(pressed());
        app.update();
        let popup = app.world().resource::<ActivePopup>();
        let hit = popup.0.as_ref().expect("popup opened");
        assert_eq!(hit.layer, "Schools");
        assert_eq!(hit.content.text(), "name: School 1");
    }

    #[test]
    fn drag_release_does_not_pick() {
        let mut app = clicked_map(MapDrag {
            is_dragging: true,
            ..pressed()
        });
        app.update();
        assert!(app.world().resource::<ActivePopup>().0.is_none());
    }

    #[test]
    fn click_on_empty_map_closes_popup() {
        let mut app = clicked_map(pressed());
        app.world_mut().resource_mut::<MapViewport>().center = project(10.0, 50.0);
        app.world_mut().resource_mut::<ActivePopup>().0 = Some(Hit {
            layer: "Schools".into(),
            feature: 0,
            anchor: Vec2::ZERO,
            content: PopupContent::default(),
        });
        app.update();
        assert!(app.world().resource::<ActivePopup>().0.is_none());
    }
}
