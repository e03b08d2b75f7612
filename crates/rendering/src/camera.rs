use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use bevy_egui::EguiContexts;

use layers::layout::DeferredRefresh;
use layers::viewport::MapViewport;

const PAN_SPEED_PX: f32 = 600.0;
/// Scale change per scroll line; one line is roughly a quarter zoom level.
const ZOOM_STEP: f32 = 0.84;
const KEY_ZOOM_RATE: f32 = 2.0;
/// Pixels the cursor must travel before a press becomes a pan.
const DRAG_THRESHOLD: f32 = 5.0;

#[derive(Component)]
pub struct MapCamera;

/// Left-button press state: tells a click (popup) from a drag (pan).
#[derive(Resource, Default)]
pub struct MapDrag {
    pub pressed: bool,
    pub start_pos: Vec2,
    pub last_pos: Vec2,
    /// True once the cursor moved past `DRAG_THRESHOLD` during this press.
    pub is_dragging: bool,
}

/// `true` when egui owns the pointer and map input should be ignored.
pub fn pointer_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.wants_pointer_input() || ctx.is_pointer_over_area())
}

/// Match the viewport to the window before the first fit.
pub fn sync_initial_size(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<MapViewport>,
) {
    if let Ok(window) = windows.get_single() {
        viewport.set_size(window.size());
    }
}

pub fn setup_camera(mut commands: Commands, viewport: Res<MapViewport>) {
    commands.spawn((
        Camera2d,
        MapCamera,
        OrthographicProjection {
            scale: viewport.scale,
            ..OrthographicProjection::default_2d()
        },
        Transform::from_translation(viewport.center.extend(0.0)),
    ));
}

/// Apply `MapViewport` to the camera whenever it changes.
pub fn apply_viewport(
    viewport: Res<MapViewport>,
    mut query: Query<(&mut Transform, &mut OrthographicProjection), With<MapCamera>>,
) {
    if !viewport.is_changed() {
        return;
    }
    let Ok((mut transform, mut projection)) = query.get_single_mut() else {
        return;
    };
    transform.translation = viewport.center.extend(transform.translation.z);
    projection.scale = viewport.scale;
}

/// Window resizes only arm the layout-settled refresh; the viewport size is
/// synced when it fires.
pub fn schedule_refresh_on_resize(
    mut resized: EventReader<WindowResized>,
    mut refresh: ResMut<DeferredRefresh>,
) {
    if let Some(last) = resized.read().last() {
        refresh.schedule(Some(Vec2::new(last.width, last.height)));
    }
}

/// Left-mouse drag: pan the map (after a small threshold, so clicks still
/// open popups).
pub fn pan_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut contexts: EguiContexts,
    mut drag: ResMut<MapDrag>,
    mut viewport: ResMut<MapViewport>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    if buttons.just_pressed(MouseButton::Left) && !pointer_over_ui(&mut contexts) {
        if let Some(pos) = window.cursor_position() {
            drag.pressed = true;
            drag.start_pos = pos;
            drag.last_pos = pos;
            drag.is_dragging = false;
        }
    }

    if !drag.pressed {
        return;
    }
    let Some(pos) = window.cursor_position() else {
        return;
    };
    if !drag.is_dragging && pos.distance(drag.start_pos) > DRAG_THRESHOLD {
        drag.is_dragging = true;
    }
    if drag.is_dragging {
        let delta = pos - drag.last_pos;
        if delta != Vec2::ZERO {
            viewport.pan_by_pixels(delta);
        }
    }
    drag.last_pos = pos;
}

/// Releasing the button ends the press. Runs after picking so the click
/// handler still sees the final drag state.
pub fn end_drag(buttons: Res<ButtonInput<MouseButton>>, mut drag: ResMut<MapDrag>) {
    if buttons.just_released(MouseButton::Left) {
        drag.pressed = false;
        drag.is_dragging = false;
    }
}

/// Scroll wheel: zoom about the cursor.
pub fn scroll_zoom(
    mut scroll_evts: EventReader<MouseWheel>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut contexts: EguiContexts,
    mut viewport: ResMut<MapViewport>,
) {
    let over_ui = pointer_over_ui(&mut contexts);
    let anchor = windows
        .get_single()
        .ok()
        .and_then(Window::cursor_position)
        .unwrap_or(viewport.size * 0.5);
    for evt in scroll_evts.read() {
        if over_ui {
            continue;
        }
        let lines = match evt.unit {
            MouseScrollUnit::Line => evt.y,
            MouseScrollUnit::Pixel => evt.y / 100.0,
        };
        viewport.zoom_about(ZOOM_STEP.powf(lines), anchor);
    }
}

/// WASD/arrows pan, `+`/`-` zoom about the center.
pub fn keyboard_navigation(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut viewport: ResMut<MapViewport>,
) {
    let mut dir = Vec2::ZERO;
    if keys.pressed(KeyCode::KeyW) || keys.pressed(KeyCode::ArrowUp) {
        dir.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) || keys.pressed(KeyCode::ArrowDown) {
        dir.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) || keys.pressed(KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) || keys.pressed(KeyCode::ArrowRight) {
        dir.x += 1.0;
    }
    if dir != Vec2::ZERO {
        // Screen drag moves the map opposite to the camera.
        let step = dir.normalize() * PAN_SPEED_PX * time.delta_secs();
        viewport.pan_by_pixels(Vec2::new(-step.x, step.y));
    }

    let mut zoom = 0.0;
    if keys.pressed(KeyCode::Equal) || keys.pressed(KeyCode::NumpadAdd) {
        zoom -= 1.0;
    }
    if keys.pressed(KeyCode::Minus) || keys.pressed(KeyCode::NumpadSubtract) {
        zoom += 1.0;
    }
    if zoom != 0.0 {
        let factor = KEY_ZOOM_RATE.powf(zoom * time.delta_secs());
        let center = viewport.size * 0.5;
        viewport.zoom_about(factor, center);
    }
}
