//! Screenshot mode: once the map has settled, save the primary window to a
//! file and exit. Enabled with `WALKMAP_SCREENSHOT=<path>`.

use std::path::PathBuf;

use bevy::prelude::*;
use bevy::render::view::screenshot::{save_to_disk, Screenshot};

use layers::layout::DeferredRefresh;

/// Frames to wait after the layout refresh before capturing.
const SETTLE_FRAMES: u32 = 10;
/// Frames to wait after requesting the capture before exiting.
const COOLDOWN_FRAMES: u32 = 20;
/// Give up if the map never settles.
const TIMEOUT_FRAMES: u32 = 600;

#[derive(Resource)]
struct ScreenshotRequest {
    path: PathBuf,
    frame: u32,
    settled_at: Option<u32>,
    captured_at: Option<u32>,
}

pub fn enable(app: &mut App, path: PathBuf) {
    app.insert_resource(ScreenshotRequest {
        path,
        frame: 0,
        settled_at: None,
        captured_at: None,
    })
    .add_systems(Update, drive_screenshot);
}

fn drive_screenshot(
    mut commands: Commands,
    mut request: ResMut<ScreenshotRequest>,
    refresh: Res<DeferredRefresh>,
    mut exit: EventWriter<AppExit>,
) {
    request.frame += 1;
    let frame = request.frame;

    if let Some(captured) = request.captured_at {
        if frame >= captured + COOLDOWN_FRAMES {
            exit.send(AppExit::Success);
        }
        return;
    }
    if frame > TIMEOUT_FRAMES {
        warn!("Map did not settle after {TIMEOUT_FRAMES} frames; exiting without screenshot");
        exit.send(AppExit::from_code(1));
        return;
    }

    if refresh.is_pending() {
        request.settled_at = None;
        return;
    }
    let settled = *request.settled_at.get_or_insert(frame);
    if frame < settled + SETTLE_FRAMES {
        return;
    }

    info!("Saving screenshot to {}", request.path.display());
    commands
        .spawn(Screenshot::primary_window())
        .observe(save_to_disk(request.path.clone()));
    request.captured_at = Some(frame);
}
