use std::path::PathBuf;

use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy::winit::{UpdateMode, WinitSettings};

use layers::manifest::load_session;

mod screenshot;

const DEMO_MANIFEST: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/demo/manifest.json");

/// First CLI argument, then `WALKMAP_MANIFEST`, then the bundled demo.
fn manifest_path() -> PathBuf {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("WALKMAP_MANIFEST").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEMO_MANIFEST))
}

fn main() {
    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Walkmap".to_string(),
            resolution: (1280.0, 720.0).into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }),
        ..default()
    }))
    .insert_resource(WinitSettings {
        focused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(16)),
        unfocused_mode: UpdateMode::reactive_low_power(std::time::Duration::from_millis(100)),
    });

    // The log subscriber exists once DefaultPlugins is added.
    let path = manifest_path();
    match load_session(&path) {
        Ok(session) => {
            info!(
                "Loaded session '{}' with {} layer(s)",
                path.display(),
                session.batch.0.len()
            );
            session.insert_into(&mut app);
        }
        Err(e) => {
            error!("Cannot start session: {e}");
            std::process::exit(1);
        }
    }

    app.add_plugins((
        layers::LayersPlugin,
        rendering::RenderingPlugin,
        ui::UiPlugin,
    ));

    if let Some(target) = std::env::var_os("WALKMAP_SCREENSHOT") {
        screenshot::enable(&mut app, PathBuf::from(target));
    }

    app.run();
}
