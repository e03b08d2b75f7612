use bevy::prelude::*;

pub mod color;
pub mod color_scale;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod layer_factory;
pub mod layout;
pub mod legend;
pub mod manifest;
pub mod palette;
pub mod registry;
pub mod viewport;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

use descriptor::LayerDescriptor;
use hit_test::ActivePopup;
use layer_factory::LayerFactory;
use layout::DeferredRefresh;
use legend::{ActiveLegend, LegendRenderer};
use palette::Palette;
use registry::LayerRegistry;
use viewport::{fit, MapViewport};

// ---------------------------------------------------------------------------
// Session inputs
// ---------------------------------------------------------------------------

/// Per-session settings, fixed once the session starts.
#[derive(Resource, Debug, Clone)]
pub struct SessionConfig {
    pub palette: Palette,
    /// Show the legend when at least one layer is scalar-encoded.
    pub legend_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            palette: Palette::accessibility(),
            legend_enabled: true,
        }
    }
}

/// Layers to build at startup, in draw order. Drained by `build_layers`.
#[derive(Resource, Debug, Default)]
pub struct LayerBatch(pub Vec<LayerDescriptor>);

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Request to attach (`visible: true`) or detach a layer.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct ToggleLayer {
    pub name: String,
    pub visible: bool,
}

/// A `ToggleLayer` that could not be applied.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct LayerToggleRejected {
    pub name: String,
    pub error: error::LayerError,
}

/// Ordering within `Update`: membership changes land before anything
/// reads the viewport for the frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerSet {
    Toggle,
    Refresh,
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Build every layer of the batch, register it, fit the initially visible
/// layers and decide whether the legend is shown.
pub fn build_layers(
    mut batch: ResMut<LayerBatch>,
    config: Res<SessionConfig>,
    mut registry: ResMut<LayerRegistry>,
    mut viewport: ResMut<MapViewport>,
    mut legend: ResMut<ActiveLegend>,
    mut refresh: ResMut<DeferredRefresh>,
) {
    let factory = LayerFactory::default();
    for descriptor in std::mem::take(&mut batch.0) {
        let layer = factory.build(&descriptor);
        info!(
            "Layer '{}': {} {} feature(s), {}",
            layer.name,
            layer.feature_count(),
            layer.kind.label(),
            if layer.initially_visible { "shown" } else { "hidden" }
        );
        if let Err(e) = registry.register(layer) {
            error!("Skipping layer: {e}");
        }
    }

    if !fit(&mut viewport, registry.visible_layers()) {
        info!("No visible geometry, keeping the default view");
    }

    legend.0 = LegendRenderer::render(
        &config.palette,
        config.legend_enabled && registry.has_scalar_layers(),
    );
    refresh.schedule(None);
}

/// Apply toggle requests in arrival order, refitting after each one.
pub fn apply_layer_toggles(
    mut requests: EventReader<ToggleLayer>,
    mut rejected: EventWriter<LayerToggleRejected>,
    mut registry: ResMut<LayerRegistry>,
    mut viewport: ResMut<MapViewport>,
    mut popup: ResMut<ActivePopup>,
) {
    for request in requests.read() {
        match registry.toggle(&request.name, request.visible) {
            Ok(_) => {
                if !request.visible && popup.is_open_for(&request.name) {
                    popup.close();
                }
                fit(&mut viewport, registry.visible_layers());
            }
            Err(error) => {
                error!("Cannot toggle layer: {error}");
                rejected.send(LayerToggleRejected {
                    name: request.name.clone(),
                    error,
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct LayersPlugin;

impl Plugin for LayersPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SessionConfig>()
            .init_resource::<LayerBatch>()
            .init_resource::<LayerRegistry>()
            .init_resource::<MapViewport>()
            .init_resource::<ActiveLegend>()
            .init_resource::<ActivePopup>()
            .init_resource::<DeferredRefresh>()
            .add_event::<ToggleLayer>()
            .add_event::<LayerToggleRejected>()
            .configure_sets(Update, (LayerSet::Toggle, LayerSet::Refresh).chain())
            .add_systems(Startup, build_layers)
            .add_systems(
                Update,
                (
                    apply_layer_toggles.in_set(LayerSet::Toggle),
                    layout::run_deferred_refresh.in_set(LayerSet::Refresh),
                ),
            );
    }
}
