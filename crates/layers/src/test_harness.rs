//! # TestMap: headless harness for the layer engine
//!
//! Wraps a Bevy `App` with `MinimalPlugins` + `LayersPlugin` so whole
//! sessions can be driven without a window or renderer. Time advances by a
//! fixed step per update, which keeps the layout-settled refresh
//! deterministic.

use std::time::Duration;

use bevy::app::App;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::descriptor::LayerDescriptor;
use crate::hit_test::ActivePopup;
use crate::layout::DeferredRefresh;
use crate::legend::ActiveLegend;
use crate::registry::LayerRegistry;
use crate::viewport::MapViewport;
use crate::{LayerBatch, LayerToggleRejected, LayersPlugin, SessionConfig, ToggleLayer};

/// Simulated time per `update()`.
pub const FRAME: Duration = Duration::from_millis(16);

pub struct TestMap {
    app: App,
}

impl TestMap {
    /// Build a session from `descriptors` with the default configuration and
    /// run the startup systems.
    pub fn new(descriptors: Vec<LayerDescriptor>) -> Self {
        Self::with_config(descriptors, SessionConfig::default())
    }

    pub fn with_config(descriptors: Vec<LayerDescriptor>, config: SessionConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
        // The plugin only inits these when absent.
        app.insert_resource(config);
        app.insert_resource(LayerBatch(descriptors));
        app.add_plugins(LayersPlugin);
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    pub fn update(&mut self) {
        self.app.update();
    }

    /// Run updates until at least `duration` of simulated time has passed.
    pub fn advance(&mut self, duration: Duration) {
        let frames = duration.as_millis().div_ceil(FRAME.as_millis()).max(1);
        for _ in 0..frames {
            self.app.update();
        }
    }

    /// Send a toggle request and process it.
    pub fn toggle(&mut self, name: &str, visible: bool) {
        self.app.world_mut().send_event(ToggleLayer {
            name: name.to_string(),
            visible,
        });
        self.app.update();
    }

    /// Simulate a container resize as the rendering crate reports it.
    pub fn resize(&mut self, size: Vec2) {
        self.app
            .world_mut()
            .resource_mut::<DeferredRefresh>()
            .schedule(Some(size));
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn registry(&self) -> &LayerRegistry {
        self.app.world().resource::<LayerRegistry>()
    }

    pub fn visible_names(&self) -> Vec<String> {
        self.registry()
            .visible_names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn viewport(&self) -> MapViewport {
        *self.app.world().resource::<MapViewport>()
    }

    pub fn viewport_mut(&mut self) -> Mut<'_, MapViewport> {
        self.app.world_mut().resource_mut::<MapViewport>()
    }

    pub fn legend(&self) -> &ActiveLegend {
        self.app.world().resource::<ActiveLegend>()
    }

    pub fn popup_mut(&mut self) -> Mut<'_, ActivePopup> {
        self.app.world_mut().resource_mut::<ActivePopup>()
    }

    pub fn popup(&self) -> &ActivePopup {
        self.app.world().resource::<ActivePopup>()
    }

    pub fn refresh_pending(&self) -> bool {
        self.app.world().resource::<DeferredRefresh>().is_pending()
    }

    /// Rejections sent since the last update.
    pub fn rejections(&self) -> Vec<LayerToggleRejected> {
        let events = self.app.world().resource::<Events<LayerToggleRejected>>();
        let mut cursor = events.get_cursor();
        cursor.read(events).cloned().collect()
    }
}
