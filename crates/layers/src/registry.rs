//! Named layers and their map membership.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::error::LayerError;
use crate::layer_factory::RenderedLayer;

#[derive(Debug)]
struct Entry {
    layer: RenderedLayer,
    visible: bool,
}

/// Every layer of the session, in registration (draw) order, with its
/// visibility. Later layers draw on top of earlier ones.
#[derive(Resource, Debug, Default)]
pub struct LayerRegistry {
    entries: Vec<Entry>,
    by_name: HashMap<String, usize>,
}

impl LayerRegistry {
    /// Add a layer, attached to the map if it is initially visible.
    pub fn register(&mut self, layer: RenderedLayer) -> Result<(), LayerError> {
        if self.by_name.contains_key(&layer.name) {
            return Err(LayerError::DuplicateName(layer.name));
        }
        self.by_name.insert(layer.name.clone(), self.entries.len());
        let visible = layer.initially_visible;
        self.entries.push(Entry { layer, visible });
        Ok(())
    }

    /// Attach (`true`) or detach (`false`) the named layer.
    ///
    /// Returns whether membership changed; repeating a toggle is a no-op.
    pub fn toggle(&mut self, name: &str, visible: bool) -> Result<bool, LayerError> {
        let idx = self.index_of(name)?;
        let entry = &mut self.entries[idx];
        let changed = entry.visible != visible;
        entry.visible = visible;
        Ok(changed)
    }

    pub fn is_visible(&self, name: &str) -> Result<bool, LayerError> {
        Ok(self.entries[self.index_of(name)?].visible)
    }

    pub fn get(&self, name: &str) -> Option<&RenderedLayer> {
        self.by_name.get(name).map(|&i| &self.entries[i].layer)
    }

    /// All layers with their visibility, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&RenderedLayer, bool)> {
        self.entries.iter().map(|e| (&e.layer, e.visible))
    }

    /// Layers currently on the map, bottom to top.
    pub fn visible_layers(&self) -> impl Iterator<Item = &RenderedLayer> {
        self.entries.iter().filter(|e| e.visible).map(|e| &e.layer)
    }

    pub fn visible_names(&self) -> Vec<&str> {
        self.visible_layers().map(|l| l.name.as_str()).collect()
    }

    pub fn has_scalar_layers(&self) -> bool {
        self.entries.iter().any(|e| e.layer.scalar_encoded)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index_of(&self, name: &str) -> Result<usize, LayerError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| LayerError::NotFound(name.to_string()))
    }
}
