//! The map viewport and fitting it to what is currently shown.

use bevy::prelude::*;

use crate::config::{
    max_scale, min_scale, scale_for_zoom, DEFAULT_CENTER_LAT, DEFAULT_CENTER_LON,
    DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, DEFAULT_ZOOM, FIT_PADDING_PX,
};
use crate::geometry::{project, Bounds};
use crate::layer_factory::RenderedLayer;

/// Visible region of the map: a world-space center and a zoom expressed as
/// world units (meters) per logical pixel.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct MapViewport {
    pub center: Vec2,
    pub scale: f32,
    /// Logical size of the map container in pixels.
    pub size: Vec2,
}

impl Default for MapViewport {
    fn default() -> Self {
        Self {
            center: project(DEFAULT_CENTER_LON, DEFAULT_CENTER_LAT),
            scale: scale_for_zoom(DEFAULT_ZOOM),
            size: Vec2::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT),
        }
    }
}

impl MapViewport {
    /// World-space rectangle currently on screen.
    pub fn visible_bounds(&self) -> Bounds {
        let half = self.size * self.scale * 0.5;
        Bounds {
            min: self.center - half,
            max: self.center + half,
        }
    }

    /// Convert a cursor position (logical px, origin top-left) to world space.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let offset = screen - self.size * 0.5;
        self.center + Vec2::new(offset.x, -offset.y) * self.scale
    }

    /// Inverse of [`MapViewport::screen_to_world`].
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        let offset = (world - self.center) / self.scale;
        self.size * 0.5 + Vec2::new(offset.x, -offset.y)
    }

    /// Scale by `factor` (< 1 zooms in) keeping the world point under
    /// `anchor` fixed on screen.
    pub fn zoom_about(&mut self, factor: f32, anchor: Vec2) {
        let before = self.screen_to_world(anchor);
        self.scale = (self.scale * factor).clamp(min_scale(), max_scale());
        let after = self.screen_to_world(anchor);
        self.center += before - after;
    }

    /// Move the view by a screen-space drag delta.
    pub fn pan_by_pixels(&mut self, delta: Vec2) {
        self.center += Vec2::new(-delta.x, delta.y) * self.scale;
    }

    /// Resize the container, keeping the center and scale.
    pub fn set_size(&mut self, size: Vec2) {
        if size.x > 0.0 && size.y > 0.0 {
            self.size = size;
        }
    }
}

/// Fit the viewport to the union of `layers`' bounds.
///
/// Returns `false`, leaving the viewport untouched, when nothing in `layers`
/// has geometry.
pub fn fit<'a>(
    viewport: &mut MapViewport,
    layers: impl IntoIterator<Item = &'a RenderedLayer>,
) -> bool {
    let Some(bounds) = Bounds::union_all(layers.into_iter().filter_map(|l| l.bounds)) else {
        return false;
    };
    fit_bounds(viewport, bounds);
    true
}

pub fn fit_bounds(viewport: &mut MapViewport, bounds: Bounds) {
    let avail = (viewport.size - Vec2::splat(2.0 * FIT_PADDING_PX)).max(Vec2::ONE);
    let extent = bounds.size();
    let scale = (extent.x / avail.x).max(extent.y / avail.y);
    viewport.center = bounds.center();
    viewport.scale = scale.clamp(min_scale(), max_scale());
}
