//! Layout-settled viewport refresh.
//!
//! Window size changes arrive before the new surface size is final, so the
//! refit is delayed until resizes stop for `LAYOUT_SETTLE_DELAY`. This is a
//! timing heuristic: nothing signals that layout has actually settled.

use bevy::prelude::*;

use crate::config::LAYOUT_SETTLE_DELAY;
use crate::registry::LayerRegistry;
use crate::viewport::{fit, MapViewport};

/// Debounced one-shot refresh. Scheduling again restarts the countdown.
#[derive(Resource, Debug, Default)]
pub struct DeferredRefresh {
    timer: Option<Timer>,
    pending_size: Option<Vec2>,
}

impl DeferredRefresh {
    /// Arm (or re-arm) the refresh, optionally recording a new container size.
    pub fn schedule(&mut self, size: Option<Vec2>) {
        self.timer = Some(Timer::new(LAYOUT_SETTLE_DELAY, TimerMode::Once));
        if size.is_some() {
            self.pending_size = size;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_some()
    }

    /// Advance by `delta`; returns the size to apply once the delay elapses.
    fn tick(&mut self, delta: std::time::Duration) -> Option<Option<Vec2>> {
        let timer = self.timer.as_mut()?;
        timer.tick(delta);
        if !timer.finished() {
            return None;
        }
        self.timer = None;
        Some(self.pending_size.take())
    }
}

/// Apply a settled refresh: sync the container size, then refit to the
/// visible layers.
pub fn run_deferred_refresh(
    time: Res<Time>,
    mut refresh: ResMut<DeferredRefresh>,
    mut viewport: ResMut<MapViewport>,
    registry: Res<LayerRegistry>,
) {
    let Some(size) = refresh.tick(time.delta()) else {
        return;
    };
    if let Some(size) = size {
        viewport.set_size(size);
    }
    if fit(&mut viewport, registry.visible_layers()) {
        debug!(
            "Layout settled at {}x{}, viewport refit",
            viewport.size.x, viewport.size.y
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn fires_once_after_the_delay() {
        let mut r = DeferredRefresh::default();
        r.schedule(None);
        assert!(r.tick(Duration::from_millis(60)).is_none());
        assert_eq!(r.tick(Duration::from_millis(60)), Some(None));
        assert!(!r.is_pending());
        assert!(r.tick(Duration::from_millis(200)).is_none());
    }

    #[test]
    fn rescheduling_restarts_the_countdown() {
        let mut r = DeferredRefresh::default();
        r.schedule(Some(Vec2::new(800.0, 600.0)));
        assert!(r.tick(Duration::from_millis(80)).is_none());
        r.schedule(Some(Vec2::new(1024.0, 768.0)));
        assert!(r.tick(Duration::from_millis(80)).is_none());
        assert_eq!(
            r.tick(Duration::from_millis(30)),
            Some(Some(Vec2::new(1024.0, 768.0)))
        );
    }

    #[test]
    fn idle_refresh_never_fires() {
        let mut r = DeferredRefresh::default();
        assert!(r.tick(Duration::from_secs(1)).is_none());
    }
}
