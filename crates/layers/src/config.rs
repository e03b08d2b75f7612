use std::time::Duration;

/// Stroke weight (px) of line layers.
pub const LINE_WEIGHT: f32 = 3.0;
/// Outline weight (px) of polygon layers.
pub const POLYGON_WEIGHT: f32 = 2.0;
/// Outline weight (px) of point markers.
pub const MARKER_WEIGHT: f32 = 1.0;

/// Marker radius (px) when a point layer does not set `point_size`.
pub const DEFAULT_POINT_RADIUS: f32 = 6.0;
pub const MARKER_FILL_OPACITY: f32 = 0.8;
/// Polygon fill opacity when the descriptor leaves it unset.
pub const DEFAULT_FILL_OPACITY: f32 = 0.4;
pub const STROKE_OPACITY: f32 = 1.0;

/// Color used when a layer supplies neither a per-feature nor a static color.
pub const FALLBACK_COLOR_HEX: &str = "#3388ff";

/// Padding (px) kept between fitted bounds and the viewport edge.
pub const FIT_PADDING_PX: f32 = 20.0;

/// Meters per pixel at zoom 0 of the spherical Web Mercator tile pyramid.
pub const ZOOM0_SCALE: f32 = 156_543.03;
/// Closest zoom level the viewport can reach, by fit or by hand.
pub const MAX_ZOOM: f32 = 18.0;
/// Farthest zoom level the viewport can reach, by fit or by hand.
pub const MIN_ZOOM: f32 = 2.0;

/// Initial view before any layer is fitted (Sofia city centre, zoom 13).
pub const DEFAULT_CENTER_LAT: f64 = 42.6977;
pub const DEFAULT_CENTER_LON: f64 = 23.3219;
pub const DEFAULT_ZOOM: f32 = 13.0;

/// Logical viewport size assumed until the window reports its own.
pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;

/// Delay between a layout change and the viewport refresh that follows it.
pub const LAYOUT_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Extra pick radius (px) around features for click hit testing.
pub const PICK_TOLERANCE_PX: f32 = 4.0;

/// Property read by scalar layers when the manifest does not name one.
pub const DEFAULT_SCORE_PROPERTY: &str = "accessibility_index";

/// Scales for the zoom range, in world units (meters) per pixel.
pub fn scale_for_zoom(zoom: f32) -> f32 {
    ZOOM0_SCALE / 2f32.powf(zoom)
}

pub fn min_scale() -> f32 {
    scale_for_zoom(MAX_ZOOM)
}

pub fn max_scale() -> f32 {
    scale_for_zoom(MIN_ZOOM)
}
