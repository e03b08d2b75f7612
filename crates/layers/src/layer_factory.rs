//! Turns layer descriptors into styled, drawable layers.

use geojson::Feature;
use serde_json::Value as JsonValue;

use crate::color::Color;
use crate::config::{
    DEFAULT_FILL_OPACITY, DEFAULT_POINT_RADIUS, LINE_WEIGHT, MARKER_FILL_OPACITY, MARKER_WEIGHT,
    POLYGON_WEIGHT, STROKE_OPACITY,
};
use crate::descriptor::{ColorSource, GeometryKind, LayerDescriptor};
use crate::geometry::{shapes_from_geometry, Bounds, Shape};

/// Fill paint of a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub color: Color,
    pub opacity: f32,
}

/// Resolved paint of a single feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureStyle {
    pub stroke: Color,
    /// Stroke width in pixels.
    pub stroke_weight: f32,
    pub stroke_opacity: f32,
    pub fill: Option<Fill>,
    /// Marker radius in pixels, used by point shapes.
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFeature {
    pub shapes: Vec<Shape>,
    pub style: FeatureStyle,
    pub popup: Option<PopupContent>,
}

/// Feature properties as shown in a popup, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PopupContent {
    pub rows: Vec<PopupRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupRow {
    pub key: String,
    pub value: String,
}

impl PopupContent {
    /// `key: value` lines joined by `\n`.
    pub fn text(&self) -> String {
        self.rows
            .iter()
            .map(|row| format!("{}: {}", row.key, row.value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A layer ready to be put on the map. Built once, never restyled.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLayer {
    pub name: String,
    pub kind: GeometryKind,
    pub features: Vec<RenderedFeature>,
    /// Union of all feature shapes; `None` for a layer with nothing to draw.
    pub bounds: Option<Bounds>,
    /// Color shown next to the layer's toggle.
    pub swatch: Color,
    pub scalar_encoded: bool,
    pub initially_visible: bool,
}

impl RenderedLayer {
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }
}

/// Builds [`RenderedLayer`]s. Pure: no I/O and no access to the map.
#[derive(Debug, Clone)]
pub struct LayerFactory {
    fallback: Color,
}

impl Default for LayerFactory {
    fn default() -> Self {
        Self {
            fallback: Color::fallback(),
        }
    }
}

impl LayerFactory {
    pub fn with_fallback(fallback: Color) -> Self {
        Self { fallback }
    }

    pub fn build(&self, descriptor: &LayerDescriptor) -> RenderedLayer {
        let features: Vec<RenderedFeature> = descriptor
            .features
            .features
            .iter()
            .map(|feature| RenderedFeature {
                shapes: feature
                    .geometry
                    .as_ref()
                    .map(shapes_from_geometry)
                    .unwrap_or_default(),
                style: self.style_for(descriptor, feature),
                popup: popup_content(feature),
            })
            .collect();

        let bounds = Bounds::union_all(
            features
                .iter()
                .flat_map(|f| f.shapes.iter().filter_map(Shape::bounds)),
        );

        RenderedLayer {
            name: descriptor.name.clone(),
            kind: descriptor.kind,
            features,
            bounds,
            swatch: self.static_or_fallback(descriptor.color.as_ref()),
            scalar_encoded: descriptor.is_scalar(),
            initially_visible: descriptor.initially_visible(),
        }
    }

    /// Feature color in priority order: per-feature function, static color,
    /// factory fallback.
    pub fn resolve_color(&self, source: Option<&ColorSource>, feature: &Feature) -> Color {
        per_feature_color(source, feature).unwrap_or_else(|| self.static_or_fallback(source))
    }

    fn static_or_fallback(&self, source: Option<&ColorSource>) -> Color {
        source
            .and_then(ColorSource::static_color)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }

    fn style_for(&self, descriptor: &LayerDescriptor, feature: &Feature) -> FeatureStyle {
        let source = descriptor.color.as_ref();
        let per_feature = per_feature_color(source, feature);
        let color = per_feature
            .clone()
            .unwrap_or_else(|| self.static_or_fallback(source));
        match descriptor.kind {
            GeometryKind::Line => FeatureStyle {
                stroke: color,
                stroke_weight: LINE_WEIGHT,
                stroke_opacity: STROKE_OPACITY,
                fill: None,
                radius: DEFAULT_POINT_RADIUS,
            },
            GeometryKind::Point => FeatureStyle {
                fill: Some(Fill {
                    color: color.clone(),
                    opacity: MARKER_FILL_OPACITY,
                }),
                stroke: color,
                stroke_weight: MARKER_WEIGHT,
                stroke_opacity: STROKE_OPACITY,
                radius: descriptor.point_size.unwrap_or(DEFAULT_POINT_RADIUS),
            },
            GeometryKind::Polygon => {
                let fill_color = per_feature
                    .or_else(|| descriptor.fill_color.clone())
                    .unwrap_or_else(|| color.clone());
                FeatureStyle {
                    stroke: color,
                    stroke_weight: POLYGON_WEIGHT,
                    stroke_opacity: STROKE_OPACITY,
                    fill: Some(Fill {
                        color: fill_color,
                        opacity: descriptor.fill_opacity.unwrap_or(DEFAULT_FILL_OPACITY),
                    }),
                    radius: DEFAULT_POINT_RADIUS,
                }
            }
        }
    }
}

fn per_feature_color(source: Option<&ColorSource>, feature: &Feature) -> Option<Color> {
    match source {
        Some(ColorSource::PerFeature { color, .. }) => color.eval(feature),
        _ => None,
    }
}

/// One row per property in document order, or `None` when there is nothing
/// to show.
pub fn popup_content(feature: &Feature) -> Option<PopupContent> {
    let props = feature.properties.as_ref().filter(|p| !p.is_empty())?;
    let rows = props
        .iter()
        .map(|(key, value)| PopupRow {
            key: key.clone(),
            value: display_value(value),
        })
        .collect();
    Some(PopupContent { rows })
}

fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
