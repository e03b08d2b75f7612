//! Declarative description of one map layer.

use std::fmt;
use std::sync::Arc;

use geojson::{Feature, FeatureCollection};
use serde::Deserialize;

use crate::color::Color;
use crate::color_scale::{color_for, scalar_value};
use crate::palette::Palette;

/// Geometry family of a layer, fixed for the layer's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Line,
    Point,
    Polygon,
}

impl GeometryKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Point => "point",
            Self::Polygon => "polygon",
        }
    }
}

type ColorFn = dyn Fn(&Feature) -> Option<Color> + Send + Sync;

/// Per-feature color function.
///
/// Returning `None` for a feature defers to the layer's static color.
#[derive(Clone)]
pub struct FeatureColor {
    func: Arc<ColorFn>,
    scalar_property: Option<String>,
}

impl FeatureColor {
    pub fn new(func: impl Fn(&Feature) -> Option<Color> + Send + Sync + 'static) -> Self {
        Self {
            func: Arc::new(func),
            scalar_property: None,
        }
    }

    /// Color each feature by the numeric `property` on `palette`.
    pub fn scalar(property: impl Into<String>, palette: Palette) -> Self {
        let property = property.into();
        let key = property.clone();
        Self {
            func: Arc::new(move |feature| {
                scalar_value(feature, &key).map(|v| color_for(v, &palette))
            }),
            scalar_property: Some(property),
        }
    }

    pub fn eval(&self, feature: &Feature) -> Option<Color> {
        (self.func)(feature)
    }

    /// Property driving the palette, for scalar encodings.
    pub fn scalar_property(&self) -> Option<&str> {
        self.scalar_property.as_deref()
    }
}

impl fmt::Debug for FeatureColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureColor")
            .field("scalar_property", &self.scalar_property)
            .finish_non_exhaustive()
    }
}

/// Where a layer's colors come from.
#[derive(Debug, Clone)]
pub enum ColorSource {
    /// One color for every feature.
    Static(Color),
    /// Computed per feature, with an optional static color for features the
    /// function has no answer for.
    PerFeature {
        color: FeatureColor,
        fallback: Option<Color>,
    },
}

impl ColorSource {
    pub fn is_scalar(&self) -> bool {
        matches!(self, ColorSource::PerFeature { color, .. } if color.scalar_property().is_some())
    }

    /// The static color of this source, if it has one.
    pub fn static_color(&self) -> Option<&Color> {
        match self {
            ColorSource::Static(c) => Some(c),
            ColorSource::PerFeature { fallback, .. } => fallback.as_ref(),
        }
    }
}

/// Everything needed to build one layer.
#[derive(Debug, Clone)]
pub struct LayerDescriptor {
    pub name: String,
    pub kind: GeometryKind,
    pub features: FeatureCollection,
    pub color: Option<ColorSource>,
    /// Polygon fill override; defaults to the stroke color.
    pub fill_color: Option<Color>,
    /// Polygon fill opacity; defaults to `DEFAULT_FILL_OPACITY`.
    pub fill_opacity: Option<f32>,
    /// Point marker radius; defaults to `DEFAULT_POINT_RADIUS`.
    pub point_size: Option<f32>,
    /// Initial map membership; `None` means visible.
    pub visible: Option<bool>,
}

impl LayerDescriptor {
    pub fn new(name: impl Into<String>, kind: GeometryKind, features: FeatureCollection) -> Self {
        Self {
            name: name.into(),
            kind,
            features,
            color: None,
            fill_color: None,
            fill_opacity: None,
            point_size: None,
            visible: None,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(ColorSource::Static(color));
        self
    }

    pub fn with_color_source(mut self, source: ColorSource) -> Self {
        self.color = Some(source);
        self
    }

    pub fn with_fill_color(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    pub fn with_fill_opacity(mut self, opacity: f32) -> Self {
        self.fill_opacity = Some(opacity);
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = Some(size);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    pub fn initially_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }

    pub fn is_scalar(&self) -> bool {
        self.color.as_ref().is_some_and(ColorSource::is_scalar)
    }
}

/// An empty feature collection, for layers whose data is missing.
pub fn empty_collection() -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: Vec::new(),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_with(key: &str, value: serde_json::Value) -> Feature {
        let mut props = serde_json::Map::new();
        props.insert(key.to_string(), value);
        Feature {
            properties: Some(props),
            ..Default::default()
        }
    }

    #[test]
    fn visibility_defaults_to_true() {
        let d = LayerDescriptor::new("Schools", GeometryKind::Point, empty_collection());
        assert!(d.initially_visible());
        assert!(!d.with_visible(false).initially_visible());
    }

    #[test]
    fn scalar_feature_color_reads_property() {
        let fc = FeatureColor::scalar("score", Palette::accessibility());
        let f = feature_with("score", serde_json::json!(100));
        assert_eq!(fc.eval(&f), Some(Color::parse("darkgreen")));
        assert_eq!(fc.eval(&Feature::default()), None);
        assert_eq!(fc.scalar_property(), Some("score"));
    }

    #[test]
    fn custom_feature_color_is_not_scalar() {
        let source = ColorSource::PerFeature {
            color: FeatureColor::new(|_| Some(Color::parse("gold"))),
            fallback: None,
        };
        assert!(!source.is_scalar());
        assert!(source.static_color().is_none());
    }

    #[test]
    fn scalar_descriptor_is_flagged() {
        let d = LayerDescriptor::new("Units", GeometryKind::Polygon, empty_collection())
            .with_color_source(ColorSource::PerFeature {
                color: FeatureColor::scalar("score", Palette::accessibility()),
                fallback: Some(Color::parse("gray")),
            });
        assert!(d.is_scalar());
        assert_eq!(d.color.unwrap().static_color(), Some(&Color::parse("gray")));
    }
}
