//! Outlines drawn with gizmos: line layers, polygon edges and marker rims.
//!
//! Gizmo line widths are per config group, so each stroke weight gets its
//! own group.

use bevy::math::Isometry2d;
use bevy::prelude::*;

use layers::config::{LINE_WEIGHT, MARKER_WEIGHT, POLYGON_WEIGHT};
use layers::descriptor::GeometryKind;
use layers::geometry::{Bounds, Shape};
use layers::layer_factory::FeatureStyle;
use layers::registry::LayerRegistry;
use layers::viewport::MapViewport;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct LineStrokes;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct PolygonStrokes;

#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct MarkerStrokes;

pub fn configure_stroke_widths(mut store: ResMut<GizmoConfigStore>) {
    let (lines, _) = store.config_mut::<LineStrokes>();
    lines.line_width = LINE_WEIGHT;
    lines.line_joints = GizmoLineJoint::Round(4);

    let (polygons, _) = store.config_mut::<PolygonStrokes>();
    polygons.line_width = POLYGON_WEIGHT;
    polygons.line_joints = GizmoLineJoint::Miter;

    let (markers, _) = store.config_mut::<MarkerStrokes>();
    markers.line_width = MARKER_WEIGHT;
}

fn stroke_color(style: &FeatureStyle) -> Color {
    style.stroke.rgb_or_fallback().to_bevy(style.stroke_opacity)
}

/// Which gizmo group a path is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeGroup {
    Line,
    Polygon,
}

/// A polyline to stroke; `closed` rings repeat their first vertex when drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePath<'a> {
    pub points: &'a [Vec2],
    pub closed: bool,
    pub color: Color,
    pub group: StrokeGroup,
}

impl StrokePath<'_> {
    pub fn vertices<'s>(&'s self) -> impl Iterator<Item = Vec2> + 's {
        let points: &'s [Vec2] = self.points;
        let close = if self.closed { points.first() } else { None };
        points.iter().chain(close).copied()
    }
}

/// Marker rim; `radius` is already in world units.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerRim {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

#[derive(Debug, Default)]
pub struct Strokes<'a> {
    pub paths: Vec<StrokePath<'a>>,
    pub markers: Vec<MarkerRim>,
}

/// Outlines of every visible layer that overlaps `view`, bottom to top.
pub fn collect_strokes<'a>(registry: &'a LayerRegistry, view: Bounds, scale: f32) -> Strokes<'a> {
    let mut strokes = Strokes::default();
    for layer in registry.visible_layers() {
        if !layer.bounds.is_some_and(|b| view.intersects(&b)) {
            continue;
        }
        let ring_group = if layer.kind == GeometryKind::Polygon {
            StrokeGroup::Polygon
        } else {
            StrokeGroup::Line
        };
        for feature in &layer.features {
            let color = stroke_color(&feature.style);
            for shape in &feature.shapes {
                match shape {
                    Shape::Point(p) => strokes.markers.push(MarkerRim {
                        center: *p,
                        radius: feature.style.radius * scale,
                        color,
                    }),
                    Shape::Line(points) => strokes.paths.push(StrokePath {
                        points,
                        closed: false,
                        color,
                        group: StrokeGroup::Line,
                    }),
                    Shape::Polygon(rings) => {
                        strokes.paths.extend(rings.iter().map(|ring| StrokePath {
                            points: ring,
                            closed: true,
                            color,
                            group: ring_group,
                        }))
                    }
                }
            }
        }
    }
    strokes
}

/// Draw the outlines of every visible layer, culled to the visible part of
/// the map.
pub fn draw_layer_strokes(
    registry: Res<LayerRegistry>,
    viewport: Res<MapViewport>,
    mut lines: Gizmos<LineStrokes>,
    mut polygons: Gizmos<PolygonStrokes>,
    mut markers: Gizmos<MarkerStrokes>,
) {
    let strokes = collect_strokes(&registry, viewport.visible_bounds(), viewport.scale);
    for rim in &strokes.markers {
        markers.circle_2d(Isometry2d::from_translation(rim.center), rim.radius, rim.color);
    }
    for path in &strokes.paths {
        match path.group {
            StrokeGroup::Line => lines.linestrip_2d(path.vertices(), path.color),
            StrokeGroup::Polygon => polygons.linestrip_2d(path.vertices(), path.color),
        }
    }
}
