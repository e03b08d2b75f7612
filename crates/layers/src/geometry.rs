//! Projection of GeoJSON geometries into map world space.
//!
//! World space is spherical Web Mercator in meters, with +Y pointing north so
//! it lines up with Bevy's 2D camera.

use bevy::math::{DVec2, Vec2};
use geojson::{Geometry, Value};

const EARTH_RADIUS_M: f64 = 6_378_137.0;
/// Web Mercator is undefined at the poles; latitudes are clamped to this.
const MAX_LATITUDE: f64 = 85.051_128_78;

/// Project WGS84 longitude/latitude (degrees) into world meters.
pub fn project(lon: f64, lat: f64) -> Vec2 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = EARTH_RADIUS_M * lon.to_radians();
    let y = EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
    DVec2::new(x, y).as_vec2()
}

/// Inverse of [`project`], returning `(lon, lat)` in degrees.
pub fn unproject(world: Vec2) -> (f64, f64) {
    let p = world.as_dvec2();
    let lon = (p.x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (p.y / EARTH_RADIUS_M).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lon, lat)
}

/// Axis-aligned rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn from_point(p: Vec2) -> Self {
        Self { min: p, max: p }
    }

    /// Bounds of `points`, or `None` when there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec2>) -> Option<Self> {
        points.into_iter().fold(None, |acc: Option<Bounds>, p| {
            Some(match acc {
                Some(b) => b.extended(*p),
                None => Bounds::from_point(*p),
            })
        })
    }

    pub fn extended(self, p: Vec2) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    pub fn union(self, other: Bounds) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Union of every bounds in `iter`; `None` for an empty iterator.
    pub fn union_all(iter: impl IntoIterator<Item = Bounds>) -> Option<Self> {
        iter.into_iter().reduce(Bounds::union)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        self.contains(other.min) && self.contains(other.max)
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

/// A projected drawable primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Vec2),
    /// Polyline with at least two vertices.
    Line(Vec<Vec2>),
    /// Outer ring first, then holes. Rings are open (no repeated closing vertex).
    Polygon(Vec<Vec<Vec2>>),
}

impl Shape {
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Shape::Point(p) => Some(Bounds::from_point(*p)),
            Shape::Line(points) => Bounds::from_points(points),
            Shape::Polygon(rings) => Bounds::from_points(rings.first()?),
        }
    }
}

/// Flatten a GeoJSON geometry into projected shapes.
///
/// Positions with fewer than two coordinates are dropped, as are lines and
/// rings left without enough vertices to draw.
pub fn shapes_from_geometry(geometry: &Geometry) -> Vec<Shape> {
    let mut shapes = Vec::new();
    collect_shapes(&geometry.value, &mut shapes);
    shapes
}

fn collect_shapes(value: &Value, out: &mut Vec<Shape>) {
    match value {
        Value::Point(pos) => out.extend(project_position(pos).map(Shape::Point)),
        Value::MultiPoint(points) => {
            out.extend(points.iter().filter_map(|p| project_position(p)).map(Shape::Point));
        }
        Value::LineString(line) => out.extend(line_shape(line)),
        Value::MultiLineString(lines) => out.extend(lines.iter().filter_map(|l| line_shape(l))),
        Value::Polygon(rings) => out.extend(polygon_shape(rings)),
        Value::MultiPolygon(polygons) => {
            out.extend(polygons.iter().filter_map(|rings| polygon_shape(rings)));
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_shapes(&g.value, out);
            }
        }
    }
}

fn project_position(pos: &[f64]) -> Option<Vec2> {
    match pos {
        [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Some(project(*lon, *lat)),
        _ => None,
    }
}

fn line_shape(line: &[Vec<f64>]) -> Option<Shape> {
    let points: Vec<Vec2> = line.iter().filter_map(|p| project_position(p)).collect();
    (points.len() >= 2).then_some(Shape::Line(points))
}

fn polygon_shape(rings: &[Vec<Vec<f64>>]) -> Option<Shape> {
    let mut projected = Vec::with_capacity(rings.len());
    for (i, ring) in rings.iter().enumerate() {
        let mut points: Vec<Vec2> = ring.iter().filter_map(|p| project_position(p)).collect();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            if i == 0 {
                return None;
            }
            continue;
        }
        projected.push(points);
    }
    (!projected.is_empty()).then_some(Shape::Polygon(projected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(value: Value) -> Geometry {
        Geometry::new(value)
    }

    #[test]
    fn projection_round_trips_through_unproject() {
        let p = project(23.3219, 42.6977);
        let (lon, lat) = unproject(p);
        assert!((lon - 23.3219).abs() < 1e-4, "lon {lon}");
        assert!((lat - 42.6977).abs() < 1e-4, "lat {lat}");
    }

    #[test]
    fn north_is_positive_y() {
        assert!(project(0.0, 10.0).y > project(0.0, 0.0).y);
        assert!(project(10.0, 0.0).x > project(0.0, 0.0).x);
    }

    #[test]
    fn bounds_union_covers_both() {
        let a = Bounds::from_point(Vec2::new(0.0, 0.0));
        let b = Bounds::from_point(Vec2::new(10.0, -5.0));
        let u = a.union(b);
        assert_eq!(u.min, Vec2::new(0.0, -5.0));
        assert_eq!(u.max, Vec2::new(10.0, 0.0));
        assert!(u.contains_bounds(&a) && u.contains_bounds(&b));
    }

    #[test]
    fn touching_bounds_intersect() {
        let a = Bounds {
            min: Vec2::ZERO,
            max: Vec2::splat(10.0),
        };
        let b = Bounds {
            min: Vec2::new(10.0, 5.0),
            max: Vec2::new(20.0, 6.0),
        };
        assert!(a.intersects(&b) && b.intersects(&a));
        assert!(!a.intersects(&Bounds::from_point(Vec2::new(11.0, 0.0))));
    }

    #[test]
    fn union_of_nothing_is_none() {
        assert!(Bounds::union_all(Vec::new()).is_none());
    }

    #[test]
    fn polygon_closing_vertex_is_dropped() {
        let ring = vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ];
        let shapes = shapes_from_geometry(&geometry(Value::Polygon(vec![ring])));
        match &shapes[..] {
            [Shape::Polygon(rings)] => assert_eq!(rings[0].len(), 3),
            other => panic!("unexpected shapes {other:?}"),
        }
    }

    #[test]
    fn degenerate_positions_are_skipped() {
        let shapes = shapes_from_geometry(&geometry(Value::MultiPoint(vec![
            vec![1.0],
            vec![2.0, 3.0],
        ])));
        assert_eq!(shapes.len(), 1);

        let line = shapes_from_geometry(&geometry(Value::LineString(vec![vec![1.0, 1.0]])));
        assert!(line.is_empty());
    }

    #[test]
    fn collections_flatten() {
        let shapes = shapes_from_geometry(&geometry(Value::GeometryCollection(vec![
            geometry(Value::Point(vec![1.0, 2.0])),
            geometry(Value::LineString(vec![vec![0.0, 0.0], vec![1.0, 1.0]])),
        ])));
        assert_eq!(shapes.len(), 2);
        assert!(matches!(shapes[0], Shape::Point(_)));
        assert!(matches!(shapes[1], Shape::Line(_)));
    }
}
