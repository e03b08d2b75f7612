//! Ear-clipping triangulation for polygon fills.
//!
//! Holes are bridged into the outer ring first, turning each polygon into a
//! single (weakly) simple ring that can be clipped ear by ear.

use bevy::math::Vec2;

/// Triangulate a polygon given as outer ring followed by holes (open rings).
///
/// Returns a flat triangle list, three vertices per triangle. Degenerate input
/// yields fewer (possibly zero) triangles rather than an error.
pub fn triangulate(rings: &[Vec<Vec2>]) -> Vec<Vec2> {
    let Some(outer) = rings.first() else {
        return Vec::new();
    };
    if outer.len() < 3 {
        return Vec::new();
    }
    // Work relative to the first vertex so cross products stay small.
    let origin = outer[0];
    let local = |ring: &Vec<Vec2>| -> Vec<Vec2> { ring.iter().map(|p| *p - origin).collect() };

    let mut ring = local(outer);
    if signed_area(&ring) < 0.0 {
        ring.reverse();
    }

    let mut holes: Vec<Vec<Vec2>> = rings[1..]
        .iter()
        .filter(|h| h.len() >= 3)
        .map(|h| {
            let mut h = local(h);
            if signed_area(&h) > 0.0 {
                h.reverse();
            }
            h
        })
        .collect();
    holes.sort_by(|a, b| max_x(b).total_cmp(&max_x(a)));
    for (i, hole) in holes.iter().enumerate() {
        ring = bridge_hole(ring, hole, &holes[i + 1..]);
    }

    clip_ears(&ring)
        .into_iter()
        .map(|p| p + origin)
        .collect()
}

fn signed_area(ring: &[Vec2]) -> f32 {
    let n = ring.len();
    (0..n)
        .map(|i| ring[i].perp_dot(ring[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

fn max_x(ring: &[Vec2]) -> f32 {
    ring.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max)
}

/// Splice `hole` into `ring` through the shortest bridge that crosses no
/// edge. A hole with no such bridge is left out of the fill.
fn bridge_hole(ring: Vec<Vec2>, hole: &[Vec2], pending: &[Vec<Vec2>]) -> Vec<Vec2> {
    let (hi, &h) = hole
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.x.total_cmp(&b.1.x))
        .unwrap_or((0, &hole[0]));

    let mut candidates: Vec<usize> = (0..ring.len()).collect();
    candidates.sort_by(|&a, &b| ring[a].distance_squared(h).total_cmp(&ring[b].distance_squared(h)));

    let edges = || {
        ring_edges(&ring)
            .chain(ring_edges(hole))
            .chain(pending.iter().flat_map(|p| ring_edges(p)))
    };
    let Some(ri) = candidates
        .into_iter()
        .find(|&i| !edges().any(|(a, b)| segments_cross(ring[i], h, a, b)))
    else {
        return ring;
    };

    let mut merged = Vec::with_capacity(ring.len() + hole.len() + 2);
    merged.extend_from_slice(&ring[..=ri]);
    merged.extend(hole[hi..].iter().chain(&hole[..=hi]));
    merged.extend_from_slice(&ring[ri..]);
    merged
}

fn ring_edges(ring: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = ring.len();
    (0..n).map(move |i| (ring[i], ring[(i + 1) % n]))
}

/// Proper crossing only: shared endpoints and touching do not count.
fn segments_cross(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    if p1 == q1 || p1 == q2 || p2 == q1 || p2 == q2 {
        return false;
    }
    let d1 = (p2 - p1).perp_dot(q1 - p1);
    let d2 = (p2 - p1).perp_dot(q2 - p1);
    let d3 = (q2 - q1).perp_dot(p1 - q1);
    let d4 = (q2 - q1).perp_dot(p2 - q1);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).perp_dot(p - a);
    let d2 = (c - b).perp_dot(p - b);
    let d3 = (a - c).perp_dot(p - c);
    d1 >= 0.0 && d2 >= 0.0 && d3 >= 0.0
}

/// Clip ears from a counter-clockwise ring.
fn clip_ears(ring: &[Vec2]) -> Vec<Vec2> {
    let mut idx: Vec<usize> = (0..ring.len()).collect();
    let mut out = Vec::with_capacity(ring.len().saturating_sub(2) * 3);
    let mut cursor = 0;
    let mut misses = 0;

    while idx.len() > 3 {
        let n = idx.len();
        let (ia, ib, ic) = (idx[(cursor + n - 1) % n], idx[cursor % n], idx[(cursor + 1) % n]);
        let (a, b, c) = (ring[ia], ring[ib], ring[ic]);
        let convex = (b - a).perp_dot(c - b) > 0.0;
        let is_ear = convex
            && !idx.iter().any(|&j| {
                let p = ring[j];
                p != a && p != b && p != c && point_in_triangle(p, a, b, c)
            });

        // After a full lap without an ear the ring is degenerate; clip anyway
        // so the loop terminates.
        if is_ear || misses >= n {
            if convex {
                out.extend([a, b, c]);
            }
            idx.remove(cursor % n);
            misses = 0;
            if cursor >= idx.len() {
                cursor = 0;
            }
        } else {
            cursor = (cursor + 1) % n;
            misses += 1;
        }
    }
    if idx.len() == 3 {
        let (a, b, c) = (ring[idx[0]], ring[idx[1]], ring[idx[2]]);
        if (b - a).perp_dot(c - b) != 0.0 {
            out.extend([a, b, c]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area_of(triangles: &[Vec2]) -> f32 {
        triangles
            .chunks(3)
            .map(|t| ((t[1] - t[0]).perp_dot(t[2] - t[0]) * 0.5).abs())
            .sum()
    }

    fn square(min: f32, max: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(min, min),
            Vec2::new(max, min),
            Vec2::new(max, max),
            Vec2::new(min, max),
        ]
    }

    #[test]
    fn square_becomes_two_triangles() {
        let tris = triangulate(&[square(0.0, 10.0)]);
        assert_eq!(tris.len(), 6);
        assert!((area_of(&tris) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn clockwise_input_is_accepted() {
        let mut ring = square(0.0, 10.0);
        ring.reverse();
        assert!((area_of(&triangulate(&[ring])) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn concave_polygon_keeps_its_area() {
        // An L shape: 3x3 square minus the upper-right 2x2 corner.
        let ring = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 3.0),
            Vec2::new(0.0, 3.0),
        ];
        let tris = triangulate(&[ring]);
        assert_eq!(tris.len(), 12);
        assert!((area_of(&tris) - 5.0).abs() < 1e-3);
    }

    #[test]
    fn hole_is_left_unfilled() {
        let tris = triangulate(&[square(0.0, 10.0), square(4.0, 6.0)]);
        assert!((area_of(&tris) - 96.0).abs() < 1e-2, "area {}", area_of(&tris));
    }

    #[test]
    fn far_from_origin_coordinates_are_handled() {
        let offset = Vec2::new(2_596_000.0, 5_264_000.0);
        let ring: Vec<Vec2> = square(0.0, 100.0).into_iter().map(|p| p + offset).collect();
        let tris = triangulate(&[ring]);
        assert_eq!(tris.len(), 6);
    }

    #[test]
    fn degenerate_rings_yield_nothing() {
        assert!(triangulate(&[]).is_empty());
        assert!(triangulate(&[vec![Vec2::ZERO, Vec2::ONE]]).is_empty());
        let collinear = vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)];
        assert!(triangulate(&[collinear]).is_empty());
    }
}
