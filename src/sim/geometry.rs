//! Geometry primitives
//!
//! Points are plain `glam::Vec2`. Everything here is frame-agnostic; callers
//! decide whether coordinates are world or screen space.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Closed line segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Closest point on the segment to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let line_vec = self.b - self.a;
        let line_len_sq = line_vec.length_squared();
        if line_len_sq < 1e-8 {
            return self.a; // Degenerate segment
        }
        let t = ((p - self.a).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
        self.a + line_vec * t
    }

    /// Euclidean distance from `p` to the segment
    #[inline]
    pub fn distance_to(&self, p: Vec2) -> f32 {
        (p - self.closest_point(p)).length()
    }

    /// Check if two closed segments share at least one point
    ///
    /// Touching endpoints and collinear overlap count as intersecting.
    pub fn intersects(&self, other: &Segment) -> bool {
        let d1 = orient(other.a, other.b, self.a);
        let d2 = orient(other.a, other.b, self.b);
        let d3 = orient(self.a, self.b, other.a);
        let d4 = orient(self.a, self.b, other.b);

        if straddles(d1, d2) && straddles(d3, d4) {
            return true;
        }

        (d1 == 0.0 && within_bounds(other.a, other.b, self.a))
            || (d2 == 0.0 && within_bounds(other.a, other.b, self.b))
            || (d3 == 0.0 && within_bounds(self.a, self.b, other.a))
            || (d4 == 0.0 && within_bounds(self.a, self.b, other.b))
    }
}

/// Signed area of the triangle (a, b, c); > 0 when c is left of a→b
#[inline]
fn orient(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

#[inline]
fn straddles(d1: f32, d2: f32) -> bool {
    (d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0)
}

/// For a point already known to be collinear with a→b
#[inline]
fn within_bounds(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Circle by center and radius
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// A segment intersects the circle when it passes strictly within `radius`.
    /// Tangent contact does not count.
    #[inline]
    pub fn intersects_segment(&self, segment: &Segment) -> bool {
        segment.distance_to(self.center) < self.radius
    }

    /// World y-extent of the circle
    pub fn y_interval(&self) -> Interval {
        Interval::new(self.center.y - self.radius, self.center.y + self.radius)
    }
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest box containing every point, `None` for an empty slice
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    /// Corners in loop order: bottom-left, top-left, top-right, bottom-right
    pub fn corners(&self) -> [Vec2; 4] {
        [
            self.min,
            Vec2::new(self.min.x, self.max.y),
            self.max,
            Vec2::new(self.max.x, self.min.y),
        ]
    }

    /// The four sides: top, right, bottom, left
    pub fn edges(&self) -> [Segment; 4] {
        let [bottom_left, top_left, top_right, bottom_right] = self.corners();
        [
            Segment::new(top_left, top_right),
            Segment::new(bottom_right, top_right),
            Segment::new(bottom_left, bottom_right),
            Segment::new(top_left, bottom_left),
        ]
    }

    /// Point strictly inside (boundary excluded)
    #[inline]
    pub fn contains_point_strict(&self, p: Vec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }

    /// Shallowest axis overlap with `other`, 0 when the boxes are apart
    pub fn penetration(&self, other: &Aabb) -> f32 {
        let overlap_x = self.max.x.min(other.max.x) - self.min.x.max(other.min.x);
        let overlap_y = self.max.y.min(other.max.y) - self.min.y.max(other.min.y);
        overlap_x.min(overlap_y).max(0.0)
    }

    #[inline]
    pub fn y_interval(&self) -> Interval {
        Interval::new(self.min.y, self.max.y)
    }
}

/// A bounding space along y only (infinitely wide)
///
/// Two spaces intersect when their y ranges overlap by more than a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub bottom: f32,
    pub top: f32,
}

impl Interval {
    /// Build from two bounds in either order
    pub fn new(a: f32, b: f32) -> Self {
        Self {
            bottom: a.min(b),
            top: a.max(b),
        }
    }

    #[inline]
    pub fn intersects(&self, other: &Interval) -> bool {
        self.bottom < other.top && self.top > other.bottom
    }

    /// `other` lies entirely within this interval
    #[inline]
    pub fn contains(&self, other: &Interval) -> bool {
        other.bottom >= self.bottom && other.top <= self.top
    }

    #[inline]
    pub fn midpoint(&self) -> f32 {
        (self.bottom + self.top) * 0.5
    }

    pub fn union(&self, other: &Interval) -> Self {
        Self {
            bottom: self.bottom.min(other.bottom),
            top: self.top.max(other.top),
        }
    }

    /// Grow both bounds outward by `pad`
    pub fn padded(&self, pad: f32) -> Self {
        Self {
            bottom: self.bottom - pad,
            top: self.top + pad,
        }
    }
}

/// Edges of a closed polygon loop (last vertex connects back to the first)
pub fn polygon_edges(points: &[Vec2]) -> impl Iterator<Item = Segment> + '_ {
    let n = points.len();
    (0..n).map(move |i| Segment::new(points[i], points[(i + 1) % n]))
}

/// Check if a point is inside a polygon using ray casting
pub fn point_in_polygon(p: Vec2, points: &[Vec2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (points[i], points[j]);
        // Horizontal edges never cross the ray
        let dy = pj.y - pi.y;
        if dy.abs() > f32::EPSILON && ((pi.y > p.y) != (pj.y > p.y)) {
            let x_intersect = (pj.x - pi.x) * (p.y - pi.y) / dy + pi.x;
            if p.x < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// General (convex or concave) polygon intersection
///
/// Polygons intersect when any pair of edges touches, or when one polygon
/// lies entirely inside the other. With no edge contact, containment is
/// decided by a single vertex.
pub fn polygons_intersect(a: &[Vec2], b: &[Vec2]) -> bool {
    if a.len() < 3 || b.len() < 3 {
        return false;
    }

    let edges_touch = polygon_edges(a).any(|ea| polygon_edges(b).any(|eb| ea.intersects(&eb)));
    edges_touch || point_in_polygon(a[0], b) || point_in_polygon(b[0], a)
}
