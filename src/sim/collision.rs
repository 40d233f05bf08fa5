//! Narrow phase: exact overlap tests between the player rectangle and colliders
//!
//! These are pure predicates. They report *whether* the shapes overlap; the
//! resolution policy decides what to do about it.

use glam::Vec2;

use super::collider::{Collider, ColliderShape};
use super::geometry::{Aabb, Circle, polygons_intersect};

/// A collider the player overlaps this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub collider_id: u32,
    /// Bounding-box overlap depth, used only for ordering
    pub penetration: f32,
}

/// Check collision between the player rectangle and a polygon loop
#[inline]
pub fn rect_polygon_collision(rect: &Aabb, points: &[Vec2]) -> bool {
    polygons_intersect(&rect.corners(), points)
}

/// Check collision between the player rectangle and a circle
///
/// A center strictly inside the rectangle is an immediate hit. Otherwise the
/// four sides are tested as segments against the circle.
pub fn rect_circle_collision(rect: &Aabb, circle: &Circle) -> bool {
    if rect.contains_point_strict(circle.center) {
        return true;
    }
    rect.edges()
        .iter()
        .any(|side| circle.intersects_segment(side))
}

/// Check collision between the player rectangle and any collider
pub fn rect_hits_collider(rect: &Aabb, collider: &Collider) -> bool {
    match &collider.shape {
        ColliderShape::Polygon(points) => rect_polygon_collision(rect, points),
        ColliderShape::Circle(circle) => rect_circle_collision(rect, circle),
    }
}

/// Every candidate the rectangle overlaps, in candidate order
pub fn find_contacts<'a>(
    rect: &Aabb,
    candidates: impl IntoIterator<Item = &'a Collider>,
) -> Vec<Contact> {
    candidates
        .into_iter()
        .filter(|collider| rect_hits_collider(rect, collider))
        .map(|collider| Contact {
            collider_id: collider.id,
            penetration: rect.penetration(&collider.bounds()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collider::ColliderKind;
    use proptest::prelude::*;

    fn player_rect(x: f32, y: f32) -> Aabb {
        Aabb::from_center_half_extents(Vec2::new(x, y), Vec2::new(28.0, 55.0))
    }

    #[test]
    fn test_circle_at_corner() {
        let rect = player_rect(600.0, 400.0);
        let corner = rect.max;

        assert!(!rect_circle_collision(&rect, &Circle::new(corner, 0.0)));
        assert!(rect_circle_collision(&rect, &Circle::new(corner, 0.5)));
    }

    #[test]
    fn test_circle_center_inside() {
        let rect = player_rect(600.0, 400.0);
        // Small circle entirely inside never touches an edge
        assert!(rect_circle_collision(&rect, &Circle::new(Vec2::new(600.0, 400.0), 2.0)));
    }

    #[test]
    fn test_circle_near_edge() {
        let rect = player_rect(600.0, 400.0);
        // Right edge at x = 628
        assert!(rect_circle_collision(&rect, &Circle::new(Vec2::new(635.0, 400.0), 10.0)));
        assert!(!rect_circle_collision(&rect, &Circle::new(Vec2::new(640.0, 400.0), 10.0)));
        // Tangent contact is not a hit
        assert!(!rect_circle_collision(&rect, &Circle::new(Vec2::new(638.0, 400.0), 10.0)));
    }

    #[test]
    fn test_rect_inside_polygon() {
        let land = Collider::rectangle(
            1,
            Vec2::new(600.0, 400.0),
            Vec2::new(500.0, 500.0),
            ColliderKind::Land,
            "island",
        );
        assert!(rect_hits_collider(&player_rect(600.0, 400.0), &land));
    }

    #[test]
    fn test_find_contacts() {
        let near = Collider::rectangle(1, Vec2::new(640.0, 400.0), Vec2::splat(20.0), ColliderKind::Rock, "near");
        let far = Collider::rectangle(2, Vec2::new(900.0, 400.0), Vec2::splat(20.0), ColliderKind::Rock, "far");
        let contacts = find_contacts(&player_rect(600.0, 400.0), [&near, &far]);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].collider_id, 1);
        // Player right edge 628, rock left edge 620
        assert!((contacts[0].penetration - 8.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_far_circles_never_hit(
            px in 0.0f32..1200.0,
            py in 0.0f32..800.0,
            angle in 0.0f32..std::f32::consts::TAU,
            radius in 0.0f32..50.0,
        ) {
            let rect = player_rect(px, py);
            // Farther than the rectangle's half-diagonal plus radius
            let dist = Vec2::new(28.0, 55.0).length() + radius + 1.0;
            let center = Vec2::new(px, py) + Vec2::from_angle(angle) * dist;
            prop_assert!(!rect_circle_collision(&rect, &Circle::new(center, radius)));
        }

        #[test]
        fn prop_circle_center_inside_always_hits(
            px in 0.0f32..1200.0,
            py in 0.0f32..800.0,
            dx in -27.0f32..27.0,
            dy in -54.0f32..54.0,
            radius in 0.0f32..50.0,
        ) {
            let rect = player_rect(px, py);
            let center = Vec2::new(px + dx, py + dy);
            prop_assert!(rect_circle_collision(&rect, &Circle::new(center, radius)));
        }
    }
}
