//! Static obstacles in world space
//!
//! Colliders are built once from authored level objects (or at spawn time)
//! and never move afterwards; scrolling only changes how they map to screen.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, Circle, Interval};
use crate::authored_to_world;
use crate::level::{AuthoredObject, LevelError};

/// Collider type tag, drives the resolution policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColliderKind {
    /// Landmass: shunts the player, no visual effect
    Land,
    /// Rock hazard: shunts and leaves an impact
    Rock,
    /// Spawned enemy hull: shunts and leaves an impact
    Hull,
    /// Anything else the level author invented (decorative, sensors, ...)
    Other(String),
}

impl ColliderKind {
    /// Parse an authored type tag (case-insensitive)
    pub fn parse(tag: &str) -> Self {
        match tag.to_ascii_uppercase().as_str() {
            "LAND" => ColliderKind::Land,
            "ROCK" => ColliderKind::Rock,
            "HULL" => ColliderKind::Hull,
            _ => ColliderKind::Other(tag.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColliderKind::Land => "LAND",
            ColliderKind::Rock => "ROCK",
            ColliderKind::Hull => "HULL",
            ColliderKind::Other(tag) => tag,
        }
    }

    /// Kinds that leave an impact sprite when hit
    #[inline]
    pub fn is_impact(&self) -> bool {
        matches!(self, ColliderKind::Rock | ColliderKind::Hull)
    }

    /// Kinds the player is pushed out of
    #[inline]
    pub fn is_solid(&self) -> bool {
        !matches!(self, ColliderKind::Other(_))
    }
}

/// Collider geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Closed vertex loop, at least three points
    Polygon(Vec<Vec2>),
    Circle(Circle),
}

/// An obstacle in world space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collider {
    pub id: u32,
    pub shape: ColliderShape,
    pub kind: ColliderKind,
    /// Diagnostic only
    pub name: String,
    /// Reference point for the shunt heuristic
    pub anchor: Vec2,
}

/// Usable rectangle side: positive and finite
fn is_extent(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

impl Collider {
    /// Build a collider from an authored object
    ///
    /// Objects with a point list become polygons. Objects with only a
    /// width/height become circles centered on the rectangle with radius
    /// `width / 2`.
    pub fn build(
        id: u32,
        object: &AuthoredObject,
        total_height: f32,
    ) -> Result<Self, LevelError> {
        let kind = ColliderKind::parse(object.kind.as_deref().unwrap_or_default());
        let origin = Vec2::new(object.x, object.y);

        let (shape, anchor) = match (&object.points, object.width, object.height) {
            (Some(points), _, _) => {
                if points.len() < 3 {
                    return Err(LevelError::DegeneratePolygon {
                        name: object.name.clone(),
                        count: points.len(),
                    });
                }
                let points = points
                    .iter()
                    .map(|&p| authored_to_world(total_height, p))
                    .collect();
                (
                    ColliderShape::Polygon(points),
                    authored_to_world(total_height, origin),
                )
            }
            (None, Some(width), Some(height)) if is_extent(width) && is_extent(height) => {
                let center =
                    authored_to_world(total_height, origin + Vec2::new(width, height) * 0.5);
                (ColliderShape::Circle(Circle::new(center, width * 0.5)), center)
            }
            _ => {
                return Err(LevelError::MalformedGeometry {
                    name: object.name.clone(),
                });
            }
        };

        Ok(Self {
            id,
            shape,
            kind,
            name: object.name.clone(),
            anchor,
        })
    }

    /// Rectangular polygon collider already in world space
    pub fn rectangle(id: u32, center: Vec2, half_extents: Vec2, kind: ColliderKind, name: &str) -> Self {
        let corners = Aabb::from_center_half_extents(center, half_extents).corners();
        Self {
            id,
            shape: ColliderShape::Polygon(corners.to_vec()),
            kind,
            name: name.to_string(),
            anchor: center,
        }
    }

    /// World-space bounding box
    pub fn bounds(&self) -> Aabb {
        match &self.shape {
            ColliderShape::Polygon(points) => {
                Aabb::from_points(points).unwrap_or(Aabb { min: self.anchor, max: self.anchor })
            }
            ColliderShape::Circle(circle) => {
                Aabb::from_center_half_extents(circle.center, Vec2::splat(circle.radius))
            }
        }
    }

    /// World-space y-extent, the key used by the interval tree
    pub fn y_interval(&self) -> Interval {
        match &self.shape {
            ColliderShape::Circle(circle) => circle.y_interval(),
            ColliderShape::Polygon(_) => self.bounds().y_interval(),
        }
    }
}
