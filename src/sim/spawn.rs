//! Proximity-triggered spawning
//!
//! Spawn markers sit in world space. Once the scroll brings a marker inside
//! the look-ahead band above the screen it fires, exactly once, producing a
//! vertical stack of hulls below it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collider::ColliderKind;
use super::snapshot::TextureKey;
use crate::authored_to_world;
use crate::consts::DEFAULT_SPAWN_COUNT;
use crate::level::{AuthoredObject, LevelError};

/// What a spawn marker produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnTemplate {
    pub texture: TextureKey,
    /// Visual footprint, also used as the collider rectangle
    pub half_extents: Vec2,
    /// Vertical gap between stacked entities (and below the marker)
    pub gap: f32,
    pub collider_kind: ColliderKind,
    /// Sprite rotation in degrees
    pub rotation: f32,
}

/// An authored spawn marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPoint {
    pub id: u32,
    pub name: String,
    /// World-space marker position
    pub position: Vec2,
    /// Template key (upper-case)
    pub kind: String,
    pub count: u32,
    /// One-shot latch; never cleared once set
    pub has_spawned: bool,
}

impl SpawnPoint {
    /// Build a spawn marker from an authored object
    ///
    /// A missing `type` is fatal. A missing `count` property defaults to 3.
    pub fn from_object(
        id: u32,
        object: &AuthoredObject,
        total_height: f32,
    ) -> Result<Self, LevelError> {
        let kind = object
            .kind
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LevelError::MissingSpawnKind {
                name: object.name.clone(),
            })?;

        let count = match object.properties.get("count") {
            None => DEFAULT_SPAWN_COUNT,
            Some(value) => parse_count(value).ok_or_else(|| LevelError::InvalidSpawnCount {
                name: object.name.clone(),
                value: value.to_string(),
            })?,
        };

        Ok(Self {
            id,
            name: object.name.clone(),
            position: authored_to_world(total_height, Vec2::new(object.x, object.y)),
            kind: kind.to_ascii_uppercase(),
            count,
            has_spawned: false,
        })
    }
}

/// Counts may be authored as numbers or numeric strings
fn parse_count(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// One entity produced by a spawn marker, in world space
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedHull {
    pub center: Vec2,
    pub half_extents: Vec2,
    pub texture: TextureKey,
    pub rotation: f32,
    pub collider_kind: ColliderKind,
}

/// World y above which markers are not yet in range
#[inline]
pub fn spawn_barrier(scroll_offset: f32, screen_height: f32, lookahead: f32) -> f32 {
    scroll_offset + screen_height + lookahead
}

/// Fire a spawn marker if it is inside the barrier and has not fired yet
pub fn maybe_spawn(
    point: &mut SpawnPoint,
    barrier: f32,
    template: &SpawnTemplate,
) -> Option<Vec<SpawnedHull>> {
    if point.has_spawned || point.position.y >= barrier {
        return None;
    }
    point.has_spawned = true;

    let height = template.half_extents.y * 2.0;
    let hulls = (0..point.count)
        .map(|i| {
            let top = point.position.y - template.gap - i as f32 * (height + template.gap);
            SpawnedHull {
                center: Vec2::new(point.position.x, top - template.half_extents.y),
                half_extents: template.half_extents,
                texture: template.texture.clone(),
                rotation: template.rotation,
                collider_kind: template.collider_kind.clone(),
            }
        })
        .collect();

    log::info!(
        "Spawn point '{}' fired: {} x {} at ({:.0}, {:.0})",
        point.name,
        point.count,
        point.kind,
        point.position.x,
        point.position.y
    );
    Some(hulls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template() -> SpawnTemplate {
        SpawnTemplate {
            texture: TextureKey::Index(20),
            half_extents: Vec2::new(24.0, 48.0),
            gap: 16.0,
            collider_kind: ColliderKind::Hull,
            rotation: 0.0,
        }
    }

    fn marker(y: f32, count: u32) -> SpawnPoint {
        SpawnPoint {
            id: 1,
            name: "convoy".to_string(),
            position: Vec2::new(300.0, y),
            kind: "HULL".to_string(),
            count,
            has_spawned: false,
        }
    }

    #[test]
    fn test_fires_inside_barrier() {
        let mut point = marker(1000.0, 3);
        assert!(maybe_spawn(&mut point, 1000.0, &template()).is_none());
        assert!(!point.has_spawned);

        let hulls = maybe_spawn(&mut point, 1000.5, &template()).unwrap();
        assert!(point.has_spawned);
        assert_eq!(hulls.len(), 3);
        // Stacked downward with a 16px gap between 96px footprints
        assert_eq!(hulls[0].center, Vec2::new(300.0, 1000.0 - 16.0 - 48.0));
        assert_eq!(hulls[1].center.y, hulls[0].center.y - 112.0);
        assert_eq!(hulls[2].center.y, hulls[1].center.y - 112.0);
        assert!(hulls[0].center.y + hulls[0].half_extents.y < 1000.0);
    }

    #[test]
    fn test_fires_exactly_once() {
        let mut point = marker(500.0, 2);
        let fired = (0..100)
            .filter(|i| maybe_spawn(&mut point, 600.0 + *i as f32, &template()).is_some())
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_barrier() {
        assert_eq!(spawn_barrier(192.0, 800.0, 512.0), 1504.0);
    }

    #[test]
    fn test_from_object_defaults_count() {
        let obj = AuthoredObject {
            x: 64.0,
            y: 100.0,
            kind: Some("hull".to_string()),
            name: "a".to_string(),
            ..Default::default()
        };
        let point = SpawnPoint::from_object(9, &obj, 4480.0).unwrap();
        assert_eq!(point.count, DEFAULT_SPAWN_COUNT);
        assert_eq!(point.kind, "HULL");
        assert_eq!(point.position, Vec2::new(64.0, 4380.0));
    }

    #[test]
    fn test_from_object_count_property() {
        let mut obj = AuthoredObject {
            kind: Some("HULL".to_string()),
            ..Default::default()
        };
        obj.properties.insert("count".to_string(), json!(5));
        assert_eq!(SpawnPoint::from_object(1, &obj, 100.0).unwrap().count, 5);

        obj.properties.insert("count".to_string(), json!("2"));
        assert_eq!(SpawnPoint::from_object(1, &obj, 100.0).unwrap().count, 2);

        obj.properties.insert("count".to_string(), json!("many"));
        assert!(matches!(
            SpawnPoint::from_object(1, &obj, 100.0),
            Err(LevelError::InvalidSpawnCount { .. })
        ));
    }

    #[test]
    fn test_from_object_missing_kind() {
        let obj = AuthoredObject {
            name: "nameless".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            SpawnPoint::from_object(1, &obj, 100.0),
            Err(LevelError::MissingSpawnKind { .. })
        ));
    }
}
