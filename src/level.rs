//! Level data handed over by the map loader
//!
//! The map editor export is parsed elsewhere; this is the plain data it is
//! reduced to. Coordinates are authored: origin top-left, y down, in pixels.
//! Polygon points are absolute, not relative to the object position.

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Level loading errors. All of them reject the whole level.
#[derive(thiserror::Error, Debug)]
pub enum LevelError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Required object layer is absent
    #[error("Missing object layer: {0}")]
    MissingLayer(String),

    /// Collision object with neither points nor width/height
    #[error("Malformed geometry on '{name}': no points and no width/height")]
    MalformedGeometry { name: String },

    /// Polygon with too few points
    #[error("Polygon '{name}' has {count} points, need at least 3")]
    DegeneratePolygon { name: String, count: usize },

    /// Spawn marker without a type
    #[error("Spawn point '{name}' has no type")]
    MissingSpawnKind { name: String },

    /// Spawn marker whose type has no template
    #[error("Spawn point '{name}' uses unknown template '{kind}'")]
    UnknownSpawnKind { name: String, kind: String },

    /// Spawn marker `count` that is not a non-negative integer
    #[error("Spawn point '{name}' has invalid count: {value}")]
    InvalidSpawnCount { name: String, value: String },

    /// Zero-sized map, or one too large to measure in pixels
    #[error("Invalid map dimensions: {width}x{height} tiles of {tile_size}px")]
    InvalidDimensions {
        width: u32,
        height: u32,
        tile_size: u32,
    },
}

/// An object from an object layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthoredObject {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub points: Option<Vec<Vec2>>,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    /// Authored type tag (LAND, ROCK, HULL, ...)
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// One placed tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRef {
    pub col: u32,
    pub row: u32,
    /// Index into the tile atlas
    pub texture: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TileLayer {
    pub name: String,
    #[serde(default)]
    pub tiles: Vec<TileRef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectLayer {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<AuthoredObject>,
}

/// A whole level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    /// Map width in tiles
    pub width: u32,
    /// Map height in tiles
    pub height: u32,
    /// Tile edge in pixels
    pub tile_size: u32,
    /// Tile layers in draw order
    #[serde(default)]
    pub tile_layers: Vec<TileLayer>,
    #[serde(default)]
    pub object_layers: Vec<ObjectLayer>,
}

impl LevelData {
    pub const COLLISION_LAYER: &'static str = "collisions";
    pub const SPAWN_LAYER: &'static str = "spawns";

    /// Parse a level from JSON
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelData = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Load a level JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let level = Self::from_json(&json)?;
        log::info!(
            "Loaded level {} ({}x{} tiles)",
            path.as_ref().display(),
            level.width,
            level.height
        );
        Ok(level)
    }

    /// Reject empty maps and maps whose pixel size does not fit in a `u32`
    pub fn validate(&self) -> Result<(), LevelError> {
        let overflows = self.width.checked_mul(self.tile_size).is_none()
            || self.height.checked_mul(self.tile_size).is_none();
        if overflows || self.width == 0 || self.height == 0 || self.tile_size == 0 {
            return Err(LevelError::InvalidDimensions {
                width: self.width,
                height: self.height,
                tile_size: self.tile_size,
            });
        }
        Ok(())
    }

    /// Level height in pixels; the y-flip pivot
    #[inline]
    pub fn total_height(&self) -> f32 {
        self.height as f32 * self.tile_size as f32
    }

    #[inline]
    pub fn total_width(&self) -> f32 {
        self.width as f32 * self.tile_size as f32
    }

    pub fn object_layer(&self, name: &str) -> Option<&ObjectLayer> {
        self.object_layers.iter().find(|layer| layer.name == name)
    }

    /// The collision layer is mandatory
    pub fn collision_objects(&self) -> Result<&[AuthoredObject], LevelError> {
        self.object_layer(Self::COLLISION_LAYER)
            .map(|layer| layer.objects.as_slice())
            .ok_or_else(|| LevelError::MissingLayer(Self::COLLISION_LAYER.to_string()))
    }

    /// The spawn layer is optional
    pub fn spawn_objects(&self) -> &[AuthoredObject] {
        self.object_layer(Self::SPAWN_LAYER)
            .map(|layer| layer.objects.as_slice())
            .unwrap_or_default()
    }

    /// Authored center of a tile
    pub fn tile_center(&self, tile: &TileRef) -> Vec2 {
        let size = self.tile_size as f32;
        Vec2::new(
            tile.col as f32 * size + size * 0.5,
            tile.row as f32 * size + size * 0.5,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEVEL: &str = r#"{
        "width": 19,
        "height": 70,
        "tile_size": 64,
        "tile_layers": [
            { "name": "water", "tiles": [ { "col": 0, "row": 69, "texture": 37 } ] }
        ],
        "object_layers": [
            { "name": "collisions", "objects": [
                { "x": 10, "y": 20, "width": 40, "height": 40, "type": "ROCK", "name": "rock1" },
                { "x": 0, "y": 0, "points": [[0, 0], [64, 0], [64, 64]], "type": "LAND", "name": "shore" }
            ] },
            { "name": "spawns", "objects": [
                { "x": 300, "y": 1000, "type": "HULL", "name": "convoy", "properties": { "count": 2 } }
            ] }
        ]
    }"#;

    #[test]
    fn test_parse_level() {
        let level = LevelData::from_json(LEVEL).unwrap();
        assert_eq!(level.total_height(), 4480.0);
        assert_eq!(level.total_width(), 1216.0);

        let objects = level.collision_objects().unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].kind.as_deref(), Some("ROCK"));
        assert_eq!(objects[1].points.as_ref().map(Vec::len), Some(3));
        assert_eq!(level.spawn_objects().len(), 1);

        let tile = level.tile_layers[0].tiles[0];
        assert_eq!(level.tile_center(&tile), Vec2::new(32.0, 69.0 * 64.0 + 32.0));
    }

    #[test]
    fn test_missing_collision_layer() {
        let level = LevelData::from_json(r#"{ "width": 1, "height": 1, "tile_size": 64 }"#).unwrap();
        assert!(matches!(
            level.collision_objects(),
            Err(LevelError::MissingLayer(_))
        ));
        assert!(level.spawn_objects().is_empty());
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            LevelData::from_json(r#"{ "width": 0, "height": 70, "tile_size": 64 }"#),
            Err(LevelError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_oversized_dimensions() {
        // 70000 * 70000 pixels overflows u32
        assert!(matches!(
            LevelData::from_json(r#"{ "width": 1, "height": 70000, "tile_size": 70000 }"#),
            Err(LevelError::InvalidDimensions { height: 70000, .. })
        ));

        let level = LevelData {
            width: 1,
            height: 70_000,
            tile_size: 70_000,
            tile_layers: Vec::new(),
            object_layers: Vec::new(),
        };
        assert!(level.validate().is_err());
        assert_eq!(level.total_height(), 4.9e9);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            LevelData::from_json("{ not json"),
            Err(LevelError::Parse(_))
        ));
    }
}
