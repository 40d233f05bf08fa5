//! Game settings and tuning
//!
//! Persisted as JSON next to the level files. Every field has a default, so
//! a settings file only needs the values it overrides.

use std::collections::BTreeMap;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::collider::ColliderKind;
use crate::sim::snapshot::TextureKey;
use crate::sim::spawn::SpawnTemplate;

/// Order in which several simultaneous contacts are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResolutionOrder {
    /// Ascending collider id (load order, then spawn order)
    #[default]
    ById,
    /// Largest bounding-box penetration first, id as tie-break
    DeepestFirst,
}

impl ResolutionOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionOrder::ById => "ById",
            ResolutionOrder::DeepestFirst => "DeepestFirst",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "byid" | "id" => Some(ResolutionOrder::ById),
            "deepestfirst" | "deepest" => Some(ResolutionOrder::DeepestFirst),
            _ => None,
        }
    }
}

/// Settings errors
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Scrolling ===
    /// World units scrolled per second
    pub scroll_rate: f32,
    /// Distance above the screen top at which spawn markers fire
    pub spawn_lookahead: f32,

    // === Player ===
    pub player_half_extents: Vec2,
    /// Speed per held direction (pixels/s)
    pub player_speed: f32,

    // === Collisions ===
    pub resolution_order: ResolutionOrder,
    /// How long impact sprites stay on screen
    pub impact_ttl_ticks: u32,
    /// Hand collider outlines to the renderer
    pub debug_colliders: bool,
    /// Despawn hulls once they are this far below the screen (None keeps them)
    pub prune_margin: Option<f32>,

    // === Spawning ===
    /// Entity templates keyed by upper-case spawn kind
    pub spawn_templates: BTreeMap<String, SpawnTemplate>,
}

impl Default for Settings {
    fn default() -> Self {
        let mut spawn_templates = BTreeMap::new();
        spawn_templates.insert(
            "HULL".to_string(),
            SpawnTemplate {
                texture: TextureKey::Index(HULL_SPRITE_INDEX),
                half_extents: Vec2::new(24.0, 48.0),
                gap: 16.0,
                collider_kind: ColliderKind::Hull,
                rotation: 0.0,
            },
        );
        spawn_templates.insert(
            "PATROL".to_string(),
            SpawnTemplate {
                texture: TextureKey::Kind("patrol".to_string()),
                half_extents: Vec2::new(16.0, 32.0),
                gap: 32.0,
                collider_kind: ColliderKind::Hull,
                rotation: 0.0,
            },
        );

        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            scroll_rate: SCROLL_RATE,
            spawn_lookahead: SPAWN_LOOKAHEAD,

            player_half_extents: Vec2::new(PLAYER_HALF_WIDTH, PLAYER_HALF_HEIGHT),
            player_speed: PLAYER_SPEED,

            resolution_order: ResolutionOrder::ById,
            impact_ttl_ticks: IMPACT_TTL_TICKS,
            debug_colliders: false,
            prune_margin: None,

            spawn_templates,
        }
    }
}

impl Settings {
    /// Look up a spawn template by kind (case-insensitive)
    pub fn spawn_template(&self, kind: &str) -> Option<&SpawnTemplate> {
        self.spawn_templates.get(&kind.to_ascii_uppercase())
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.as_ref().display(), e);
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_order_names() {
        for order in [ResolutionOrder::ById, ResolutionOrder::DeepestFirst] {
            assert_eq!(ResolutionOrder::from_str(order.as_str()), Some(order));
        }
        assert_eq!(ResolutionOrder::from_str("deepest"), Some(ResolutionOrder::DeepestFirst));
        assert_eq!(ResolutionOrder::from_str("random"), None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "scroll_rate": 32.0, "resolution_order": "DeepestFirst" }"#)
                .unwrap();
        assert_eq!(settings.scroll_rate, 32.0);
        assert_eq!(settings.resolution_order, ResolutionOrder::DeepestFirst);
        assert_eq!(settings.screen_height, SCREEN_HEIGHT);
        assert!(settings.spawn_template("hull").is_some());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("seaward_settings_{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.debug_colliders = true;
        settings.prune_margin = Some(256.0);
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert!(loaded.debug_colliders);
        assert_eq!(loaded.prune_margin, Some(256.0));
        assert_eq!(loaded.spawn_templates.len(), settings.spawn_templates.len());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Settings::load("/nonexistent/seaward.json"),
            Err(SettingsError::Io(_))
        ));
        assert_eq!(
            Settings::load_or_default("/nonexistent/seaward.json").scroll_rate,
            SCROLL_RATE
        );
    }
}
