//! Seaward - scrolling-world collision core for a top-down vertical scroller
//!
//! Core modules:
//! - `sim`: Deterministic simulation (viewport, colliders, collisions, spawning)
//! - `level`: Level data model handed over by the map loader
//! - `settings`: Data-driven tuning and configuration

pub mod level;
pub mod settings;
pub mod sim;

pub use level::{LevelData, LevelError};
pub use settings::{ResolutionOrder, Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// World units scrolled per second
    pub const SCROLL_RATE: f32 = 64.0;

    /// Player footprint (half extents of the ship sprite)
    pub const PLAYER_HALF_WIDTH: f32 = 28.0;
    pub const PLAYER_HALF_HEIGHT: f32 = 55.0;
    /// Player speed per held direction (pixels/s)
    pub const PLAYER_SPEED: f32 = 100.0;
    /// Ship sprites face down the atlas, rotate to face up-screen
    pub const PLAYER_ROTATION: f32 = 180.0;

    /// Shunt heuristic distance multiplier
    pub const SHUNT_FACTOR: f32 = 1.1;

    /// Extra distance above the top of the screen at which spawn markers fire
    pub const SPAWN_LOOKAHEAD: f32 = 512.0;
    /// Entities per spawn marker when the level omits `count`
    pub const DEFAULT_SPAWN_COUNT: u32 = 3;

    /// Leaf capacity of the interval tree before it splits
    pub const INDEX_SPLIT_THRESHOLD: usize = 8;
    /// Slack added to broad-phase y queries so edge contact reaches the narrow phase
    pub const BROAD_PHASE_PADDING: f32 = 1.0;

    /// Atlas indices in the ships sheet
    pub const PLAYER_SPRITE_INDEX: u32 = 85;
    pub const IMPACT_SPRITE_INDEX: u32 = 6;
    /// Impact sprites share the ship sheet orientation
    pub const IMPACT_ROTATION: f32 = 180.0;
    pub const HULL_SPRITE_INDEX: u32 = 20;

    /// Impact sprite lifetime in ticks (0.5 s)
    pub const IMPACT_TTL_TICKS: u32 = 30;
}

/// Convert an authored (y-down) coordinate into world space (y-up)
#[inline]
pub fn flip_y(total_height: f32, authored_y: f32) -> f32 {
    total_height - authored_y
}

/// Convert an authored (y-down) point into world space (y-up)
#[inline]
pub fn authored_to_world(total_height: f32, authored: Vec2) -> Vec2 {
    Vec2::new(authored.x, flip_y(total_height, authored.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_y() {
        assert_eq!(flip_y(4480.0, 0.0), 4480.0);
        assert_eq!(flip_y(4480.0, 4480.0), 0.0);
        assert_eq!(
            authored_to_world(100.0, Vec2::new(5.0, 30.0)),
            Vec2::new(5.0, 70.0)
        );
    }
}
