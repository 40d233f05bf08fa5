//! Read-only frame snapshot for the renderer
//!
//! Built after a tick completes. Everything is already in screen space and
//! culled to the visible band.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collider::ColliderShape;
use super::geometry::{Aabb, Interval};
use super::state::World;
use crate::consts::{IMPACT_ROTATION, IMPACT_SPRITE_INDEX, PLAYER_SPRITE_INDEX};

/// Entity id reserved for the player; world ids start at 1
pub const PLAYER_ENTITY_ID: u32 = 0;

/// Texture lookup key understood by the atlas collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureKey {
    /// Texture for atlas index N
    Index(u32),
    /// Texture for a named kind
    Kind(String),
}

/// One sprite to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub entity_id: u32,
    pub screen_x: f32,
    pub screen_y: f32,
    pub texture: TextureKey,
    /// Degrees
    pub rotation: f32,
}

/// Collider outline for debug drawing, in screen space
#[derive(Debug, Clone, PartialEq)]
pub enum DebugOutline {
    Polygon(Vec<Vec2>),
    Circle { center: Vec2, radius: f32 },
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Draw order: tiles, hulls, impacts, player
    pub items: Vec<DrawItem>,
    pub outlines: Vec<DebugOutline>,
    pub scroll_offset: f32,
    pub should_terminate: bool,
}

impl World {
    /// Build the draw list for the current state
    pub fn snapshot(&self) -> Frame {
        let visible = self.viewport.visible_range();
        let on_screen = |bounds: Aabb| bounds.y_interval().intersects(&visible);

        let mut items: Vec<DrawItem> = self
            .entities
            .iter()
            .filter(|e| on_screen(e.bounds()))
            .map(|e| {
                let screen = self.viewport.to_screen(e.pos);
                DrawItem {
                    entity_id: e.id,
                    screen_x: screen.x,
                    screen_y: screen.y,
                    texture: e.texture.clone(),
                    rotation: e.rotation,
                }
            })
            .collect();

        items.extend(self.effects.iter().map(|fx| {
            let screen = self.viewport.to_screen(fx.pos);
            DrawItem {
                entity_id: fx.id,
                screen_x: screen.x,
                screen_y: screen.y,
                texture: TextureKey::Index(IMPACT_SPRITE_INDEX),
                rotation: IMPACT_ROTATION,
            }
        }));

        items.push(DrawItem {
            entity_id: PLAYER_ENTITY_ID,
            screen_x: self.player.pos.x,
            screen_y: self.player.pos.y,
            texture: TextureKey::Index(PLAYER_SPRITE_INDEX),
            rotation: self.player.rotation,
        });

        let outlines = if self.settings.debug_colliders {
            self.debug_outlines(visible)
        } else {
            Vec::new()
        };

        Frame {
            items,
            outlines,
            scroll_offset: self.viewport.scroll_offset,
            should_terminate: self.should_terminate,
        }
    }

    fn debug_outlines(&self, visible: Interval) -> Vec<DebugOutline> {
        self.index
            .query(visible)
            .into_iter()
            .filter_map(|id| self.collider(id))
            .map(|collider| match &collider.shape {
                ColliderShape::Polygon(points) => DebugOutline::Polygon(
                    points.iter().map(|&p| self.viewport.to_screen(p)).collect(),
                ),
                ColliderShape::Circle(circle) => DebugOutline::Circle {
                    center: self.viewport.to_screen(circle.center),
                    radius: circle.radius,
                },
            })
            .collect()
    }
}
