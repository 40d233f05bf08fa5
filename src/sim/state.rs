//! World state and core simulation types
//!
//! All positions except the player's are world space. The player rides with
//! the camera, so its position is screen space and is lifted into world
//! space (add the scroll offset) for collision tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collider::{Collider, ColliderKind};
use super::geometry::Aabb;
use super::index::IntervalTree;
use super::snapshot::TextureKey;
use super::spawn::{SpawnPoint, SpawnedHull, maybe_spawn, spawn_barrier};
use super::viewport::Viewport;
use crate::authored_to_world;
use crate::consts::PLAYER_ROTATION;
use crate::level::{LevelData, LevelError};
use crate::settings::Settings;

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Screen-space center
    pub pos: Vec2,
    pub half_extents: Vec2,
    /// Degrees
    pub rotation: f32,
}

impl Player {
    /// Centered horizontally, resting on the bottom of the screen
    pub fn new(screen_width: f32, half_extents: Vec2) -> Self {
        Self {
            pos: Vec2::new(screen_width * 0.5, half_extents.y),
            half_extents,
            rotation: PLAYER_ROTATION,
        }
    }

    /// Screen-space bounding rectangle
    pub fn rect(&self) -> Aabb {
        Aabb::from_center_half_extents(self.pos, self.half_extents)
    }

    /// Keep the whole rectangle on screen
    pub fn clamp_to_screen(&mut self, screen_width: f32, screen_height: f32) {
        let min = self.half_extents;
        let max = Vec2::new(screen_width, screen_height) - self.half_extents;
        self.pos = self.pos.max(min).min(max.max(min));
    }
}

/// Drawable world object kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Tile,
    Hull,
}

/// A drawable object in world space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub half_extents: Vec2,
    pub texture: TextureKey,
    pub rotation: f32,
    /// Collider owned by this entity, removed with it
    pub collider: Option<u32>,
}

impl Entity {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.pos, self.half_extents)
    }
}

/// A short-lived impact sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactEffect {
    pub id: u32,
    pub pos: Vec2,
    pub ttl_ticks: u32,
}

/// Things the view layer may want to react to
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A spawn marker fired
    Spawned { spawn_point: u32, entities: Vec<u32> },
    /// The player was shunted out of a collider
    Collision { collider_id: u32, kind: ColliderKind },
    /// Impact sprite requested at a world position
    Impact { pos: Vec2 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    pub viewport: Viewport,
    pub player: Player,
    /// Sorted by id
    pub colliders: Vec<Collider>,
    /// Sorted by id
    pub entities: Vec<Entity>,
    /// Sorted by world y so markers fire in scroll order
    pub spawn_points: Vec<SpawnPoint>,
    pub effects: Vec<ImpactEffect>,
    /// Undrained events
    pub events: Vec<GameEvent>,
    pub index: IntervalTree,
    pub world_width: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Latched by the BREAK action
    pub should_terminate: bool,
    /// Next entity/collider id
    next_id: u32,
}

impl World {
    /// Empty world of the given size
    pub fn new(world_width: f32, world_height: f32, settings: Settings) -> Self {
        Self {
            viewport: Viewport::new(world_height, settings.screen_height, settings.scroll_rate),
            player: Player::new(settings.screen_width, settings.player_half_extents),
            settings,
            colliders: Vec::new(),
            entities: Vec::new(),
            spawn_points: Vec::new(),
            effects: Vec::new(),
            events: Vec::new(),
            index: IntervalTree::default(),
            world_width,
            time_ticks: 0,
            should_terminate: false,
            next_id: 1,
        }
    }

    /// Build the world from level data
    ///
    /// Any malformed collision or spawn object rejects the whole level.
    pub fn from_level(level: &LevelData, settings: Settings) -> Result<Self, LevelError> {
        level.validate()?;
        let total_height = level.total_height();
        let mut world = Self::new(level.total_width(), total_height, settings);

        let tile_half = Vec2::splat(level.tile_size as f32 * 0.5);
        for layer in &level.tile_layers {
            for tile in &layer.tiles {
                let id = world.next_entity_id();
                world.entities.push(Entity {
                    id,
                    kind: EntityKind::Tile,
                    pos: authored_to_world(total_height, level.tile_center(tile)),
                    half_extents: tile_half,
                    texture: TextureKey::Index(tile.texture),
                    rotation: 0.0,
                    collider: None,
                });
            }
        }

        for object in level.collision_objects()? {
            let collider = Collider::build(world.next_entity_id(), object, total_height)?;
            if !collider.kind.is_solid() {
                log::warn!(
                    "Collider '{}' has unknown kind '{}', treating as inert",
                    collider.name,
                    collider.kind.as_str()
                );
            }
            world.add_collider(collider);
        }

        for object in level.spawn_objects() {
            let point = SpawnPoint::from_object(world.next_entity_id(), object, total_height)?;
            if world.settings.spawn_template(&point.kind).is_none() {
                return Err(LevelError::UnknownSpawnKind {
                    name: point.name,
                    kind: point.kind,
                });
            }
            world.add_spawn_point(point);
        }

        log::info!(
            "World built: {} entities, {} colliders, {} spawn points, height {}",
            world.entities.len(),
            world.colliders.len(),
            world.spawn_points.len(),
            total_height
        );
        Ok(world)
    }

    /// Allocate a new entity/collider id
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a collider and index it. Ids come from `next_entity_id`, so
    /// appending keeps the list sorted.
    pub fn add_collider(&mut self, collider: Collider) {
        self.index.insert(collider.id, collider.y_interval());
        let pos = self.colliders.partition_point(|c| c.id < collider.id);
        self.colliders.insert(pos, collider);
    }

    pub fn collider(&self, id: u32) -> Option<&Collider> {
        self.colliders
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|i| &self.colliders[i])
    }

    /// Remove a collider from the world and the index
    pub fn remove_collider(&mut self, id: u32) -> Option<Collider> {
        let i = self.colliders.binary_search_by_key(&id, |c| c.id).ok()?;
        let collider = self.colliders.remove(i);
        self.index.remove(collider.id, collider.y_interval());
        Some(collider)
    }

    /// Remove an entity and the collider it owns
    pub fn despawn(&mut self, entity_id: u32) -> bool {
        let Ok(i) = self.entities.binary_search_by_key(&entity_id, |e| e.id) else {
            return false;
        };
        let entity = self.entities.remove(i);
        if let Some(collider_id) = entity.collider {
            self.remove_collider(collider_id);
        }
        true
    }

    /// Despawn hulls whose top is more than `margin` below the screen
    pub fn prune_behind(&mut self, margin: f32) -> usize {
        let cutoff = self.viewport.scroll_offset - margin;
        let stale: Vec<u32> = self
            .entities
            .iter()
            .filter(|e| e.kind == EntityKind::Hull && e.bounds().max.y < cutoff)
            .map(|e| e.id)
            .collect();
        for &id in &stale {
            self.despawn(id);
        }
        if !stale.is_empty() {
            log::debug!("Pruned {} hulls behind y={}", stale.len(), cutoff);
        }
        stale.len()
    }

    /// Add a spawn marker, keeping scroll order
    pub fn add_spawn_point(&mut self, point: SpawnPoint) {
        let pos = self
            .spawn_points
            .partition_point(|p| p.position.y <= point.position.y);
        self.spawn_points.insert(pos, point);
    }

    /// World y beyond which spawn markers are not yet in range
    pub fn spawn_barrier(&self) -> f32 {
        spawn_barrier(
            self.viewport.scroll_offset,
            self.viewport.screen_height,
            self.settings.spawn_lookahead,
        )
    }

    /// Fire every marker inside the barrier; returns entities created
    pub fn run_spawns(&mut self) -> usize {
        let barrier = self.spawn_barrier();
        let mut fired: Vec<(u32, Vec<SpawnedHull>)> = Vec::new();

        for point in self.spawn_points.iter_mut() {
            if point.position.y >= barrier {
                break; // Sorted by y, nothing further is in range
            }
            let Some(template) = self.settings.spawn_templates.get(&point.kind) else {
                continue;
            };
            if let Some(hulls) = maybe_spawn(point, barrier, template) {
                fired.push((point.id, hulls));
            }
        }

        let mut created = 0;
        for (spawn_point, hulls) in fired {
            let entities: Vec<u32> = hulls
                .into_iter()
                .map(|hull| self.add_hull(hull, spawn_point))
                .collect();
            created += entities.len();
            self.events.push(GameEvent::Spawned {
                spawn_point,
                entities,
            });
        }
        created
    }

    /// Insert a spawned hull with its collider
    fn add_hull(&mut self, hull: SpawnedHull, spawn_point: u32) -> u32 {
        let collider_id = self.next_entity_id();
        let name = format!("spawn{}-hull{}", spawn_point, collider_id);
        self.add_collider(Collider::rectangle(
            collider_id,
            hull.center,
            hull.half_extents,
            hull.collider_kind,
            &name,
        ));

        let id = self.next_entity_id();
        self.entities.push(Entity {
            id,
            kind: EntityKind::Hull,
            pos: hull.center,
            half_extents: hull.half_extents,
            texture: hull.texture,
            rotation: hull.rotation,
            collider: Some(collider_id),
        });
        id
    }

    /// Player center in world space
    pub fn player_world_pos(&self) -> Vec2 {
        self.viewport.to_world(self.player.pos)
    }

    /// Player rectangle in world space
    pub fn player_world_rect(&self) -> Aabb {
        Aabb::from_center_half_extents(self.player_world_pos(), self.player.half_extents)
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
