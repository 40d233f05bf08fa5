//! Deterministic simulation module
//!
//! All collision and scrolling logic lives here. This module must be pure:
//! - Fixed timestep only
//! - Stable iteration order (by id, spawn markers by world y)
//! - No rendering or platform dependencies

pub mod collider;
pub mod collision;
pub mod geometry;
pub mod index;
pub mod input;
pub mod resolve;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod viewport;

pub use collider::{Collider, ColliderKind, ColliderShape};
pub use collision::{Contact, find_contacts, rect_hits_collider};
pub use geometry::{Aabb, Circle, Interval, Segment, polygons_intersect};
pub use index::IntervalTree;
pub use input::{Action, InputState};
pub use resolve::{Resolution, resolve, shunt};
pub use snapshot::{DebugOutline, DrawItem, Frame, PLAYER_ENTITY_ID, TextureKey};
pub use spawn::{SpawnPoint, SpawnTemplate, maybe_spawn};
pub use state::{Entity, EntityKind, GameEvent, ImpactEffect, Player, World};
pub use tick::tick;
pub use viewport::Viewport;
