//! Collision response: the positional "shunt"
//!
//! Not a physical impulse. The player is pushed by a distance derived from
//! how far its center sits from the collider anchor, and corrections for
//! several colliders in the same tick are applied one after another. The
//! jitter this can produce under multiple overlaps is part of the game feel.

use glam::Vec2;

use super::collider::{Collider, ColliderKind};
use super::collision::Contact;
use crate::consts::SHUNT_FACTOR;
use crate::settings::ResolutionOrder;

/// Outcome of resolving one contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Add to the player position
    pub displacement: Vec2,
    /// World position for an impact sprite, for impact kinds only
    pub impact: Option<Vec2>,
}

/// Raw shunt for a player at `player` against a collider anchored at `anchor`
///
/// Per axis: `half_extent - |anchor - player| * 1.1`, negated when the player
/// is strictly greater than the anchor on that axis. At an exact tie the
/// comparison is false and the shunt stays positive (up/right).
pub fn shunt(half_extents: Vec2, player: Vec2, anchor: Vec2) -> Vec2 {
    let mut shunt = half_extents - (anchor - player).abs() * SHUNT_FACTOR;
    if player.x > anchor.x {
        shunt.x = -shunt.x;
    }
    if player.y > anchor.y {
        shunt.y = -shunt.y;
    }
    shunt
}

/// Resolve a detected overlap between the player and `collider`
///
/// `player` is the player center in the same frame as the collider (world).
/// Inert kinds return `None`.
pub fn resolve(half_extents: Vec2, player: Vec2, collider: &Collider) -> Option<Resolution> {
    if let ColliderKind::Other(tag) = &collider.kind {
        log::warn!("inert collider '{}' ({}) reached resolution", collider.name, tag);
        return None;
    }

    let displacement = shunt(half_extents, player, collider.anchor);
    let impact = collider
        .kind
        .is_impact()
        .then(|| player - Vec2::new(0.0, half_extents.y));

    Some(Resolution {
        displacement,
        impact,
    })
}

/// Fix the order in which this tick's contacts are resolved
pub fn order_contacts(contacts: &mut [Contact], order: ResolutionOrder) {
    match order {
        ResolutionOrder::ById => contacts.sort_by_key(|c| c.collider_id),
        ResolutionOrder::DeepestFirst => contacts.sort_by(|a, b| {
            b.penetration
                .total_cmp(&a.penetration)
                .then(a.collider_id.cmp(&b.collider_id))
        }),
    }
}
