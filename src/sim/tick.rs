//! Fixed timestep simulation tick
//!
//! Stages run strictly in order: scroll, spawn, integrate, collide/resolve.
//! Each stage only sees fully updated state from the ones before it.

use super::collision::find_contacts;
use super::input::InputState;
use super::resolve::{order_contacts, resolve};
use super::state::{GameEvent, ImpactEffect, World};
use crate::consts::BROAD_PHASE_PADDING;

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &InputState, dt: f32) {
    if input.user_break && !world.should_terminate {
        log::info!("Break requested at tick {}", world.time_ticks);
        world.should_terminate = true;
    }
    if world.should_terminate {
        return;
    }

    world.time_ticks += 1;

    // Scroll
    let scrolled = world.viewport.advance(dt);
    if scrolled > 0.0 && world.viewport.is_finished() {
        log::info!("Reached top of level at tick {}", world.time_ticks);
    }

    // Spawn
    world.run_spawns();

    // Integrate
    let (screen_w, screen_h) = (world.settings.screen_width, world.settings.screen_height);
    world.player.pos += input.direction() * world.settings.player_speed * dt;
    world.player.clamp_to_screen(screen_w, screen_h);

    // Collide and resolve
    resolve_collisions(world);
    world.player.clamp_to_screen(screen_w, screen_h);

    update_effects(world);

    if let Some(margin) = world.settings.prune_margin {
        world.prune_behind(margin);
    }
}

/// Test the player against nearby solid colliders and shunt it out
///
/// Contacts are gathered against the rectangle at the start of the stage and
/// then resolved one at a time against the live player position. The index
/// query is padded because the narrow phase counts touching edges as contact
/// while interval intersection is strict.
fn resolve_collisions(world: &mut World) {
    let rect = world.player_world_rect();
    let candidates = world.index.query(rect.y_interval().padded(BROAD_PHASE_PADDING));
    let mut contacts = find_contacts(
        &rect,
        candidates
            .iter()
            .filter_map(|&id| world.collider(id))
            .filter(|collider| collider.kind.is_solid()),
    );
    if contacts.is_empty() {
        return;
    }
    order_contacts(&mut contacts, world.settings.resolution_order);

    for contact in contacts {
        let player = world.player_world_pos();
        let Some(collider) = world.collider(contact.collider_id) else {
            continue;
        };
        let kind = collider.kind.clone();
        let Some(resolution) = resolve(world.player.half_extents, player, collider) else {
            continue;
        };

        log::debug!(
            "Hit {} '{}' at ({:.1}, {:.1}), shunt ({:.1}, {:.1})",
            kind.as_str(),
            collider.name,
            player.x,
            player.y,
            resolution.displacement.x,
            resolution.displacement.y
        );

        world.player.pos += resolution.displacement;
        world.events.push(GameEvent::Collision {
            collider_id: contact.collider_id,
            kind,
        });

        if let Some(pos) = resolution.impact {
            let id = world.next_entity_id();
            world.effects.push(ImpactEffect {
                id,
                pos,
                ttl_ticks: world.settings.impact_ttl_ticks,
            });
            world.events.push(GameEvent::Impact { pos });
        }
    }
}

/// Age impact sprites and drop expired ones
fn update_effects(world: &mut World) {
    for effect in world.effects.iter_mut() {
        effect.ttl_ticks = effect.ttl_ticks.saturating_sub(1);
    }
    world.effects.retain(|e| e.ttl_ticks > 0);
}
