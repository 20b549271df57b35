//! One frame of simulation
//!
//! Fixed order, one global pass per frame:
//! 1. gravity on every unlocked body
//! 2. integrate every body's position by its velocity
//! 3. broad phase against the post-integration positions
//! 4. per pair: narrow phase, impulse, positional correction, contact hooks
//!
//! Bodies destroyed by a contact hook are flagged immediately, skipped by every
//! later pair of the same pass, and swept once the pass ends.

use glam::Vec2;

use super::body::{BodyHandle, Contact, ContactReaction};
use super::collision::{broad_phase, detect};
use super::resolve::{pair_mut, resolve};
use super::world::World;
use crate::consts::CORRECTION_PERCENT;

/// Something that happened during a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepEvent {
    /// A colliding pair was resolved; `normal` points from `a` to `b`
    Contact {
        a: BodyHandle,
        b: BodyHandle,
        normal: Vec2,
        penetration: f32,
    },
    /// A body asked to be removed and is gone after this step
    Destroyed(BodyHandle),
}

/// Advance the world by one frame with the default correction percent
pub fn step(world: &mut World, gravity: f32) -> Vec<StepEvent> {
    step_with_correction(world, gravity, CORRECTION_PERCENT)
}

/// Advance the world by one frame
pub fn step_with_correction(
    world: &mut World,
    gravity: f32,
    correction_percent: f32,
) -> Vec<StepEvent> {
    // Standing only holds while a supporting contact is seen this frame
    for body in world.bodies_mut() {
        if let Some(state) = body.player_state_mut() {
            state.standing = false;
        }
    }

    apply_gravity(world, gravity);
    integrate(world);
    let events = resolve_contacts(world, correction_percent);
    world.sweep_destroyed();
    events
}

/// Accelerate every unlocked body downward
pub fn apply_gravity(world: &mut World, gravity: f32) {
    for body in world.bodies_mut() {
        if !body.is_locked() && !body.is_destroyed() {
            body.vel.y += gravity;
        }
    }
}

/// Move every body by its velocity
pub fn integrate(world: &mut World) {
    for body in world.bodies_mut() {
        if !body.is_destroyed() {
            body.pos += body.vel;
        }
    }
}

/// Detect and resolve every colliding pair once
///
/// Destroyed bodies are flagged but not swept; `step` sweeps them.
pub fn resolve_contacts(world: &mut World, correction_percent: f32) -> Vec<StepEvent> {
    let bodies = world.bodies_mut();
    let pairs = broad_phase(bodies);
    let mut events = Vec::new();

    for (i, j) in pairs {
        if bodies[i].is_destroyed() || bodies[j].is_destroyed() {
            continue;
        }
        let Some(manifold) = detect(bodies, i, j) else {
            continue;
        };

        resolve(bodies, &manifold, correction_percent);

        let (a, b) = pair_mut(bodies, i, j);
        log::trace!(
            "Contact {:?}/{:?} normal {:?} depth {}",
            a.id,
            b.id,
            manifold.normal,
            manifold.penetration
        );
        events.push(StepEvent::Contact {
            a: a.id,
            b: b.id,
            normal: manifold.normal,
            penetration: manifold.penetration,
        });

        let seen_by_a = Contact {
            other: b.role.tag(),
            other_locked: b.is_locked(),
            normal: manifold.normal,
        };
        let seen_by_b = Contact {
            other: a.role.tag(),
            other_locked: a.is_locked(),
            normal: -manifold.normal,
        };

        for (body, contact) in [(a, seen_by_a), (b, seen_by_b)] {
            if body.on_contact(&contact) == ContactReaction::Destroy {
                body.destroyed = true;
                events.push(StepEvent::Destroyed(body.id));
            }
        }
    }

    events
}
