//! Character controller
//!
//! Translates abstract input flags into velocity changes on a single player
//! body. Holds tuning only; all state lives on the body.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{BodyHandle, Role};
use super::world::World;
use crate::consts::*;

/// Input flags for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Reported by the host but has no movement effect
    pub down: bool,
}

/// Drives one player body from input
#[derive(Debug, Clone)]
pub struct CharacterController {
    pub player: BodyHandle,
    /// Horizontal velocity added per frame while a direction is held
    pub move_delta: f32,
    /// Speed beyond which held input stops accelerating
    pub max_speed: f32,
    /// Upward launch speed
    pub jump_velocity: f32,
}

impl CharacterController {
    pub fn new(player: BodyHandle) -> Self {
        Self {
            player,
            move_delta: MOVE_DELTA,
            max_speed: MAX_WALK_SPEED,
            jump_velocity: JUMP_VELOCITY,
        }
    }

    pub fn with_tuning(mut self, move_delta: f32, max_speed: f32, jump_velocity: f32) -> Self {
        self.move_delta = move_delta;
        self.max_speed = max_speed;
        self.jump_velocity = jump_velocity;
        self
    }

    /// Apply one frame of input to the controlled body
    ///
    /// Held directions accelerate up to `max_speed` but never slow a body that
    /// is already faster. Jumping requires the body to be standing.
    pub fn set_input(&self, world: &mut World, input: &InputState) {
        let Some(body) = world.get_mut(self.player) else {
            return;
        };

        if input.left && body.vel.x > -self.max_speed {
            body.vel.x = (body.vel.x - self.move_delta).max(-self.max_speed);
        }
        if input.right && body.vel.x < self.max_speed {
            body.vel.x = (body.vel.x + self.move_delta).min(self.max_speed);
        }

        if let Role::Player(state) = &mut body.role {
            if input.jump && state.standing {
                state.standing = false;
                body.vel.y = -self.jump_velocity;
            }
        }
    }

    /// Direction the player is currently moving, for aiming helpers
    pub fn facing(&self, world: &World) -> Vec2 {
        match world.get(self.player) {
            Some(body) if body.vel.x < 0.0 => -Vec2::X,
            _ => Vec2::X,
        }
    }
}
