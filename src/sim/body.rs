//! Rigid bodies and their gameplay roles
//!
//! A body is composed of a shape, physical properties, and a role. The role is
//! the gameplay capability: it decides how the body reacts when it touches
//! something, given only the other body's role tag.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::{Bounds, Shape};
use crate::consts::*;
use crate::{Color, colors};

/// Stable identifier of a body inside a `World`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Player-only gameplay state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Resting on a locked surface this step (jump allowed)
    pub standing: bool,
    /// Goals collected
    pub score: u32,
}

/// Gameplay role of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Role {
    Player(PlayerState),
    Wall,
    Goal,
    Bullet,
    /// Plain physical body with no gameplay reaction
    Prop,
}

impl Role {
    pub fn tag(&self) -> RoleTag {
        match self {
            Role::Player(_) => RoleTag::Player,
            Role::Wall => RoleTag::Wall,
            Role::Goal => RoleTag::Goal,
            Role::Bullet => RoleTag::Bullet,
            Role::Prop => RoleTag::Prop,
        }
    }
}

/// Data-free role discriminant passed to contact hooks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleTag {
    Player,
    Wall,
    Goal,
    Bullet,
    Prop,
}

/// What a body sees of the body it touched
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub other: RoleTag,
    pub other_locked: bool,
    /// Contact normal pointing from this body toward the other
    pub normal: Vec2,
}

/// Outcome of a contact hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactReaction {
    Keep,
    /// Remove this body from the world; it takes no further part in the step
    Destroy,
}

/// A simulated body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    pub id: BodyHandle,
    pub shape: Shape,
    /// Center of the shape
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    /// Zero for locked or massless bodies
    pub inv_mass: f32,
    pub restitution: f32,
    /// Locked bodies are never moved by resolution, whatever their mass
    locked: bool,
    pub role: Role,
    pub color: Color,
    /// Set once destruction is requested; the body is swept at the end of the step
    #[serde(skip)]
    pub(crate) destroyed: bool,
}

impl RigidBody {
    /// Generic body with explicit physical properties
    pub fn new(
        shape: Shape,
        pos: Vec2,
        vel: Vec2,
        mass: f32,
        restitution: f32,
        locked: bool,
    ) -> Self {
        let mut body = Self {
            id: BodyHandle(0),
            shape,
            pos,
            vel,
            mass,
            inv_mass: 0.0,
            restitution: restitution.clamp(0.0, 1.0),
            locked,
            role: Role::Prop,
            color: colors::PROP,
            destroyed: false,
        };
        body.update_inv_mass();
        body
    }

    /// Circular player centered at `center`, mass from its area
    pub fn player(center: Vec2, radius: f32) -> Self {
        let shape = Shape::circle(radius);
        Self::new(
            shape,
            center,
            Vec2::ZERO,
            shape.area(),
            PLAYER_RESTITUTION,
            false,
        )
        .with_role(Role::Player(PlayerState::default()))
        .with_color(colors::PLAYER)
    }

    /// Locked wall from a top-left corner and size
    pub fn wall(x: f32, y: f32, width: f32, height: f32) -> Self {
        let shape = Shape::rect(width, height);
        let center = Vec2::new(x + width / 2.0, y + height / 2.0);
        Self::new(
            shape,
            center,
            Vec2::ZERO,
            shape.area(),
            DEFAULT_RESTITUTION,
            true,
        )
        .with_role(Role::Wall)
        .with_color(colors::WALL)
    }

    /// Locked goal square from a top-left corner
    pub fn goal(x: f32, y: f32) -> Self {
        Self::wall(x, y, GOAL_SIZE, GOAL_SIZE)
            .with_role(Role::Goal)
            .with_color(colors::GOAL)
    }

    /// Small circular projectile
    pub fn bullet(center: Vec2, vel: Vec2, radius: f32) -> Self {
        let shape = Shape::circle(radius);
        Self::new(shape, center, vel, shape.area(), DEFAULT_RESTITUTION, false)
            .with_role(Role::Bullet)
            .with_color(colors::BULLET)
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock or unlock the body, keeping `inv_mass` consistent
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        self.update_inv_mass();
    }

    /// Change the mass, keeping `inv_mass` consistent
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = mass;
        self.update_inv_mass();
    }

    fn update_inv_mass(&mut self) {
        self.inv_mass = if self.locked || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        };
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn bounds(&self) -> Bounds {
        self.shape.bounds(self.pos)
    }

    pub fn player_state(&self) -> Option<&PlayerState> {
        match &self.role {
            Role::Player(state) => Some(state),
            _ => None,
        }
    }

    pub fn player_state_mut(&mut self) -> Option<&mut PlayerState> {
        match &mut self.role {
            Role::Player(state) => Some(state),
            _ => None,
        }
    }

    /// Gameplay reaction to touching another body
    ///
    /// Called once per colliding pair per step, after the physical response.
    pub fn on_contact(&mut self, contact: &Contact) -> ContactReaction {
        match &mut self.role {
            Role::Player(state) => {
                // y grows downward: a positive normal means the surface is below us
                if contact.other_locked && contact.normal.y > 0.0 {
                    state.standing = true;
                    self.vel.y = 0.0;
                }
                if contact.other == RoleTag::Goal {
                    state.score += 1;
                    log::debug!("Player {:?} collected a goal (score {})", self.id, state.score);
                }
                ContactReaction::Keep
            }
            Role::Goal if contact.other == RoleTag::Player => ContactReaction::Destroy,
            Role::Bullet => ContactReaction::Destroy,
            Role::Goal | Role::Wall | Role::Prop => ContactReaction::Keep,
        }
    }
}
