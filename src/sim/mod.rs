//! Deterministic simulation module
//!
//! All physics and gameplay rules live here. This module must stay pure:
//! - One fixed-order step per frame, velocities in pixels per frame
//! - Stable iteration order (by body handle)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod controller;
pub mod resolve;
pub mod shape;
pub mod step;
pub mod world;

pub use body::{BodyHandle, Contact, ContactReaction, PlayerState, RigidBody, Role, RoleTag};
pub use collision::{
    CollisionResult, Manifold, box_vs_box, box_vs_circle, broad_phase, circle_vs_circle, collide,
};
pub use controller::{CharacterController, InputState};
pub use resolve::{apply_impulse, correct_positions};
pub use shape::{Bounds, Shape};
pub use step::{StepEvent, step, step_with_correction};
pub use world::World;
