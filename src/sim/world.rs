//! The owned collection of simulated bodies
//!
//! Bodies are kept sorted by handle so iteration order (and therefore every
//! simulation result) is deterministic.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{BodyHandle, RigidBody, Role, RoleTag};
use super::shape::Shape;
use crate::consts::EDGE_EPSILON;

/// All live bodies of one simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    bodies: Vec<RigidBody>,
    next_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            next_id: 1,
        }
    }

    /// Add a plain physical body
    pub fn spawn(
        &mut self,
        shape: Shape,
        pos: Vec2,
        vel: Vec2,
        mass: f32,
        restitution: f32,
        locked: bool,
    ) -> BodyHandle {
        self.insert(RigidBody::new(shape, pos, vel, mass, restitution, locked))
    }

    /// Add a fully built body, assigning it a fresh handle
    pub fn insert(&mut self, mut body: RigidBody) -> BodyHandle {
        let id = BodyHandle(self.next_id);
        self.next_id += 1;

        body.id = id;
        body.destroyed = false;
        log::debug!("Spawned {:?} {:?} at {:?}", body.role.tag(), id, body.pos);
        self.bodies.push(body);
        id
    }

    /// Remove a body immediately
    ///
    /// Returns false if the handle was already gone. Destruction requested from
    /// inside a step goes through contact reactions instead.
    pub fn destroy(&mut self, handle: BodyHandle) -> bool {
        match self.index_of(handle) {
            Some(index) => {
                self.bodies.remove(index);
                log::debug!("Destroyed {:?}", handle);
                true
            }
            None => false,
        }
    }

    /// Remove everything (level reset). Handles are never reused.
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    fn index_of(&self, handle: BodyHandle) -> Option<usize> {
        self.bodies.binary_search_by_key(&handle, |b| b.id).ok()
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.index_of(handle)
            .map(|i| &self.bodies[i])
            .filter(|b| !b.is_destroyed())
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.index_of(handle)
            .map(|i| &mut self.bodies[i])
            .filter(|b| !b.is_destroyed())
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Live bodies in handle order
    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut [RigidBody] {
        &mut self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Live bodies with the given role
    pub fn with_role(&self, tag: RoleTag) -> impl Iterator<Item = &RigidBody> {
        self.bodies
            .iter()
            .filter(move |b| !b.is_destroyed() && b.role.tag() == tag)
    }

    /// Drop every body whose destruction was requested during a step
    pub(crate) fn sweep_destroyed(&mut self) -> Vec<BodyHandle> {
        let removed: Vec<BodyHandle> = self
            .bodies
            .iter()
            .filter(|b| b.is_destroyed())
            .map(|b| b.id)
            .collect();
        if !removed.is_empty() {
            self.bodies.retain(|b| !b.is_destroyed());
            log::debug!("Swept destroyed bodies {:?}", removed);
        }
        removed
    }

    /// Merge vertically stacked walls until no pair is mergeable
    ///
    /// Two walls merge when they have the same width and left edge and one's
    /// bottom edge touches the other's top edge. The upper wall survives,
    /// grows to cover both, and takes on their combined mass. Returns the
    /// number of merges performed.
    pub fn merge_walls(&mut self) -> usize {
        let mut merges = 0;
        while let Some((upper, lower)) = self.find_stacked_walls() {
            let lower_body = self.bodies.remove(lower);
            let upper = if lower < upper { upper - 1 } else { upper };
            let wall = &mut self.bodies[upper];

            let top = wall.bounds().min.y;
            let width = wall.bounds().width();
            let height = wall.bounds().height() + lower_body.bounds().height();
            wall.shape = Shape::rect(width, height);
            wall.pos.y = top + height / 2.0;
            wall.set_mass(wall.mass + lower_body.mass);

            log::debug!(
                "Merged wall {:?} into {:?} (height {})",
                lower_body.id,
                wall.id,
                height
            );
            merges += 1;
        }
        merges
    }

    /// Indices of (upper, lower) for the first pair of stacked walls
    fn find_stacked_walls(&self) -> Option<(usize, usize)> {
        let walls: Vec<usize> = self
            .bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| {
                !b.is_destroyed()
                    && matches!(b.role, Role::Wall)
                    && matches!(b.shape, Shape::Box { .. })
            })
            .map(|(i, _)| i)
            .collect();

        for &i in &walls {
            let upper = self.bodies[i].bounds();
            for &j in &walls {
                if i == j {
                    continue;
                }
                let lower = self.bodies[j].bounds();
                let same_column = (upper.min.x - lower.min.x).abs() < EDGE_EPSILON
                    && (upper.width() - lower.width()).abs() < EDGE_EPSILON;
                if same_column && (upper.max.y - lower.min.y).abs() < EDGE_EPSILON {
                    return Some((i, j));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_assigns_increasing_handles() {
        let mut world = World::new();
        let a = world.spawn(Shape::circle(1.0), Vec2::ZERO, Vec2::ZERO, 1.0, 0.5, false);
        let b = world.insert(RigidBody::wall(0.0, 0.0, 10.0, 10.0));
        assert!(a < b);
        assert_eq!(world.len(), 2);
        assert_eq!(world.get(a).unwrap().id, a);
        assert!(world.get(b).unwrap().is_locked());
    }

    #[test]
    fn test_destroy_twice_is_a_no_op() {
        let mut world = World::new();
        let a = world.spawn(Shape::circle(1.0), Vec2::ZERO, Vec2::ZERO, 1.0, 0.5, false);
        let b = world.spawn(Shape::circle(1.0), Vec2::X, Vec2::ZERO, 1.0, 0.5, false);

        assert!(world.destroy(a));
        assert!(!world.destroy(a));
        assert!(world.get(a).is_none());
        assert!(world.contains(b));
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_handles_not_reused_after_clear() {
        let mut world = World::new();
        let a = world.insert(RigidBody::wall(0.0, 0.0, 10.0, 10.0));
        world.clear();
        let b = world.insert(RigidBody::wall(0.0, 0.0, 10.0, 10.0));
        assert_ne!(a, b);
        assert!(world.get(a).is_none());
    }

    #[test]
    fn test_destroyed_bodies_hidden_until_swept() {
        let mut world = World::new();
        let a = world.insert(RigidBody::bullet(Vec2::ZERO, Vec2::X, 2.0));
        world.bodies_mut()[0].destroyed = true;

        assert!(world.get(a).is_none());
        assert_eq!(world.with_role(RoleTag::Bullet).count(), 0);
        assert_eq!(world.sweep_destroyed(), vec![a]);
        assert!(world.is_empty());
    }

    #[test]
    fn test_merge_two_stacked_walls() {
        let mut world = World::new();
        let lower = world.insert(RigidBody::wall(40.0, 60.0, 20.0, 20.0));
        let upper = world.insert(RigidBody::wall(40.0, 40.0, 20.0, 20.0));

        assert_eq!(world.merge_walls(), 1);
        assert_eq!(world.len(), 1);
        assert!(world.get(lower).is_none());

        let wall = world.get(upper).unwrap();
        let bounds = wall.bounds();
        assert_eq!(bounds.min, Vec2::new(40.0, 40.0));
        assert_eq!(bounds.max, Vec2::new(60.0, 80.0));
        assert_eq!(wall.mass, 800.0);
        assert_eq!(wall.inv_mass, 0.0);
    }

    #[test]
    fn test_merge_column_reaches_fixed_point() {
        let mut world = World::new();
        // Inserted out of order on purpose
        for row in [3.0, 0.0, 4.0, 1.0, 2.0] {
            world.insert(RigidBody::wall(100.0, 200.0 + row * 20.0, 20.0, 20.0));
        }

        assert_eq!(world.merge_walls(), 4);
        assert_eq!(world.len(), 1);
        let bounds = world.bodies()[0].bounds();
        assert_eq!(bounds.min.y, 200.0);
        assert!((bounds.height() - 100.0).abs() < 1e-4);
        assert_eq!(world.bodies()[0].mass, 2000.0);
    }

    #[test]
    fn test_no_merge_for_mismatched_walls() {
        let mut world = World::new();
        // Different widths
        world.insert(RigidBody::wall(0.0, 0.0, 20.0, 20.0));
        world.insert(RigidBody::wall(0.0, 20.0, 40.0, 20.0));
        // Side by side
        world.insert(RigidBody::wall(100.0, 0.0, 20.0, 20.0));
        world.insert(RigidBody::wall(120.0, 0.0, 20.0, 20.0));
        // Gap between them
        world.insert(RigidBody::wall(200.0, 0.0, 20.0, 20.0));
        world.insert(RigidBody::wall(200.0, 30.0, 20.0, 20.0));
        // Goals are not walls
        world.insert(RigidBody::goal(300.0, 0.0));
        world.insert(RigidBody::goal(300.0, 20.0));

        assert_eq!(world.merge_walls(), 0);
        assert_eq!(world.len(), 8);
    }
}
