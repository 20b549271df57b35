//! Collision detection for boxes and circles
//!
//! Broad phase: every unordered pair of live bodies, filtered by bounding box
//! overlap. This is O(n²) in body count, which is fine for the tens of bodies a
//! level holds but will not scale to thousands.
//!
//! Narrow phase: exact single-point tests producing a penetration depth and a
//! unit normal pointing from body A toward body B.

use glam::Vec2;

use super::body::RigidBody;
use super::shape::Shape;

/// Result of a narrow-phase test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Unit normal from A toward B (if hit)
    pub normal: Vec2,
    /// Penetration depth (non-negative if hit)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    fn hit(normal: Vec2, penetration: f32) -> Self {
        Self {
            hit: true,
            normal,
            penetration,
        }
    }

    /// Same contact seen from the other body
    fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// A detected collision between two bodies for the current step
///
/// Bodies are referenced by index into the step's body slice, so a manifold
/// must not outlive the step that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Manifold {
    pub a: usize,
    pub b: usize,
    /// Unit normal from A toward B
    pub normal: Vec2,
    pub penetration: f32,
}

/// Separating-axis test between two axis-aligned boxes
///
/// The normal lies on the axis of least penetration; exact ties pick the y axis.
pub fn box_vs_box(pos_a: Vec2, half_a: Vec2, pos_b: Vec2, half_b: Vec2) -> CollisionResult {
    let delta = pos_b - pos_a;

    let x_overlap = half_a.x + half_b.x - delta.x.abs();
    if x_overlap <= 0.0 {
        return CollisionResult::miss();
    }

    let y_overlap = half_a.y + half_b.y - delta.y.abs();
    if y_overlap <= 0.0 {
        return CollisionResult::miss();
    }

    if x_overlap < y_overlap {
        let normal = if delta.x < 0.0 { -Vec2::X } else { Vec2::X };
        CollisionResult::hit(normal, x_overlap)
    } else {
        let normal = if delta.y < 0.0 { -Vec2::Y } else { Vec2::Y };
        CollisionResult::hit(normal, y_overlap)
    }
}

/// Overlap test between two circles
///
/// Concentric circles report the fixed normal (1, 0) with penetration equal to
/// A's radius.
pub fn circle_vs_circle(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> CollisionResult {
    let delta = pos_b - pos_a;
    let radii = radius_a + radius_b;
    let dist_sq = delta.length_squared();

    if dist_sq > radii * radii {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    if dist == 0.0 {
        return CollisionResult::hit(Vec2::X, radius_a);
    }

    CollisionResult::hit(delta / dist, radii - dist)
}

/// Overlap test between a box (A) and a circle (B)
pub fn box_vs_circle(box_pos: Vec2, half: Vec2, circle_pos: Vec2, radius: f32) -> CollisionResult {
    let offset = circle_pos - box_pos;
    let mut closest = offset.clamp(-half, half);

    // Center inside the box: push the closest point to the nearest face
    let inside = closest == offset;
    if inside {
        let to_face_x = half.x - offset.x.abs();
        let to_face_y = half.y - offset.y.abs();
        if to_face_x < to_face_y {
            closest.x = if offset.x < 0.0 { -half.x } else { half.x };
        } else {
            closest.y = if offset.y < 0.0 { -half.y } else { half.y };
        }
    }

    let to_center = offset - closest;
    let dist_sq = to_center.length_squared();
    if dist_sq > radius * radius && !inside {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    if dist == 0.0 {
        return CollisionResult::hit(Vec2::Y, radius);
    }

    // From inside, `to_center` points into the box
    if inside {
        CollisionResult::hit(-to_center / dist, radius + dist)
    } else {
        CollisionResult::hit(to_center / dist, radius - dist)
    }
}

/// Run the narrow-phase test matching the two bodies' shapes
pub fn collide(a: &RigidBody, b: &RigidBody) -> CollisionResult {
    match (a.shape, b.shape) {
        (Shape::Box { half_extents: ha }, Shape::Box { half_extents: hb }) => {
            box_vs_box(a.pos, ha, b.pos, hb)
        }
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_vs_circle(a.pos, ra, b.pos, rb)
        }
        (Shape::Box { half_extents }, Shape::Circle { radius }) => {
            box_vs_circle(a.pos, half_extents, b.pos, radius)
        }
        (Shape::Circle { radius }, Shape::Box { half_extents }) => {
            box_vs_circle(b.pos, half_extents, a.pos, radius).flipped()
        }
    }
}

/// Narrow phase for the pair at indices `a` and `b`
pub fn detect(bodies: &[RigidBody], a: usize, b: usize) -> Option<Manifold> {
    let result = collide(&bodies[a], &bodies[b]);
    result.hit.then_some(Manifold {
        a,
        b,
        normal: result.normal,
        penetration: result.penetration,
    })
}

/// Candidate pairs whose bounding boxes overlap
///
/// Destroyed bodies and pairs of two locked bodies are skipped. Pairs come out
/// in (i, j) order with i < j.
///
/// Overlap is strict: bodies whose bounds only share an edge are never paired,
/// so exactly touching shapes produce no contact even though the narrow phase
/// would report a zero-depth hit for them.
pub fn broad_phase(bodies: &[RigidBody]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();

    for i in 0..bodies.len() {
        let a = &bodies[i];
        if a.is_destroyed() {
            continue;
        }
        let bounds_a = a.bounds();

        for (j, b) in bodies.iter().enumerate().skip(i + 1) {
            if b.is_destroyed() || (a.is_locked() && b.is_locked()) {
                continue;
            }
            if bounds_a.overlaps(&b.bounds()) {
                pairs.push((i, j));
            }
        }
    }

    pairs
}
