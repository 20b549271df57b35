//! Impulse-based collision response
//!
//! Both passes work on a single manifold. Locked bodies are skipped explicitly,
//! independent of their inverse mass. Pairs whose inverse masses sum to zero
//! are left alone.

use glam::Vec2;

use super::body::RigidBody;
use super::collision::Manifold;

/// Mutable access to two distinct bodies of a slice
///
/// Panics if `i == j` or either index is out of range.
pub fn pair_mut(bodies: &mut [RigidBody], i: usize, j: usize) -> (&mut RigidBody, &mut RigidBody) {
    assert_ne!(i, j, "a body cannot collide with itself");
    if i < j {
        let (head, tail) = bodies.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = bodies.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

#[inline]
fn is_valid_normal(normal: Vec2) -> bool {
    !normal.x.is_nan() && !normal.y.is_nan()
}

/// Apply equal and opposite impulses along `normal` (A toward B)
///
/// Returns false when nothing was applied: invalid normal, two immovable
/// bodies, or bodies already separating.
pub fn apply_impulse(a: &mut RigidBody, b: &mut RigidBody, normal: Vec2) -> bool {
    if !is_valid_normal(normal) {
        log::warn!("Skipping impulse for {:?}/{:?}: NaN normal", a.id, b.id);
        return false;
    }

    let inv_mass_sum = a.inv_mass + b.inv_mass;
    if inv_mass_sum == 0.0 {
        return false;
    }

    let vel_along_normal = (b.vel - a.vel).dot(normal);
    if vel_along_normal >= 0.0 {
        return false;
    }

    let e = a.restitution.min(b.restitution);
    let j = -(1.0 + e) * vel_along_normal / inv_mass_sum;
    let impulse = normal * j;

    if !a.is_locked() {
        a.vel -= impulse * a.inv_mass;
    }
    if !b.is_locked() {
        b.vel += impulse * b.inv_mass;
    }

    log::trace!(
        "Impulse {:?} between {:?} and {:?} (e = {})",
        impulse,
        a.id,
        b.id,
        e
    );
    true
}

/// Push the bodies apart by `percent` of the penetration, split by inverse mass
pub fn correct_positions(
    a: &mut RigidBody,
    b: &mut RigidBody,
    normal: Vec2,
    penetration: f32,
    percent: f32,
) {
    if !is_valid_normal(normal) {
        return;
    }

    let inv_mass_sum = a.inv_mass + b.inv_mass;
    if inv_mass_sum == 0.0 {
        return;
    }

    let correction = normal * (percent * penetration / inv_mass_sum);
    if !a.is_locked() {
        a.pos -= correction * a.inv_mass;
    }
    if !b.is_locked() {
        b.pos += correction * b.inv_mass;
    }
}

/// Impulse then positional correction for one manifold
pub fn resolve(bodies: &mut [RigidBody], manifold: &Manifold, percent: f32) {
    let (a, b) = pair_mut(bodies, manifold.a, manifold.b);
    apply_impulse(a, b, manifold.normal);
    correct_positions(a, b, manifold.normal, manifold.penetration, percent);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::Shape;
    use proptest::prelude::*;

    fn ball(pos: Vec2, vel: Vec2, mass: f32, restitution: f32) -> RigidBody {
        RigidBody::new(Shape::circle(5.0), pos, vel, mass, restitution, false)
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut bodies = vec![
            ball(Vec2::ZERO, Vec2::ZERO, 1.0, 0.5),
            ball(Vec2::X, Vec2::ZERO, 2.0, 0.5),
        ];
        let (a, b) = pair_mut(&mut bodies, 1, 0);
        assert_eq!(a.mass, 2.0);
        assert_eq!(b.mass, 1.0);
    }

    #[test]
    fn test_head_on_equal_masses() {
        let mut a = ball(Vec2::ZERO, Vec2::new(2.0, 0.0), 1.0, 1.0);
        let mut b = ball(Vec2::new(9.0, 0.0), Vec2::new(-2.0, 0.0), 1.0, 1.0);

        assert!(apply_impulse(&mut a, &mut b, Vec2::X));
        // Perfectly elastic, equal masses: velocities swap
        assert!((a.vel.x + 2.0).abs() < 1e-5);
        assert!((b.vel.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_restitution_uses_minimum() {
        let mut a = ball(Vec2::ZERO, Vec2::new(2.0, 0.0), 1.0, 0.0);
        let mut b = ball(Vec2::new(9.0, 0.0), Vec2::new(-2.0, 0.0), 1.0, 1.0);

        apply_impulse(&mut a, &mut b, Vec2::X);
        // e = 0: both end at the common velocity
        assert!(a.vel.x.abs() < 1e-5);
        assert!(b.vel.x.abs() < 1e-5);
    }

    #[test]
    fn test_bounce_off_locked_floor() {
        let mut ball = ball(Vec2::ZERO, Vec2::new(0.0, 4.0), 10.0, 0.5);
        let mut floor = RigidBody::wall(-50.0, 4.0, 100.0, 20.0);

        assert!(apply_impulse(&mut ball, &mut floor, Vec2::Y));
        assert!((ball.vel.y + 2.0).abs() < 1e-5);
        assert_eq!(floor.vel, Vec2::ZERO);
    }

    #[test]
    fn test_locked_body_ignores_nonzero_inverse_mass() {
        let mut a = ball(Vec2::ZERO, Vec2::new(1.0, 0.0), 1.0, 0.5);
        let mut b = ball(Vec2::new(9.0, 0.0), Vec2::new(-1.0, 0.0), 1.0, 0.5);
        b.set_locked(true);
        b.inv_mass = 1.0;

        apply_impulse(&mut a, &mut b, Vec2::X);
        correct_positions(&mut a, &mut b, Vec2::X, 1.0, 0.6);
        assert_eq!(b.vel, Vec2::new(-1.0, 0.0));
        assert_eq!(b.pos, Vec2::new(9.0, 0.0));
        assert!(a.vel.x < 1.0);
    }

    #[test]
    fn test_two_immovable_bodies_skip_resolution() {
        let mut a = ball(Vec2::ZERO, Vec2::new(1.0, 0.0), 0.0, 0.5);
        let mut b = ball(Vec2::new(9.0, 0.0), Vec2::ZERO, 0.0, 0.5);

        assert!(!apply_impulse(&mut a, &mut b, Vec2::X));
        correct_positions(&mut a, &mut b, Vec2::X, 1.0, 0.6);
        assert_eq!(a.pos, Vec2::ZERO);
        assert_eq!(a.vel, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_nan_normal_is_a_no_op() {
        let mut a = ball(Vec2::ZERO, Vec2::new(1.0, 0.0), 1.0, 0.5);
        let mut b = ball(Vec2::new(9.0, 0.0), Vec2::new(-1.0, 0.0), 1.0, 0.5);
        let normal = Vec2::new(f32::NAN, 0.0);

        assert!(!apply_impulse(&mut a, &mut b, normal));
        correct_positions(&mut a, &mut b, normal, 1.0, 0.6);
        assert_eq!(a.vel, Vec2::new(1.0, 0.0));
        assert_eq!(b.pos, Vec2::new(9.0, 0.0));
    }

    #[test]
    fn test_positional_correction_split_by_inverse_mass() {
        let mut a = ball(Vec2::ZERO, Vec2::ZERO, 1.0, 0.5);
        let mut b = ball(Vec2::new(8.0, 0.0), Vec2::ZERO, 3.0, 0.5);

        correct_positions(&mut a, &mut b, Vec2::X, 2.0, 0.6);
        // Total correction 0.6 * 2 = 1.2, shared 3:1 toward the lighter body
        assert!((a.pos.x + 0.9).abs() < 1e-5);
        assert!((b.pos.x - 8.3).abs() < 1e-5);
    }

    #[test]
    fn test_resolve_against_locked_moves_only_free_body() {
        let mut bodies = vec![
            RigidBody::wall(0.0, 10.0, 100.0, 20.0),
            ball(Vec2::new(50.0, 6.0), Vec2::new(0.0, 3.0), 5.0, 0.0),
        ];
        let manifold = Manifold {
            a: 0,
            b: 1,
            normal: -Vec2::Y,
            penetration: 1.0,
        };
        resolve(&mut bodies, &manifold, 0.6);

        assert_eq!(bodies[0].pos, Vec2::new(50.0, 20.0));
        assert!(bodies[1].vel.y.abs() < 1e-5);
        assert!((bodies[1].pos.y - 5.4).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_separating_contacts_untouched(
            vax in -10.0f32..10.0,
            vay in -10.0f32..10.0,
            vbx in -10.0f32..10.0,
            vby in -10.0f32..10.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let normal = Vec2::from_angle(angle);
            let vel_a = Vec2::new(vax, vay);
            let vel_b = Vec2::new(vbx, vby);
            prop_assume!((vel_b - vel_a).dot(normal) >= 0.0);

            let mut a = ball(Vec2::ZERO, vel_a, 2.0, 0.5);
            let mut b = ball(normal * 9.0, vel_b, 3.0, 0.5);
            prop_assert!(!apply_impulse(&mut a, &mut b, normal));
            prop_assert_eq!(a.vel, vel_a);
            prop_assert_eq!(b.vel, vel_b);
        }

        #[test]
        fn prop_locked_body_is_invariant(
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
            mass in 0.0f32..100.0,
            penetration in 0.0f32..10.0,
            angle in 0.0f32..std::f32::consts::TAU,
            locked_first in any::<bool>(),
        ) {
            let normal = Vec2::from_angle(angle);
            let mut free = ball(Vec2::ZERO, Vec2::new(vx, vy), 1.0, 0.5);
            let mut locked = ball(Vec2::new(3.0, 4.0), Vec2::new(vy, vx), mass, 0.5);
            locked.set_locked(true);
            locked.inv_mass = if mass > 0.0 { 1.0 / mass } else { 0.0 };

            if locked_first {
                apply_impulse(&mut locked, &mut free, normal);
                correct_positions(&mut locked, &mut free, normal, penetration, 0.6);
            } else {
                apply_impulse(&mut free, &mut locked, normal);
                correct_positions(&mut free, &mut locked, normal, penetration, 0.6);
            }
            prop_assert_eq!(locked.pos, Vec2::new(3.0, 4.0));
            prop_assert_eq!(locked.vel, Vec2::new(vy, vx));
        }
    }
}
