// Narrow-phase body-vs-body separation
//
// Resolution is axis separated: one axis is resolved completely (position,
// velocity and contact flags) before the other is computed from the
// corrected positions. Diagonal corner hits can therefore resolve along the
// "wrong" axis; that is the price of a cheap, predictable resolver.

use glam::Vec2;

use super::body::{component, ArcadeBody};
use super::faces::{Axis, Face};
use crate::core::math::sign_or_zero;

/// Tunables a separation pass needs from the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationParams {
    /// Extra penetration, beyond both bodies' step displacement, still treated as a hit
    pub overlap_bias: f32,
    /// Always resolve X before Y; otherwise the dominant gravity axis goes first
    pub force_x: bool,
    pub gravity: Vec2,
}

impl Default for SeparationParams {
    fn default() -> Self {
        Self {
            overlap_bias: 4.0,
            force_x: true,
            gravity: Vec2::ZERO,
        }
    }
}

/// Outcome of [`separate_bodies`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeparationResult {
    pub x: bool,
    pub y: bool,
}

impl SeparationResult {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Faces meeting on `axis`: (the leading face, the trailing face)
fn axis_faces(axis: Axis) -> (Face, Face) {
    match axis {
        Axis::X => (Face::Right, Face::Left),
        Axis::Y => (Face::Down, Face::Up),
    }
}

fn other_axis(axis: Axis) -> Axis {
    match axis {
        Axis::X => Axis::Y,
        Axis::Y => Axis::X,
    }
}

/// Signed penetration of `a` into `b` along `axis`, setting contact flags.
///
/// The sign follows the relative step displacement: positive when `a` is
/// moving into `b` from the lower coordinate side, negative from the higher
/// side. Returns zero when neither body moved (both are flagged embedded),
/// when the penetration exceeds what this step's motion plus `bias` could
/// have produced, or when either body has that face disabled. With
/// `overlap_only` the depth limit is ignored and nothing is marked blocked.
pub fn compute_overlap<A, B>(axis: Axis, a: &mut A, b: &mut B, overlap_only: bool, bias: f32) -> f32
where
    A: ArcadeBody + ?Sized,
    B: ArcadeBody + ?Sized,
{
    let (leading, trailing) = axis_faces(axis);
    let da = a.delta_on(axis);
    let db = b.delta_on(axis);
    let max_overlap = da.abs() + db.abs() + bias;
    let (a_min, a_max) = a.extent_on(axis);
    let (b_min, b_max) = b.extent_on(axis);

    let mut overlap = 0.0;

    if da == 0.0 && db == 0.0 {
        a.set_embedded(true);
        b.set_embedded(true);
    } else if da > db {
        overlap = a_max - b_min;
        if (overlap > max_overlap && !overlap_only)
            || !a.check_collision().get(leading)
            || !b.check_collision().get(trailing)
        {
            overlap = 0.0;
        } else {
            mark_contact(a, b, leading, overlap_only);
        }
    } else if da < db {
        overlap = a_min - b_max;
        if (-overlap > max_overlap && !overlap_only)
            || !a.check_collision().get(trailing)
            || !b.check_collision().get(leading)
        {
            overlap = 0.0;
        } else {
            mark_contact(a, b, trailing, overlap_only);
        }
    }

    a.set_overlap(axis, overlap);
    b.set_overlap(axis, overlap);
    overlap
}

/// `a` meets `b` with its `face`
fn mark_contact<A, B>(a: &mut A, b: &mut B, face: Face, overlap_only: bool)
where
    A: ArcadeBody + ?Sized,
    B: ArcadeBody + ?Sized,
{
    a.add_touching(face);
    b.add_touching(face.opposite());

    if overlap_only {
        return;
    }
    if b.is_immovable() {
        a.add_blocked(face);
    }
    if a.is_immovable() {
        b.add_blocked(face.opposite());
    }
}

/// Resolve the overlap of `a` and `b` along a single axis.
///
/// Returns true if a correction was applied on this axis, or was handed to a
/// body asking for custom separation. With `overlap_only`, returns true for
/// any contact on the axis, embedded pairs included. Non-intersecting pairs
/// are left untouched.
///
/// Response:
/// - both movable: each takes half the correction and velocities are
///   exchanged by mass, then scaled around their average by each body's bounce;
/// - one immovable: the other takes the full correction and rebounds off the
///   immovable body's velocity, and is carried along the perpendicular axis by
///   the immovable body's motion times its friction;
/// - both immovable, `overlap_only`, or a body asking for custom separation on
///   this axis: nothing moves.
pub fn separate<A, B>(axis: Axis, a: &mut A, b: &mut B, overlap_only: bool, bias: f32) -> bool
where
    A: ArcadeBody + ?Sized,
    B: ArcadeBody + ?Sized,
{
    if !a.rect().intersects(&b.rect()) {
        return false;
    }

    let overlap = compute_overlap(axis, a, b, overlap_only, bias);

    if overlap_only {
        return overlap != 0.0 || (a.is_embedded() && b.is_embedded());
    }
    if overlap == 0.0 || (a.is_immovable() && b.is_immovable()) {
        return false;
    }
    // The overlap is stashed on both bodies for the caller to resolve
    if a.custom_separate(axis) || b.custom_separate(axis) {
        return true;
    }

    let v1 = a.velocity_on(axis);
    let v2 = b.velocity_on(axis);
    let perpendicular = other_axis(axis);

    if !a.is_immovable() && !b.is_immovable() {
        let half = overlap * 0.5;
        a.translate(axis, -half);
        b.translate(axis, half);

        let mut nv1 = (v2 * v2 * b.mass() / a.mass()).sqrt() * sign_or_zero(v2);
        let mut nv2 = (v1 * v1 * a.mass() / b.mass()).sqrt() * sign_or_zero(v1);
        let average = (nv1 + nv2) * 0.5;
        nv1 -= average;
        nv2 -= average;

        a.set_velocity_on(axis, average + nv1 * component(a.bounce(), axis));
        b.set_velocity_on(axis, average + nv2 * component(b.bounce(), axis));
    } else if !a.is_immovable() {
        a.translate(axis, -overlap);
        a.set_velocity_on(axis, v2 - v1 * component(a.bounce(), axis));
        carry_rider(a, b, perpendicular);
    } else {
        b.translate(axis, overlap);
        b.set_velocity_on(axis, v1 - v2 * component(b.bounce(), axis));
        carry_rider(b, a, perpendicular);
    }

    true
}

/// Move `rider` with the perpendicular motion of the immovable `carrier`
fn carry_rider<R, C>(rider: &mut R, carrier: &C, axis: Axis)
where
    R: ArcadeBody + ?Sized,
    C: ArcadeBody + ?Sized,
{
    if !carrier.moves() {
        return;
    }
    let moved = component(carrier.position(), axis) - component(carrier.prev(), axis);
    rider.translate(axis, moved * component(carrier.friction(), axis));
}

/// Horizontal separation, see [`separate`]
pub fn separate_x<A, B>(a: &mut A, b: &mut B, overlap_only: bool, bias: f32) -> bool
where
    A: ArcadeBody + ?Sized,
    B: ArcadeBody + ?Sized,
{
    separate(Axis::X, a, b, overlap_only, bias)
}

/// Vertical separation, see [`separate`]
pub fn separate_y<A, B>(a: &mut A, b: &mut B, overlap_only: bool, bias: f32) -> bool
where
    A: ArcadeBody + ?Sized,
    B: ArcadeBody + ?Sized,
{
    separate(Axis::Y, a, b, overlap_only, bias)
}

/// Order in which the two axes are resolved for a pair led by `a`
pub fn axis_order<A: ArcadeBody + ?Sized>(a: &A, params: &SeparationParams) -> [Axis; 2] {
    let gravity = params.gravity + a.gravity();
    if params.force_x || gravity.y.abs() < gravity.x.abs() {
        [Axis::X, Axis::Y]
    } else {
        [Axis::Y, Axis::X]
    }
}

/// Full two-axis separation of a pair.
///
/// The second axis is only attempted if the boxes still intersect after the
/// first one was resolved. Disabled, invalid or non-intersecting pairs and
/// pairs where either body has every face disabled are skipped.
pub fn separate_bodies<A, B>(
    a: &mut A,
    b: &mut B,
    overlap_only: bool,
    params: &SeparationParams,
) -> SeparationResult
where
    A: ArcadeBody + ?Sized,
    B: ArcadeBody + ?Sized,
{
    let mut result = SeparationResult::default();

    if !a.is_enabled()
        || !b.is_enabled()
        || a.check_collision().is_none()
        || b.check_collision().is_none()
        || !a.rect().is_valid()
        || !b.rect().is_valid()
        || !a.rect().intersects(&b.rect())
    {
        return result;
    }

    let [first, second] = axis_order(a, params);
    let first_hit = separate(first, a, b, overlap_only, params.overlap_bias);
    let second_hit = a.rect().intersects(&b.rect())
        && separate(second, a, b, overlap_only, params.overlap_bias);

    match first {
        Axis::X => {
            result.x = first_hit;
            result.y = second_hit;
        }
        Axis::Y => {
            result.y = first_hit;
            result.x = second_hit;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::Body;
    use crate::engine::physics::static_body::StaticBody;
    use approx::assert_relative_eq;

    const BIAS: f32 = 4.0;

    /// Integrate a body over `dt` the way the world does before collisions
    fn advance(body: &mut Body, dt: f32) {
        body.pre_update();
        body.update(dt, Vec2::ZERO);
        body.commit_delta();
    }

    fn still(body: &mut Body) {
        advance(body, 0.0);
    }

    #[test]
    fn test_immovable_scenario() {
        let mut a = Body::new(0.0, 0.0, 10.0, 10.0);
        a.set_velocity(100.0, 0.0);
        let mut b = Body::new(15.0, 0.0, 10.0, 10.0);
        b.set_immovable(true);

        advance(&mut a, 0.1);
        still(&mut b);
        assert_relative_eq!(a.x(), 10.0);

        assert!(separate_x(&mut a, &mut b, false, BIAS));
        assert_relative_eq!(a.x(), 5.0);
        assert!(a.blocked().right);
        assert!(a.touching().right);
        assert!(b.touching().left);
        assert_eq!(b.x(), 15.0);
        assert_eq!(a.velocity.x, 0.0);
    }

    #[test]
    fn test_immovable_absorption_from_either_side() {
        for (ax, vx) in [(0.0, 100.0), (30.0, -100.0)] {
            let mut a = Body::new(ax, 0.0, 10.0, 10.0);
            a.set_velocity(vx, 0.0);
            let mut wall = Body::new(15.0, 0.0, 10.0, 10.0);
            wall.set_immovable(true);

            advance(&mut a, 0.1);
            still(&mut wall);

            assert!(separate_x(&mut wall, &mut a, false, BIAS));
            assert_eq!(wall.position(), Vec2::new(15.0, 0.0));
            assert!(!a.rect().intersects(&wall.rect()));
        }
    }

    #[test]
    fn test_static_body_blocks() {
        let mut a = Body::new(0.0, 0.0, 10.0, 10.0);
        a.set_velocity(0.0, 100.0);
        let mut floor = StaticBody::new(-50.0, 15.0, 200.0, 10.0);

        advance(&mut a, 0.1);
        assert!(separate_y(&mut a, &mut floor, false, BIAS));
        assert_relative_eq!(a.bottom(), 15.0);
        assert!(a.blocked().down);
        assert!(a.on_floor());
        assert!(floor.touching().up);
    }

    #[test]
    fn test_bounce_law_against_immovable() {
        let mut elastic = Body::new(0.0, 0.0, 10.0, 10.0);
        elastic.set_velocity(100.0, 0.0).set_bounce(1.0, 1.0);
        let mut wall = StaticBody::new(15.0, -100.0, 10.0, 300.0);

        advance(&mut elastic, 0.1);
        assert!(separate_x(&mut elastic, &mut wall, false, BIAS));
        assert_relative_eq!(elastic.velocity.x, -100.0);

        let mut dead = Body::new(0.0, 0.0, 10.0, 10.0);
        dead.set_velocity(100.0, 0.0);
        advance(&mut dead, 0.1);
        assert!(separate_x(&mut dead, &mut wall, false, BIAS));
        assert_eq!(dead.velocity.x, 0.0);
    }

    #[test]
    fn test_movable_pair_splits_overlap() {
        let mut a = Body::new(0.0, 0.0, 10.0, 10.0);
        a.set_velocity(100.0, 0.0);
        let mut b = Body::new(15.0, 0.0, 10.0, 10.0);

        advance(&mut a, 0.1);
        still(&mut b);
        assert!(separate_x(&mut a, &mut b, false, BIAS));

        assert_relative_eq!(a.x(), 7.5);
        assert_relative_eq!(b.x(), 17.5);
        assert_relative_eq!(a.right(), b.x());
        // Equal masses with no bounce share the momentum
        assert_relative_eq!(a.velocity.x, 50.0);
        assert_relative_eq!(b.velocity.x, 50.0);
        assert!(!a.blocked().right);
        assert!(a.touching().right);
    }

    #[test]
    fn test_elastic_equal_masses_swap_velocities() {
        let mut a = Body::new(0.0, 0.0, 10.0, 10.0);
        a.set_velocity(100.0, 0.0).set_bounce(1.0, 1.0);
        let mut b = Body::new(15.0, 0.0, 10.0, 10.0);
        b.set_bounce(1.0, 1.0);

        advance(&mut a, 0.1);
        still(&mut b);
        separate_x(&mut a, &mut b, false, BIAS);

        assert_relative_eq!(a.velocity.x, 0.0);
        assert_relative_eq!(b.velocity.x, 100.0);
    }

    #[test]
    fn test_symmetry_of_argument_order() {
        let build = || {
            let mut a = Body::new(0.0, 0.0, 10.0, 10.0);
            a.set_velocity(100.0, 0.0);
            let mut b = Body::new(15.0, 0.0, 10.0, 10.0);
            advance(&mut a, 0.1);
            still(&mut b);
            (a, b)
        };

        let (mut a1, mut b1) = build();
        separate_x(&mut a1, &mut b1, false, BIAS);
        let (mut a2, mut b2) = build();
        separate_x(&mut b2, &mut a2, false, BIAS);

        assert_relative_eq!(a1.x(), a2.x());
        assert_relative_eq!(b1.x(), b2.x());
        assert_relative_eq!(a1.right(), b1.x());
    }

    #[test]
    fn test_separated_pair_is_idempotent() {
        let mut a = Body::new(0.0, 0.0, 10.0, 10.0);
        a.set_velocity(100.0, 0.0);
        let mut b = Body::new(15.0, 0.0, 10.0, 10.0);
        b.set_immovable(true);
        advance(&mut a, 0.1);
        still(&mut b);
        assert!(separate_x(&mut a, &mut b, false, BIAS));

        let (position, velocity) = (a.position(), a.velocity);
        assert!(!separate_x(&mut a, &mut b, false, BIAS));
        assert_eq!(a.position(), position);
        assert_eq!(a.velocity, velocity);
        assert_eq!(b.position(), Vec2::new(15.0, 0.0));
    }

    #[test]
    fn test_overlap_only_moves_nothing() {
        let mut a = Body::new(0.0, 0.0, 10.0, 10.0);
        a.set_velocity(100.0, 0.0);
        let mut b = Body::new(15.0, 0.0, 10.0, 10.0);
        advance(&mut a, 0.1);
        still(&mut b);

        assert!(separate_x(&mut a, &mut b, true, BIAS));
        assert_relative_eq!(a.x(), 10.0);
        assert_eq!(b.x(), 15.0);
        assert_eq!(a.velocity.x, 100.0);
        assert!(a.blocked().is_none());
        assert_relative_eq!(a.overlap_x(), 5.0);
    }

    #[test]
    fn test_penetration_beyond_step_motion_is_ignored() {
        // Moved 1px but overlaps by 9px: the body was already inside, not hitting this face
        let mut a = Body::new(5.0, 0.0, 10.0, 10.0);
        a.set_velocity(10.0, 0.0);
        let mut b = Body::new(7.0, 0.0, 10.0, 10.0);
        b.set_immovable(true);
        advance(&mut a, 0.1);
        still(&mut b);

        assert!(!separate_x(&mut a, &mut b, false, BIAS));
        assert_relative_eq!(a.x(), 6.0);
    }

    #[test]
    fn test_disabled_face_prevents_contact() {
        let mut a = Body::new(0.0, 0.0, 10.0, 10.0);
        a.set_velocity(100.0, 0.0);
        let mut b = Body::new(15.0, 0.0, 10.0, 10.0);
        b.set_immovable(true);
        b.check_collision.left = false;
        advance(&mut a, 0.1);
        still(&mut b);

        assert!(!separate_x(&mut a, &mut b, false, BIAS));
        assert_relative_eq!(a.x(), 10.0);
        assert!(a.touching().is_none());
    }

    #[test]
    fn test_custom_separation_stashes_overlap() {
        let mut a = Body::new(0.0, 0.0, 10.0, 10.0);
        a.set_velocity(100.0, 0.0).set_custom_separate(true, false);
        let mut b = Body::new(15.0, 0.0, 10.0, 10.0);
        b.set_immovable(true);
        advance(&mut a, 0.1);
        still(&mut b);

        assert!(separate_x(&mut a, &mut b, false, BIAS));
        assert_relative_eq!(a.x(), 10.0);
        assert_relative_eq!(a.overlap_x(), 5.0);
    }

    #[test]
    fn test_resting_pair_is_embedded() {
        let mut a = Body::new(0.0, 0.0, 10.0, 10.0);
        let mut b = Body::new(5.0, 0.0, 10.0, 10.0);
        still(&mut a);
        still(&mut b);

        assert!(!separate_x(&mut a, &mut b, false, BIAS));
        assert!(a.is_embedded() && b.is_embedded());
        assert_eq!(a.x(), 0.0);
        assert_eq!(b.x(), 5.0);

        // Still reported as a contact when only overlaps are checked
        assert!(separate_x(&mut a, &mut b, true, BIAS));
    }

    #[test]
    fn test_two_immovable_bodies_do_not_separate() {
        let mut a = Body::new(0.0, 0.0, 10.0, 10.0);
        a.set_immovable(true).set_velocity(100.0, 0.0);
        let mut b = Body::new(15.0, 0.0, 10.0, 10.0);
        b.set_immovable(true);
        advance(&mut a, 0.1);
        still(&mut b);

        assert!(!separate_x(&mut a, &mut b, false, BIAS));
        assert_relative_eq!(a.x(), 10.0);
        assert_eq!(b.x(), 15.0);
    }

    #[test]
    fn test_rider_is_carried_by_moving_platform() {
        let mut platform = Body::new(0.0, 20.0, 100.0, 10.0);
        platform.set_immovable(true).set_velocity(30.0, 0.0);
        let mut rider = Body::new(10.0, 10.0, 10.0, 10.0);
        rider.set_velocity(0.0, 50.0);

        advance(&mut platform, 0.1);
        advance(&mut rider, 0.1);
        assert!(separate_y(&mut rider, &mut platform, false, BIAS));

        assert_relative_eq!(rider.bottom(), 20.0);
        assert_relative_eq!(rider.x(), 13.0);
    }

    #[test]
    fn test_axis_order_follows_gravity_when_not_forced() {
        let body = Body::new(0.0, 0.0, 10.0, 10.0);
        let mut params = SeparationParams {
            gravity: Vec2::new(0.0, 300.0),
            ..SeparationParams::default()
        };
        assert_eq!(axis_order(&body, &params), [Axis::X, Axis::Y]);

        params.force_x = false;
        assert_eq!(axis_order(&body, &params), [Axis::Y, Axis::X]);

        params.gravity = Vec2::new(300.0, 0.0);
        assert_eq!(axis_order(&body, &params), [Axis::X, Axis::Y]);
    }

    #[test]
    fn test_separate_bodies_resolves_both_axes() {
        // Falling diagonally onto a corner of an immovable block
        let mut a = Body::new(0.0, 0.0, 10.0, 10.0);
        a.set_velocity(20.0, 100.0);
        let mut block = StaticBody::new(0.0, 15.0, 50.0, 50.0);

        advance(&mut a, 0.1);
        let result = separate_bodies(&mut a, &mut block, false, &SeparationParams::default());

        assert!(result.y);
        assert!(!result.x);
        assert!(result.any());
        assert_relative_eq!(a.bottom(), 15.0);
        assert!(!a.rect().intersects(&block.rect()));
    }

    #[test]
    fn test_separate_bodies_skips_invalid() {
        let mut a = Body::new(0.0, 0.0, 10.0, 10.0);
        a.set_velocity(100.0, 0.0).set_size(0.0, 10.0);
        let mut b = Body::new(5.0, 0.0, 10.0, 10.0);
        advance(&mut a, 0.1);
        still(&mut b);

        let result = separate_bodies(&mut a, &mut b, false, &SeparationParams::default());
        assert!(!result.any());
    }
}
