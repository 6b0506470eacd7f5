use glam::Vec2;

use super::faces::{Axis, Face, Faces};
use crate::core::math::{approach_zero, approx_equal, clamp_abs};
use crate::core::Rect;

/// Velocities below this magnitude snap to rest when damping is used
const DAMPING_REST_SPEED: f32 = 0.001;

/// Direction a body most recently moved in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

/// Geometric and kinematic contract shared by dynamic and static bodies.
///
/// Separation routines are written against this trait so a dynamic body can
/// be resolved against either kind of partner.
pub trait ArcadeBody {
    fn rect(&self) -> Rect;
    fn position(&self) -> Vec2;
    /// Position at the start of the current step
    fn prev(&self) -> Vec2;
    /// Displacement produced by this step's integration
    fn delta(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn bounce(&self) -> Vec2;
    fn friction(&self) -> Vec2;
    fn gravity(&self) -> Vec2;
    fn mass(&self) -> f32;
    fn is_enabled(&self) -> bool;
    fn is_immovable(&self) -> bool;
    fn is_static(&self) -> bool;
    fn moves(&self) -> bool;
    fn check_collision(&self) -> Faces;
    fn custom_separate(&self, axis: Axis) -> bool;
    fn is_embedded(&self) -> bool;

    fn translate(&mut self, axis: Axis, amount: f32);
    fn set_velocity_on(&mut self, axis: Axis, value: f32);
    fn set_overlap(&mut self, axis: Axis, overlap: f32);
    fn set_embedded(&mut self, embedded: bool);
    fn add_touching(&mut self, face: Face);
    fn add_blocked(&mut self, face: Face);

    fn delta_on(&self, axis: Axis) -> f32 {
        component(self.delta(), axis)
    }

    fn velocity_on(&self, axis: Axis) -> f32 {
        component(self.velocity(), axis)
    }

    /// Leading and trailing edges of the box along `axis`
    fn extent_on(&self, axis: Axis) -> (f32, f32) {
        let rect = self.rect();
        match axis {
            Axis::X => (rect.x, rect.right()),
            Axis::Y => (rect.y, rect.bottom()),
        }
    }
}

pub(crate) fn component(v: Vec2, axis: Axis) -> f32 {
    match axis {
        Axis::X => v.x,
        Axis::Y => v.y,
    }
}

pub(crate) fn component_mut(v: &mut Vec2, axis: Axis) -> &mut f32 {
    match axis {
        Axis::X => &mut v.x,
        Axis::Y => &mut v.y,
    }
}

/// A dynamic arcade body: an axis-aligned box with velocity, acceleration,
/// drag and bounce, owned by exactly one game object.
///
/// The body tracks its owner's position (`owner`) and places its box at
/// `owner + offset`. Each step the world integrates the body, resolves its
/// collisions, then writes the corrected position back to the owner.
#[derive(Debug, Clone)]
pub struct Body {
    enable: bool,

    /// Position of the owning game object
    owner: Vec2,
    /// Box offset from the owner's position
    offset: Vec2,

    position: Vec2,
    prev: Vec2,
    delta: Vec2,
    width: f32,
    height: f32,

    pub velocity: Vec2,
    pub acceleration: Vec2,
    /// Linear drag in units/s², or the per-second retained fraction when `use_damping` is set
    pub drag: Vec2,
    pub max_velocity: Vec2,
    /// Restitution per axis: 0 absorbs, 1 is perfectly elastic
    pub bounce: Vec2,
    /// Overrides `bounce` against the world bounds when set
    pub world_bounce: Option<Vec2>,
    /// Per-body gravity, added to the world's
    pub gravity: Vec2,
    /// Fraction of a moving immovable body's motion passed to a body riding it
    pub friction: Vec2,
    /// Maximum displacement written back per step, zero meaning unlimited
    pub delta_max: Vec2,
    pub mass: f32,

    pub allow_gravity: bool,
    pub allow_drag: bool,
    pub use_damping: bool,
    pub moves: bool,
    pub immovable: bool,
    pub collide_world_bounds: bool,
    /// Emit a world-bounds event whenever this body hits the bounds
    pub on_world_bounds: bool,
    pub custom_separate_x: bool,
    pub custom_separate_y: bool,

    /// Which faces of this body react to collisions
    pub check_collision: Faces,

    touching: Faces,
    was_touching: Faces,
    blocked: Faces,
    embedded: bool,
    overlap_x: f32,
    overlap_y: f32,

    facing: Facing,
    speed: f32,
}

impl Body {
    /// Create a body for an owner at (`x`, `y`) with a `width` × `height` box
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let owner = Vec2::new(x, y);
        Self {
            enable: true,
            owner,
            offset: Vec2::ZERO,
            position: owner,
            prev: owner,
            delta: Vec2::ZERO,
            width: width.max(0.0),
            height: height.max(0.0),
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            drag: Vec2::ZERO,
            max_velocity: Vec2::splat(10_000.0),
            bounce: Vec2::ZERO,
            world_bounce: None,
            gravity: Vec2::ZERO,
            friction: Vec2::new(1.0, 0.0),
            delta_max: Vec2::ZERO,
            mass: 1.0,
            allow_gravity: true,
            allow_drag: true,
            use_damping: false,
            moves: true,
            immovable: false,
            collide_world_bounds: false,
            on_world_bounds: false,
            custom_separate_x: false,
            custom_separate_y: false,
            check_collision: Faces::ALL,
            touching: Faces::NONE,
            was_touching: Faces::NONE,
            blocked: Faces::NONE,
            embedded: false,
            overlap_x: 0.0,
            overlap_y: 0.0,
            facing: Facing::None,
            speed: 0.0,
        }
    }

    // ---- setters -----------------------------------------------------------

    pub fn set_velocity(&mut self, x: f32, y: f32) -> &mut Self {
        self.velocity = Vec2::new(x, y);
        self.speed = self.velocity.length();
        self
    }

    pub fn set_velocity_x(&mut self, x: f32) -> &mut Self {
        self.set_velocity(x, self.velocity.y)
    }

    pub fn set_velocity_y(&mut self, y: f32) -> &mut Self {
        self.set_velocity(self.velocity.x, y)
    }

    pub fn set_acceleration(&mut self, x: f32, y: f32) -> &mut Self {
        self.acceleration = Vec2::new(x, y);
        self
    }

    pub fn set_drag(&mut self, x: f32, y: f32) -> &mut Self {
        self.drag = Vec2::new(x, y);
        self
    }

    /// Switch drag to multiplicative damping
    pub fn set_damping(&mut self, use_damping: bool) -> &mut Self {
        self.use_damping = use_damping;
        self
    }

    pub fn set_bounce(&mut self, x: f32, y: f32) -> &mut Self {
        self.bounce = Vec2::new(x, y);
        self
    }

    pub fn set_max_velocity(&mut self, x: f32, y: f32) -> &mut Self {
        self.max_velocity = Vec2::new(x.abs(), y.abs());
        self
    }

    pub fn set_immovable(&mut self, immovable: bool) -> &mut Self {
        self.immovable = immovable;
        self
    }

    pub fn set_collide_world_bounds(&mut self, collide: bool) -> &mut Self {
        self.collide_world_bounds = collide;
        self
    }

    pub fn set_world_bounce(&mut self, bounce: Option<Vec2>) -> &mut Self {
        self.world_bounce = bounce;
        self
    }

    pub fn set_gravity(&mut self, x: f32, y: f32) -> &mut Self {
        self.gravity = Vec2::new(x, y);
        self
    }

    pub fn set_allow_gravity(&mut self, allow: bool) -> &mut Self {
        self.allow_gravity = allow;
        self
    }

    pub fn set_friction(&mut self, x: f32, y: f32) -> &mut Self {
        self.friction = Vec2::new(x, y);
        self
    }

    /// Mass only matters when two movable bodies exchange velocity
    pub fn set_mass(&mut self, mass: f32) -> &mut Self {
        self.mass = if mass.is_finite() && mass > 0.0 {
            mass
        } else {
            f32::EPSILON
        };
        self
    }

    pub fn set_moves(&mut self, moves: bool) -> &mut Self {
        self.moves = moves;
        self
    }

    pub fn set_enable(&mut self, enable: bool) -> &mut Self {
        self.enable = enable;
        self
    }

    pub fn set_check_collision(&mut self, faces: Faces) -> &mut Self {
        self.check_collision = faces;
        self
    }

    /// Hand separation on either axis to the caller via `overlap_x`/`overlap_y`
    pub fn set_custom_separate(&mut self, x: bool, y: bool) -> &mut Self {
        self.custom_separate_x = x;
        self.custom_separate_y = y;
        self
    }

    pub fn set_on_world_bounds(&mut self, emit: bool) -> &mut Self {
        self.on_world_bounds = emit;
        self
    }

    pub fn set_delta_max(&mut self, x: f32, y: f32) -> &mut Self {
        self.delta_max = Vec2::new(x.abs(), y.abs());
        self
    }

    /// Resize the box keeping its top-left corner. Negative sizes clamp to zero.
    pub fn set_size(&mut self, width: f32, height: f32) -> &mut Self {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self
    }

    /// Resize the box around its current centre
    pub fn set_size_centered(&mut self, width: f32, height: f32) -> &mut Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let shift = Vec2::new(self.width - width, self.height - height) * 0.5;
        self.offset += shift;
        self.position += shift;
        self.width = width;
        self.height = height;
        self
    }

    pub fn set_offset(&mut self, x: f32, y: f32) -> &mut Self {
        self.offset = Vec2::new(x, y);
        self.position = self.owner + self.offset;
        self
    }

    /// Teleport the owner to (`x`, `y`) and clear all motion
    pub fn reset(&mut self, x: f32, y: f32) -> &mut Self {
        self.stop();
        self.owner = Vec2::new(x, y);
        self.position = self.owner + self.offset;
        self.prev = self.position;
        self.delta = Vec2::ZERO;
        self.touching.clear();
        self.blocked.clear();
        self
    }

    /// Zero velocity, acceleration and speed
    pub fn stop(&mut self) -> &mut Self {
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self.speed = 0.0;
        self
    }

    // ---- read accessors ----------------------------------------------------

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        self.position + Vec2::new(self.width, self.height) * 0.5
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Position of the owning game object
    pub fn owner_position(&self) -> Vec2 {
        self.owner
    }

    pub fn touching(&self) -> Faces {
        self.touching
    }

    /// `touching` as it stood at the end of the previous step
    pub fn was_touching(&self) -> Faces {
        self.was_touching
    }

    pub fn blocked(&self) -> Faces {
        self.blocked
    }

    pub fn overlap_x(&self) -> f32 {
        self.overlap_x
    }

    pub fn overlap_y(&self) -> f32 {
        self.overlap_y
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn delta_x(&self) -> f32 {
        self.delta.x
    }

    pub fn delta_y(&self) -> f32 {
        self.delta.y
    }

    pub fn delta_abs_x(&self) -> f32 {
        self.delta.x.abs()
    }

    pub fn delta_abs_y(&self) -> f32 {
        self.delta.y.abs()
    }

    pub fn on_floor(&self) -> bool {
        self.blocked.down
    }

    pub fn on_ceiling(&self) -> bool {
        self.blocked.up
    }

    pub fn on_wall(&self) -> bool {
        self.blocked.left || self.blocked.right
    }

    /// Started touching something below this step
    pub fn just_landed(&self) -> bool {
        self.touching.down && !self.was_touching.down
    }

    /// Usable in the broad-phase: enabled, positive size, finite state
    pub fn is_valid(&self) -> bool {
        self.enable
            && self.rect().is_valid()
            && self.velocity.is_finite()
            && self.acceleration.is_finite()
    }

    // ---- step pipeline -----------------------------------------------------

    /// Start a step: roll contact flags over and place the box on the owner
    pub(crate) fn pre_update(&mut self) {
        self.was_touching = self.touching;
        self.touching.clear();
        self.blocked.clear();
        self.embedded = false;
        self.overlap_x = 0.0;
        self.overlap_y = 0.0;

        self.position = self.owner + self.offset;
        self.prev = self.position;
    }

    /// Integrate velocity and position over `dt` seconds
    pub(crate) fn update(&mut self, dt: f32, world_gravity: Vec2) {
        if !self.moves {
            return;
        }
        self.compute_velocity(dt, world_gravity);
        self.position += self.velocity * dt;
    }

    fn compute_velocity(&mut self, dt: f32, world_gravity: Vec2) {
        let mut velocity = self.velocity;

        if self.allow_gravity {
            velocity += (world_gravity + self.gravity) * dt;
        }

        for axis in [Axis::X, Axis::Y] {
            let v = component_mut(&mut velocity, axis);
            let acceleration = component(self.acceleration, axis);
            let drag = component(self.drag, axis);

            if acceleration != 0.0 {
                *v += acceleration * dt;
            } else if self.allow_drag && drag != 0.0 {
                if self.use_damping {
                    *v *= drag.powf(dt);
                } else {
                    *v = approach_zero(*v, drag * dt);
                }
            }

            *v = clamp_abs(*v, component(self.max_velocity, axis));
        }

        if self.use_damping && approx_equal(velocity.length(), 0.0, DAMPING_REST_SPEED) {
            velocity = Vec2::ZERO;
        }

        self.velocity = velocity;
        self.speed = velocity.length();
    }

    /// Push the box back inside `bounds` on every face both `check` and the body allow.
    ///
    /// Returns the faces that were hit; bounce is applied as if the bounds were
    /// an immovable wall.
    pub(crate) fn check_world_bounds(&mut self, bounds: &Rect, check: Faces) -> Faces {
        let check = check.intersection(self.check_collision);
        let bounce = -self.world_bounce.unwrap_or(self.bounce);
        let mut hit = Faces::NONE;

        if self.position.x < bounds.x && check.left {
            self.position.x = bounds.x;
            self.velocity.x *= bounce.x;
            hit.insert(Face::Left);
        } else if self.right() > bounds.right() && check.right {
            self.position.x = bounds.right() - self.width;
            self.velocity.x *= bounce.x;
            hit.insert(Face::Right);
        }

        if self.position.y < bounds.y && check.up {
            self.position.y = bounds.y;
            self.velocity.y *= bounce.y;
            hit.insert(Face::Up);
        } else if self.bottom() > bounds.bottom() && check.down {
            self.position.y = bounds.bottom() - self.height;
            self.velocity.y *= bounce.y;
            hit.insert(Face::Down);
        }

        self.blocked = self.blocked.union(hit);
        hit
    }

    /// Freeze this step's displacement; collision resolution reads it
    pub(crate) fn commit_delta(&mut self) {
        self.delta = self.position - self.prev;
    }

    /// Finish a step: clamp the displacement and write it back to the owner
    pub(crate) fn post_update(&mut self) {
        let mut moved = self.position - self.prev;

        if self.moves {
            if self.delta_max.x != 0.0 {
                moved.x = clamp_abs(moved.x, self.delta_max.x);
            }
            if self.delta_max.y != 0.0 {
                moved.y = clamp_abs(moved.y, self.delta_max.y);
            }
            self.position = self.prev + moved;
        }

        if moved.x < 0.0 {
            self.facing = Facing::Left;
        } else if moved.x > 0.0 {
            self.facing = Facing::Right;
        }
        if moved.y < 0.0 {
            self.facing = Facing::Up;
        } else if moved.y > 0.0 {
            self.facing = Facing::Down;
        }

        self.owner = self.position - self.offset;
    }
}

impl ArcadeBody for Body {
    fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn prev(&self) -> Vec2 {
        self.prev
    }

    fn delta(&self) -> Vec2 {
        self.delta
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn bounce(&self) -> Vec2 {
        self.bounce
    }

    fn friction(&self) -> Vec2 {
        self.friction
    }

    fn gravity(&self) -> Vec2 {
        self.gravity
    }

    fn mass(&self) -> f32 {
        self.mass
    }

    fn is_enabled(&self) -> bool {
        self.enable
    }

    fn is_immovable(&self) -> bool {
        self.immovable
    }

    fn is_static(&self) -> bool {
        false
    }

    fn moves(&self) -> bool {
        self.moves
    }

    fn check_collision(&self) -> Faces {
        self.check_collision
    }

    fn custom_separate(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.custom_separate_x,
            Axis::Y => self.custom_separate_y,
        }
    }

    fn is_embedded(&self) -> bool {
        self.embedded
    }

    // The owner moves too, so a correction made outside a step survives the next one
    fn translate(&mut self, axis: Axis, amount: f32) {
        *component_mut(&mut self.position, axis) += amount;
        *component_mut(&mut self.owner, axis) += amount;
    }

    fn set_velocity_on(&mut self, axis: Axis, value: f32) {
        *component_mut(&mut self.velocity, axis) = value;
        self.speed = self.velocity.length();
    }

    fn set_overlap(&mut self, axis: Axis, overlap: f32) {
        match axis {
            Axis::X => self.overlap_x = overlap,
            Axis::Y => self.overlap_y = overlap,
        }
    }

    fn set_embedded(&mut self, embedded: bool) {
        self.embedded = embedded;
    }

    fn add_touching(&mut self, face: Face) {
        self.touching.insert(face);
    }

    fn add_blocked(&mut self, face: Face) {
        self.blocked.insert(face);
    }
}
