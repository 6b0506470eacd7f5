use glam::Vec2;

use super::body::ArcadeBody;
use super::faces::{Axis, Face, Faces};
use crate::core::Rect;

/// An immovable box: same geometric contract as [`Body`](super::Body) but
/// never integrated and never displaced by collision response.
///
/// Static bodies only move when explicitly repositioned with [`reset`](Self::reset)
/// or resized; the world re-indexes them on its next broad-phase pass.
#[derive(Debug, Clone)]
pub struct StaticBody {
    enable: bool,
    owner: Vec2,
    offset: Vec2,
    position: Vec2,
    width: f32,
    height: f32,

    /// Which faces of this body other bodies may collide with
    pub check_collision: Faces,

    touching: Faces,
    was_touching: Faces,
    blocked: Faces,
    embedded: bool,
}

impl StaticBody {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        let owner = Vec2::new(x, y);
        Self {
            enable: true,
            owner,
            offset: Vec2::ZERO,
            position: owner,
            width: width.max(0.0),
            height: height.max(0.0),
            check_collision: Faces::ALL,
            touching: Faces::NONE,
            was_touching: Faces::NONE,
            blocked: Faces::NONE,
            embedded: false,
        }
    }

    /// Move the owner to (`x`, `y`)
    pub fn reset(&mut self, x: f32, y: f32) -> &mut Self {
        self.owner = Vec2::new(x, y);
        self.position = self.owner + self.offset;
        self
    }

    pub fn set_size(&mut self, width: f32, height: f32) -> &mut Self {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self
    }

    pub fn set_offset(&mut self, x: f32, y: f32) -> &mut Self {
        self.offset = Vec2::new(x, y);
        self.position = self.owner + self.offset;
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

    pub fn touching(&self) -> Faces {
        self.touching
    }

    pub fn was_touching(&self) -> Faces {
        self.was_touching
    }

    pub fn blocked(&self) -> Faces {
        self.blocked
    }

    pub fn is_valid(&self) -> bool {
        self.enable && self.rect().is_valid()
    }

    pub(crate) fn pre_update(&mut self) {
        self.was_touching = self.touching;
        self.touching.clear();
        self.blocked.clear();
        self.embedded = false;
    }
}

impl ArcadeBody for StaticBody {
    fn rect(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.width, self.height)
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn prev(&self) -> Vec2 {
        self.position
    }

    fn delta(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn velocity(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn bounce(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn friction(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn gravity(&self) -> Vec2 {
        Vec2::ZERO
    }

    fn mass(&self) -> f32 {
        1.0
    }

    fn is_enabled(&self) -> bool {
        self.enable
    }

    fn is_immovable(&self) -> bool {
        true
    }

    fn is_static(&self) -> bool {
        true
    }

    fn moves(&self) -> bool {
        false
    }

    fn check_collision(&self) -> Faces {
        self.check_collision
    }

    fn custom_separate(&self, _axis: Axis) -> bool {
        false
    }

    fn is_embedded(&self) -> bool {
        self.embedded
    }

    // Static bodies are never displaced or accelerated by collision response.
    fn translate(&mut self, _axis: Axis, _amount: f32) {}

    fn set_velocity_on(&mut self, _axis: Axis, _value: f32) {}

    fn set_overlap(&mut self, _axis: Axis, _overlap: f32) {}

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
