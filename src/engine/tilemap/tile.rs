use std::fmt;
use std::rc::Rc;

use crate::engine::physics::{Body, Face, Faces};

/// Game logic invoked when a body touches a tile.
///
/// Returning `true` means the callback handled the contact and the tile
/// must not block the body this step.
pub type TileCallback = Rc<dyn Fn(&Body, &Tile) -> bool>;

/// A single cell of a [`TileLayer`](super::TileLayer)
#[derive(Clone)]
pub struct Tile {
    index: i32,
    x: usize,
    y: usize,
    width: f32,
    height: f32,

    /// Faces this tile is configured to collide on
    collide: Faces,
    /// Faces left exposed by the neighbouring tiles. Derived by the layer.
    faces: Faces,

    collision_callback: Option<TileCallback>,
}

impl Tile {
    pub fn new(index: i32, x: usize, y: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            x,
            y,
            width,
            height,
            collide: Faces::NONE,
            faces: Faces::NONE,
            collision_callback: None,
        }
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    /// Column in the layer grid
    pub fn x(&self) -> usize {
        self.x
    }

    /// Row in the layer grid
    pub fn y(&self) -> usize {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Position relative to the layer origin
    pub fn pixel_x(&self) -> f32 {
        self.x as f32 * self.width
    }

    pub fn pixel_y(&self) -> f32 {
        self.y as f32 * self.height
    }

    /// Faces this tile is configured to collide on, ignoring its neighbours
    pub fn configured_faces(&self) -> Faces {
        self.collide
    }

    pub fn collide_up(&self) -> bool {
        self.can_collide(Face::Up)
    }

    pub fn collide_down(&self) -> bool {
        self.can_collide(Face::Down)
    }

    pub fn collide_left(&self) -> bool {
        self.can_collide(Face::Left)
    }

    pub fn collide_right(&self) -> bool {
        self.can_collide(Face::Right)
    }

    /// Collides on at least one face
    pub fn collides(&self) -> bool {
        self.collide.any()
    }

    /// Exposed faces as derived from neighbours
    pub fn faces(&self) -> Faces {
        self.faces
    }

    pub fn face_top(&self) -> bool {
        self.faces.up
    }

    pub fn face_bottom(&self) -> bool {
        self.faces.down
    }

    pub fn face_left(&self) -> bool {
        self.faces.left
    }

    pub fn face_right(&self) -> bool {
        self.faces.right
    }

    /// Has at least one exposed face
    pub fn has_interesting_face(&self) -> bool {
        self.faces.any()
    }

    /// A face is collidable when it is both enabled on this tile and exposed
    pub fn can_collide(&self, face: Face) -> bool {
        self.collide.get(face) && self.faces.get(face)
    }

    /// Enable collision on `faces`.
    ///
    /// With `reset_others` every face not listed is disabled; otherwise the
    /// listed faces are added to the current set. Exposed faces are not
    /// recalculated here: go through
    /// [`TileLayer::set_tile_collision`](super::TileLayer::set_tile_collision)
    /// to keep neighbours consistent.
    pub fn set_collision(&mut self, faces: Faces, reset_others: bool) -> &mut Self {
        self.collide = if reset_others {
            faces
        } else {
            self.collide.union(faces)
        };
        self
    }

    pub fn reset_collision(&mut self) -> &mut Self {
        self.collide = Faces::NONE;
        self.faces = Faces::NONE;
        self
    }

    pub fn collision_callback(&self) -> Option<&TileCallback> {
        self.collision_callback.as_ref()
    }

    /// Per-tile callback, taking priority over the layer's index callbacks
    pub fn set_collision_callback(&mut self, callback: Option<TileCallback>) -> &mut Self {
        self.collision_callback = callback;
        self
    }

    pub(crate) fn set_index(&mut self, index: i32) {
        self.index = index;
    }

    pub(crate) fn set_faces(&mut self, faces: Faces) {
        self.faces = faces;
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tile")
            .field("index", &self.index)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("collide", &self.collide)
            .field("faces", &self.faces)
            .field("has_callback", &self.collision_callback.is_some())
            .finish()
    }
}
