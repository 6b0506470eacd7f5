// Per-face flag sets used for collision filtering and contact reporting

use serde::{Deserialize, Serialize};

/// Separation axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// One side of an axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Up,
    Down,
    Left,
    Right,
}

impl Face {
    /// The face on the other body that meets this one
    pub fn opposite(self) -> Face {
        match self {
            Face::Up => Face::Down,
            Face::Down => Face::Up,
            Face::Left => Face::Right,
            Face::Right => Face::Left,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Face::Left | Face::Right => Axis::X,
            Face::Up | Face::Down => Axis::Y,
        }
    }
}

/// A set of box faces.
///
/// Used both as a filter (which faces may collide) and as a contact
/// report (which faces touched or were blocked this step).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Faces {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Faces {
    pub const NONE: Faces = Faces {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    pub const ALL: Faces = Faces {
        up: true,
        down: true,
        left: true,
        right: true,
    };

    pub const fn new(up: bool, down: bool, left: bool, right: bool) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }

    pub const fn horizontal() -> Self {
        Self::new(false, false, true, true)
    }

    pub const fn vertical() -> Self {
        Self::new(true, true, false, false)
    }

    /// No face is set
    pub fn is_none(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }

    pub fn any(&self) -> bool {
        !self.is_none()
    }

    pub fn get(&self, face: Face) -> bool {
        match face {
            Face::Up => self.up,
            Face::Down => self.down,
            Face::Left => self.left,
            Face::Right => self.right,
        }
    }

    /// Set a face. Contact reports only ever accumulate during a step.
    pub fn insert(&mut self, face: Face) {
        self.set(face, true);
    }

    pub fn set(&mut self, face: Face, value: bool) {
        match face {
            Face::Up => self.up = value,
            Face::Down => self.down = value,
            Face::Left => self.left = value,
            Face::Right => self.right = value,
        }
    }

    pub fn clear(&mut self) {
        *self = Faces::NONE;
    }

    pub fn union(self, other: Faces) -> Faces {
        Faces::new(
            self.up || other.up,
            self.down || other.down,
            self.left || other.left,
            self.right || other.right,
        )
    }

    pub fn intersection(self, other: Faces) -> Faces {
        Faces::new(
            self.up && other.up,
            self.down && other.down,
            self.left && other.left,
            self.right && other.right,
        )
    }
}

impl From<Face> for Faces {
    fn from(face: Face) -> Self {
        let mut faces = Faces::NONE;
        faces.insert(face);
        faces
    }
}
