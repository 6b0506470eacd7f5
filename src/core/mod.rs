// Core value types: scalar math and geometry primitives

pub mod geom;
pub mod math;

pub use geom::Rect;
pub use glam::Vec2;
