//! Arcade-style 2D physics core.
//!
//! Axis-aligned bodies are integrated at a fixed rate, resolved against each
//! other one axis at a time, and collided with tilemap layers whose tiles
//! only expose the faces bordering open space.

pub mod core;
pub mod engine;

pub use crate::core::{Rect, Vec2};
pub use crate::engine::game_loop::{FixedTimestep, GameLoop};
pub use crate::engine::physics::{
    Body, BodyGroup, BodyHandle, BodyRef, Collidable, Face, Faces, PhysicsEvent, StaticBody, World,
    WorldConfig,
};
pub use crate::engine::tilemap::{Tile, TileLayer, TilemapError};
