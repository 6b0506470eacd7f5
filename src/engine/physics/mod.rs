// Arcade physics: AABB bodies, axis-separated collision response and tile collision

pub mod body;
pub mod broad;
pub mod collider;
pub mod config;
pub mod events;
pub mod faces;
pub mod handle;
pub mod separate;
pub mod static_body;
pub mod tile;
mod world;

pub use body::{ArcadeBody, Body, Facing};
pub use broad::{BroadPhase, BruteForce, SpatialGrid};
pub use collider::{
    BodyGroup, BodyHandle, BodyRef, Collidable, CollideMode, Collider, ColliderId, Contact,
    ContactCallback, LayerHandle, ProcessCallback, StaticBodyHandle,
};
pub use config::{ConfigError, WorldConfig};
pub use events::{PhysicsEvent, PhysicsEventQueue};
pub use faces::{Axis, Face, Faces};
pub use handle::{Arena, Handle};
pub use separate::{separate, separate_bodies, separate_x, separate_y, SeparationParams, SeparationResult};
pub use static_body::StaticBody;
pub use world::World;
