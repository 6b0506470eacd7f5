use super::collider::{BodyHandle, BodyRef, LayerHandle};
use super::faces::Faces;

/// Notification emitted by the world for game logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsEvent {
    /// Two bodies were separated
    Collide { a: BodyRef, b: BodyRef },

    /// Two bodies configured as overlap-only intersect
    Overlap { a: BodyRef, b: BodyRef },

    /// A body was separated from a tile
    TileCollide {
        body: BodyHandle,
        layer: LayerHandle,
        tile_x: usize,
        tile_y: usize,
    },

    /// A body overlaps a colliding tile in overlap-only mode
    TileOverlap {
        body: BodyHandle,
        layer: LayerHandle,
        tile_x: usize,
        tile_y: usize,
    },

    /// A body with `on_world_bounds` set hit the world bounds on `faces`
    WorldBounds { body: BodyHandle, faces: Faces },

    Pause,
    Resume,
}

/// Queue for storing physics events until the game drains them
#[derive(Debug)]
pub struct PhysicsEventQueue {
    events: Vec<PhysicsEvent>,
}

impl PhysicsEventQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32), // Pre-allocate for common case
        }
    }

    pub fn push(&mut self, event: PhysicsEvent) {
        self.events.push(event);
    }

    /// Events emitted since the last drain
    pub fn events(&self) -> &[PhysicsEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain(&mut self) -> Vec<PhysicsEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Default for PhysicsEventQueue {
    fn default() -> Self {
        Self::new()
    }
}
