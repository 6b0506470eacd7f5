// Tilemap layers consumed by the physics core
//
// A layer is a grid of tiles with per-tile collision faces. The physics world
// queries it for the tiles under a body and resolves the body against each.

mod layer;
mod tile;

pub use layer::{derive_faces, TileLayer, EMPTY_TILE};
pub use tile::{Tile, TileCallback};

/// Tilemap construction and editing errors
#[derive(Debug, thiserror::Error)]
pub enum TilemapError {
    #[error("Layer data has {actual} tiles, expected {expected}")]
    DataLength { expected: usize, actual: usize },

    #[error("Invalid tile size: {width}x{height}")]
    InvalidTileSize { width: f32, height: f32 },

    #[error("Tile ({x}, {y}) is outside the {width}x{height} layer")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("No tile at ({x}, {y})")]
    EmptyCell { x: usize, y: usize },
}
