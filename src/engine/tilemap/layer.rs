use std::collections::{HashMap, HashSet};

use glam::Vec2;
use log::debug;

use super::tile::{Tile, TileCallback};
use super::TilemapError;
use crate::core::Rect;
use crate::engine::physics::Faces;

/// Index used in raw layer data for an empty cell
pub const EMPTY_TILE: i32 = -1;

/// Exposed faces for every cell of a `width` × `height` grid.
///
/// A colliding cell exposes a face unless the neighbour on that side also
/// collides; cells on the layer edge expose their outer faces. Internal faces
/// between two solid cells are therefore never collidable, so a body sliding
/// along a row of solid tiles cannot catch on the seams.
pub fn derive_faces(collides: &[bool], width: usize, height: usize) -> Vec<Faces> {
    let solid = |x: usize, y: usize| collides[y * width + x];

    (0..width * height)
        .map(|i| {
            if !collides[i] {
                return Faces::NONE;
            }
            let (x, y) = (i % width, i / width);
            Faces::new(
                y == 0 || !solid(x, y - 1),
                y + 1 == height || !solid(x, y + 1),
                x == 0 || !solid(x - 1, y),
                x + 1 == width || !solid(x + 1, y),
            )
        })
        .collect()
}

/// A grid of tiles placed in the world at `origin`.
///
/// The layer owns the collision state of its tiles: which indexes collide,
/// the exposed faces derived from neighbours, and the per-index callbacks.
pub struct TileLayer {
    name: String,
    width: usize,
    height: usize,
    tile_width: f32,
    tile_height: f32,
    origin: Vec2,
    tiles: Vec<Option<Tile>>,
    collide_indexes: HashSet<i32>,
    index_callbacks: HashMap<i32, TileCallback>,
}

impl TileLayer {
    /// Create an empty layer of `width` × `height` cells
    pub fn new(
        name: &str,
        width: usize,
        height: usize,
        tile_width: f32,
        tile_height: f32,
    ) -> Result<Self, TilemapError> {
        if !(tile_width > 0.0 && tile_height > 0.0) {
            return Err(TilemapError::InvalidTileSize {
                width: tile_width,
                height: tile_height,
            });
        }

        Ok(Self {
            name: name.to_string(),
            width,
            height,
            tile_width,
            tile_height,
            origin: Vec2::ZERO,
            tiles: vec![None; width * height],
            collide_indexes: HashSet::new(),
            index_callbacks: HashMap::new(),
        })
    }

    /// Create a layer from row-major tile indexes, [`EMPTY_TILE`] marking empty cells
    pub fn from_indices(
        name: &str,
        width: usize,
        height: usize,
        tile_width: f32,
        tile_height: f32,
        data: &[i32],
    ) -> Result<Self, TilemapError> {
        if data.len() != width * height {
            return Err(TilemapError::DataLength {
                expected: width * height,
                actual: data.len(),
            });
        }

        let mut layer = Self::new(name, width, height, tile_width, tile_height)?;
        for (i, &index) in data.iter().enumerate() {
            if index != EMPTY_TILE {
                layer.tiles[i] = Some(Tile::new(
                    index,
                    i % width,
                    i / width,
                    tile_width,
                    tile_height,
                ));
            }
        }
        debug!(
            "Created tile layer '{}' ({}x{} tiles of {}x{})",
            name, width, height, tile_width, tile_height
        );
        Ok(layer)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width in tiles
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_width(&self) -> f32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> f32 {
        self.tile_height
    }

    /// World position of the layer's top-left corner
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_origin(&mut self, x: f32, y: f32) -> &mut Self {
        self.origin = Vec2::new(x, y);
        self
    }

    /// World rectangle covered by the whole layer
    pub fn world_rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.width as f32 * self.tile_width,
            self.height as f32 * self.tile_height,
        )
    }

    fn cell(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    fn checked_cell(&self, x: usize, y: usize) -> Result<usize, TilemapError> {
        self.cell(x, y).ok_or(TilemapError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    pub fn tile_at(&self, x: usize, y: usize) -> Option<&Tile> {
        self.cell(x, y).and_then(|i| self.tiles[i].as_ref())
    }

    pub fn tile_at_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        self.cell(x, y).and_then(move |i| self.tiles[i].as_mut())
    }

    /// Grid coordinates of the cell containing a world point
    pub fn world_to_tile(&self, point: Vec2) -> Option<(usize, usize)> {
        let local = point - self.origin;
        let tx = (local.x / self.tile_width).floor();
        let ty = (local.y / self.tile_height).floor();
        if tx < 0.0 || ty < 0.0 || !tx.is_finite() || !ty.is_finite() {
            return None;
        }
        let (tx, ty) = (tx as usize, ty as usize);
        self.cell(tx, ty).map(|_| (tx, ty))
    }

    pub fn tile_at_world(&self, point: Vec2) -> Option<&Tile> {
        self.world_to_tile(point)
            .and_then(|(x, y)| self.tile_at(x, y))
    }

    /// World rectangle of a tile of this layer
    pub fn tile_world_rect(&self, tile: &Tile) -> Rect {
        Rect::new(
            self.origin.x + tile.pixel_x(),
            self.origin.y + tile.pixel_y(),
            tile.width(),
            tile.height(),
        )
    }

    /// Grid coordinates of the tiles under a world rectangle, row by row.
    ///
    /// With `colliding_only` set, only tiles that collide on some face are returned.
    pub fn tiles_within_world_rect(&self, rect: &Rect, colliding_only: bool) -> Vec<(usize, usize)> {
        if !rect.is_valid() {
            return Vec::new();
        }

        let local_x = rect.x - self.origin.x;
        let local_y = rect.y - self.origin.y;
        let clamp_col = |v: f32| v.max(0.0).min(self.width as f32) as usize;
        let clamp_row = |v: f32| v.max(0.0).min(self.height as f32) as usize;

        let left = clamp_col((local_x / self.tile_width).floor());
        let right = clamp_col(((local_x + rect.width) / self.tile_width).ceil());
        let top = clamp_row((local_y / self.tile_height).floor());
        let bottom = clamp_row(((local_y + rect.height) / self.tile_height).ceil());

        let mut found = Vec::new();
        for y in top..bottom {
            for x in left..right {
                if let Some(tile) = self.tile_at(x, y) {
                    if !colliding_only || tile.collides() {
                        found.push((x, y));
                    }
                }
            }
        }
        found
    }

    /// Place a tile, replacing whatever was there. [`EMPTY_TILE`] removes the cell.
    pub fn put_tile_at(&mut self, index: i32, x: usize, y: usize) -> Result<(), TilemapError> {
        let cell = self.checked_cell(x, y)?;
        if index == EMPTY_TILE {
            self.tiles[cell] = None;
        } else {
            let mut tile = Tile::new(index, x, y, self.tile_width, self.tile_height);
            if self.collide_indexes.contains(&index) {
                tile.set_collision(Faces::ALL, true);
            }
            self.tiles[cell] = Some(tile);
        }
        self.calculate_faces_at(x, y);
        Ok(())
    }

    pub fn remove_tile_at(&mut self, x: usize, y: usize) -> Result<Option<Tile>, TilemapError> {
        let cell = self.checked_cell(x, y)?;
        let removed = self.tiles[cell].take();
        self.calculate_faces_at(x, y);
        Ok(removed)
    }

    /// Change a tile's index in place, keeping its callback
    pub fn set_tile_index(&mut self, x: usize, y: usize, index: i32) -> Result<(), TilemapError> {
        let collides = self.collide_indexes.contains(&index);
        let cell = self.checked_cell(x, y)?;
        let tile = self.tiles[cell]
            .as_mut()
            .ok_or(TilemapError::EmptyCell { x, y })?;
        tile.set_index(index);
        if collides {
            tile.set_collision(Faces::ALL, true);
        } else {
            tile.reset_collision();
        }
        self.calculate_faces_at(x, y);
        Ok(())
    }

    /// Enable or disable collision for every tile with one of `indexes`
    pub fn set_collision(&mut self, indexes: &[i32], collides: bool) {
        for &index in indexes {
            if collides {
                self.collide_indexes.insert(index);
            } else {
                self.collide_indexes.remove(&index);
            }
        }

        let wanted: HashSet<i32> = indexes.iter().copied().collect();
        self.apply_collision(|index| wanted.contains(&index), collides);
    }

    /// [`set_collision`](Self::set_collision) for the inclusive range `start..=stop`
    pub fn set_collision_between(&mut self, start: i32, stop: i32, collides: bool) {
        let indexes: Vec<i32> = (start..=stop).collect();
        self.set_collision(&indexes, collides);
    }

    /// Enable or disable collision for every tile whose index is not in `excluded`
    pub fn set_collision_by_exclusion(&mut self, excluded: &[i32], collides: bool) {
        let excluded: HashSet<i32> = excluded.iter().copied().collect();
        let affected: Vec<i32> = self
            .tiles
            .iter()
            .flatten()
            .map(Tile::index)
            .filter(|index| !excluded.contains(index))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        self.set_collision(&affected, collides);
    }

    fn apply_collision(&mut self, matches: impl Fn(i32) -> bool, collides: bool) {
        for tile in self.tiles.iter_mut().flatten() {
            if matches(tile.index()) {
                if collides {
                    tile.set_collision(Faces::ALL, true);
                } else {
                    tile.reset_collision();
                }
            }
        }
        self.calculate_faces();
    }

    /// Override the colliding faces of a single tile and refresh its neighbourhood
    pub fn set_tile_collision(
        &mut self,
        x: usize,
        y: usize,
        faces: Faces,
        reset_others: bool,
    ) -> Result<(), TilemapError> {
        let cell = self.checked_cell(x, y)?;
        let tile = self.tiles[cell]
            .as_mut()
            .ok_or(TilemapError::EmptyCell { x, y })?;
        tile.set_collision(faces, reset_others);
        self.calculate_faces_at(x, y);
        Ok(())
    }

    fn collides_at(&self, x: usize, y: usize) -> bool {
        self.tile_at(x, y).map_or(false, Tile::collides)
    }

    /// Recalculate exposed faces for the whole layer
    pub fn calculate_faces(&mut self) {
        let collides: Vec<bool> = self
            .tiles
            .iter()
            .map(|tile| tile.as_ref().map_or(false, Tile::collides))
            .collect();
        let faces = derive_faces(&collides, self.width, self.height);

        for (tile, faces) in self.tiles.iter_mut().zip(faces) {
            if let Some(tile) = tile {
                tile.set_faces(faces);
            }
        }
    }

    /// Recalculate exposed faces for a tile and its four neighbours
    pub fn calculate_faces_at(&mut self, x: usize, y: usize) {
        let mut cells = vec![(x, y), (x + 1, y), (x, y + 1)];
        if x > 0 {
            cells.push((x - 1, y));
        }
        if y > 0 {
            cells.push((x, y - 1));
        }

        for (cx, cy) in cells {
            if self.cell(cx, cy).is_none() {
                continue;
            }
            let faces = if self.collides_at(cx, cy) {
                Faces::new(
                    cy == 0 || !self.collides_at(cx, cy - 1),
                    !self.collides_at(cx, cy + 1),
                    cx == 0 || !self.collides_at(cx - 1, cy),
                    !self.collides_at(cx + 1, cy),
                )
            } else {
                Faces::NONE
            };
            if let Some(tile) = self.tile_at_mut(cx, cy) {
                tile.set_faces(faces);
            }
        }
    }

    /// Callback run when a body touches any tile with one of `indexes`; `None` removes it
    pub fn set_tile_index_callback(&mut self, indexes: &[i32], callback: Option<TileCallback>) {
        for &index in indexes {
            match &callback {
                Some(callback) => {
                    self.index_callbacks.insert(index, callback.clone());
                }
                None => {
                    self.index_callbacks.remove(&index);
                }
            }
        }
    }

    pub fn index_callback(&self, index: i32) -> Option<&TileCallback> {
        self.index_callbacks.get(&index)
    }

    /// Attach a per-tile callback to every tile in a `width` × `height` area of the grid
    pub fn set_tile_location_callback(
        &mut self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        callback: Option<TileCallback>,
    ) {
        for ty in y..y.saturating_add(height).min(self.height) {
            for tx in x..x.saturating_add(width).min(self.width) {
                if let Some(tile) = self.tile_at_mut(tx, ty) {
                    tile.set_collision_callback(callback.clone());
                }
            }
        }
    }

    /// Iterate over every occupied cell
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }
}
