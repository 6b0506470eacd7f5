// Broad-phase candidate selection
//
// Both strategies return candidates in ascending `BodyRef` order so pair
// processing order never depends on the choice of index.

use std::collections::HashMap;

use super::collider::BodyRef;
use crate::core::Rect;

/// Spatial index queried for bodies whose boxes may intersect a rectangle
pub trait BroadPhase {
    /// Forget every proxy
    fn clear(&mut self);
    /// Index a body under its current box
    fn insert(&mut self, body: BodyRef, rect: Rect);
    /// Bodies whose indexed box intersects `rect`, sorted and deduplicated
    fn query(&self, rect: &Rect) -> Vec<BodyRef>;
}

/// Reference index: every query scans every proxy
#[derive(Debug, Default)]
pub struct BruteForce {
    items: Vec<(BodyRef, Rect)>,
}

impl BruteForce {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BroadPhase for BruteForce {
    fn clear(&mut self) {
        self.items.clear();
    }

    fn insert(&mut self, body: BodyRef, rect: Rect) {
        self.items.push((body, rect));
    }

    fn query(&self, rect: &Rect) -> Vec<BodyRef> {
        let mut found: Vec<BodyRef> = self
            .items
            .iter()
            .filter(|(_, item)| item.intersects(rect))
            .map(|(body, _)| *body)
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }
}

/// Boxes covering more grid cells than this per axis are kept in a plain list
const MAX_CELL_SPAN: f32 = 64.0;

/// Uniform grid hashing each box into every cell it covers
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<(BodyRef, Rect)>>,
    /// Boxes too large to hash, checked by every query
    oversized: Vec<(BodyRef, Rect)>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: if cell_size > 0.0 { cell_size } else { 128.0 },
            cells: HashMap::new(),
            oversized: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Inclusive cell range covered by `rect`, or `None` when it spans too many cells
    fn cell_range(&self, rect: &Rect) -> Option<(i32, i32, i32, i32)> {
        let to_cell = |v: f32| (v / self.cell_size).floor();
        let (x0, y0) = (to_cell(rect.x), to_cell(rect.y));
        let (x1, y1) = (to_cell(rect.right()), to_cell(rect.bottom()));

        let limit = i32::MAX as f32;
        if x1 - x0 >= MAX_CELL_SPAN
            || y1 - y0 >= MAX_CELL_SPAN
            || [x0, y0, x1, y1].iter().any(|v| v.abs() >= limit)
        {
            return None;
        }
        Some((x0 as i32, y0 as i32, x1 as i32, y1 as i32))
    }
}

impl BroadPhase for SpatialGrid {
    fn clear(&mut self) {
        self.cells.clear();
        self.oversized.clear();
    }

    fn insert(&mut self, body: BodyRef, rect: Rect) {
        if !rect.is_valid() {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.cell_range(&rect) else {
            self.oversized.push((body, rect));
            return;
        };
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                self.cells.entry((cx, cy)).or_default().push((body, rect));
            }
        }
    }

    fn query(&self, rect: &Rect) -> Vec<BodyRef> {
        if !rect.is_valid() {
            return Vec::new();
        }

        let mut found: Vec<BodyRef> = self
            .oversized
            .iter()
            .filter(|(_, item)| item.intersects(rect))
            .map(|(body, _)| *body)
            .collect();

        match self.cell_range(rect) {
            Some((x0, y0, x1, y1)) => {
                for cy in y0..=y1 {
                    for cx in x0..=x1 {
                        if let Some(cell) = self.cells.get(&(cx, cy)) {
                            found.extend(
                                cell.iter()
                                    .filter(|(_, item)| item.intersects(rect))
                                    .map(|(body, _)| *body),
                            );
                        }
                    }
                }
            }
            // A huge query walks the occupied cells instead of the covered ones
            None => found.extend(
                self.cells
                    .values()
                    .flatten()
                    .filter(|(_, item)| item.intersects(rect))
                    .map(|(body, _)| *body),
            ),
        }

        found.sort_unstable();
        found.dedup();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::handle::Handle;

    fn dynamic(index: u32) -> BodyRef {
        BodyRef::Dynamic(Handle::new(index, 0))
    }

    fn populate(index: &mut dyn BroadPhase) {
        index.insert(dynamic(0), Rect::new(0.0, 0.0, 10.0, 10.0));
        index.insert(dynamic(1), Rect::new(100.0, 100.0, 300.0, 10.0));
        index.insert(dynamic(2), Rect::new(1000.0, 0.0, 10.0, 10.0));
        index.insert(BodyRef::Static(Handle::new(0, 0)), Rect::new(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn test_grid_matches_brute_force() {
        let mut grid = SpatialGrid::new(64.0);
        let mut brute = BruteForce::new();
        populate(&mut grid);
        populate(&mut brute);

        for query in [
            Rect::new(0.0, 0.0, 8.0, 8.0),
            Rect::new(250.0, 95.0, 400.0, 10.0),
            Rect::new(-500.0, -500.0, 2000.0, 2000.0),
            Rect::new(500.0, 500.0, 1.0, 1.0),
        ] {
            assert_eq!(grid.query(&query), brute.query(&query));
        }
    }

    #[test]
    fn test_spanning_body_reported_once() {
        let mut grid = SpatialGrid::new(32.0);
        populate(&mut grid);

        let found = grid.query(&Rect::new(90.0, 90.0, 400.0, 40.0));
        assert_eq!(found, vec![dynamic(1)]);
    }

    #[test]
    fn test_huge_boxes_skip_the_grid() {
        let mut grid = SpatialGrid::new(1.0);
        let mut brute = BruteForce::new();
        for index in [&mut grid as &mut dyn BroadPhase, &mut brute] {
            populate(index);
            index.insert(dynamic(9), Rect::new(-1.0e30, -1.0e30, 2.0e30, 2.0e30));
        }

        assert!(grid.cells.len() < 10_000);
        for query in [
            Rect::new(0.0, 0.0, 8.0, 8.0),
            Rect::new(-3.0e38, -3.0e38, 3.0e38, 3.0e38),
            Rect::new(5.0e29, 5.0e29, 1.0, 1.0),
        ] {
            assert_eq!(grid.query(&query), brute.query(&query));
        }
    }

    #[test]
    fn test_invalid_boxes_are_not_indexed() {
        let mut grid = SpatialGrid::new(32.0);
        grid.insert(dynamic(7), Rect::new(0.0, 0.0, 0.0, 10.0));
        assert!(grid.query(&Rect::new(-10.0, -10.0, 50.0, 50.0)).is_empty());

        grid.clear();
        grid.insert(dynamic(8), Rect::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(grid.query(&Rect::new(1.0, 1.0, 1.0, 1.0)), vec![dynamic(8)]);
    }
}
