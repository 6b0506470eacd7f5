// Narrow-phase body-vs-tile separation
//
// Tiles only collide on faces that are both enabled and exposed, so a body
// running into a solid block is stopped by the outer face of the first
// column it meets and never by the seams between neighbouring tiles.

use super::body::{ArcadeBody, Body};
use super::faces::{Axis, Face};
use crate::core::Rect;
use crate::engine::tilemap::{Tile, TileLayer};

/// Strict box test between a body and a tile's world rectangle
pub fn tile_intersects_body(tile_rect: &Rect, body: &Body) -> bool {
    tile_rect.intersects(&body.rect())
}

/// Run the tile's collision callback, or failing that the layer's callback for
/// the tile index.
///
/// Returns whether the tile should go on to block the body: a callback that
/// returns `true` has handled the contact itself, so this returns `false`.
/// Tiles without any callback always block.
pub fn process_tile_callbacks(tile: &Tile, layer: &TileLayer, body: &Body) -> bool {
    if let Some(callback) = tile.collision_callback() {
        return !callback(body, tile);
    }
    if let Some(callback) = layer.index_callback(tile.index()) {
        return !callback(body, tile);
    }
    true
}

/// Apply a horizontal tile overlap: block, snap out, and stop or rebound
pub fn process_tile_separation_x(body: &mut Body, x: f32) {
    process_tile_separation(body, Axis::X, x);
}

/// Apply a vertical tile overlap: block, snap out, and stop or rebound
pub fn process_tile_separation_y(body: &mut Body, y: f32) {
    process_tile_separation(body, Axis::Y, y);
}

fn process_tile_separation(body: &mut Body, axis: Axis, overlap: f32) {
    let (low, high) = match axis {
        Axis::X => (Face::Left, Face::Right),
        Axis::Y => (Face::Up, Face::Down),
    };
    if overlap < 0.0 {
        body.add_blocked(low);
        body.add_touching(low);
    } else if overlap > 0.0 {
        body.add_blocked(high);
        body.add_touching(high);
    }

    body.translate(axis, -overlap);

    let bounce = match axis {
        Axis::X => body.bounce.x,
        Axis::Y => body.bounce.y,
    };
    let velocity = body.velocity_on(axis);
    if bounce == 0.0 {
        body.set_velocity_on(axis, 0.0);
    } else {
        body.set_velocity_on(axis, -velocity * bounce);
    }
}

/// Horizontal tile check.
///
/// Only the face the body is moving into is tested, and only if the body is
/// not already blocked that way. A penetration deeper than `tile_bias` means
/// the body did not arrive through this face and is ignored. Returns the
/// overlap found, which has been resolved unless the body asked for custom
/// horizontal separation (then it is left in `overlap_x`).
///
/// With `is_layer` unset, face flags are ignored and every side collides.
pub fn tile_check_x(
    body: &mut Body,
    tile: &Tile,
    tile_left: f32,
    tile_right: f32,
    tile_bias: f32,
    is_layer: bool,
) -> f32 {
    let collide_right = !is_layer || tile.can_collide(Face::Right);
    let collide_left = !is_layer || tile.can_collide(Face::Left);
    let mut ox = 0.0;

    if body.delta_x() < 0.0
        && collide_right
        && body.check_collision.left
        && !body.blocked().left
    {
        if body.x() < tile_right {
            ox = body.x() - tile_right;
            if ox < -tile_bias {
                ox = 0.0;
            }
        }
    } else if body.delta_x() > 0.0
        && collide_left
        && body.check_collision.right
        && !body.blocked().right
        && body.right() > tile_left
    {
        ox = body.right() - tile_left;
        if ox > tile_bias {
            ox = 0.0;
        }
    }

    if ox != 0.0 {
        if body.custom_separate_x {
            body.set_overlap(Axis::X, ox);
        } else {
            process_tile_separation_x(body, ox);
        }
    }
    ox
}

/// Vertical counterpart of [`tile_check_x`]
pub fn tile_check_y(
    body: &mut Body,
    tile: &Tile,
    tile_top: f32,
    tile_bottom: f32,
    tile_bias: f32,
    is_layer: bool,
) -> f32 {
    let collide_down = !is_layer || tile.can_collide(Face::Down);
    let collide_up = !is_layer || tile.can_collide(Face::Up);
    let mut oy = 0.0;

    if body.delta_y() < 0.0
        && collide_down
        && body.check_collision.up
        && !body.blocked().up
    {
        if body.y() < tile_bottom {
            oy = body.y() - tile_bottom;
            if oy < -tile_bias {
                oy = 0.0;
            }
        }
    } else if body.delta_y() > 0.0
        && collide_up
        && body.check_collision.down
        && !body.blocked().down
        && body.bottom() > tile_top
    {
        oy = body.bottom() - tile_top;
        if oy > tile_bias {
            oy = 0.0;
        }
    }

    if oy != 0.0 {
        if body.custom_separate_y {
            body.set_overlap(Axis::Y, oy);
        } else {
            process_tile_separation_y(body, oy);
        }
    }
    oy
}

/// Resolve a body against one tile on both axes.
///
/// The axis the body moved further along this step goes first. When the body
/// moved diagonally and the tile has faces on both axes, the axis with the
/// shallower edge distance goes first instead. If the first axis already
/// pushed the body clear of the tile the second is skipped.
pub fn separate_tile(body: &mut Body, tile: &Tile, tile_rect: &Rect, tile_bias: f32, is_layer: bool) -> bool {
    let faces = tile.faces();
    let (face_horizontal, face_vertical) = if is_layer {
        (faces.left || faces.right, faces.up || faces.down)
    } else {
        (true, true)
    };

    // Only reachable through callbacks: nothing to separate against
    if !face_horizontal && !face_vertical {
        return false;
    }

    let mut min_x = 0.0_f32;
    let mut min_y = 1.0_f32;
    if body.delta_abs_x() > body.delta_abs_y() {
        min_x = -1.0;
    } else if body.delta_abs_x() < body.delta_abs_y() {
        min_y = -1.0;
    }

    if body.delta_x() != 0.0 && body.delta_y() != 0.0 && face_horizontal && face_vertical {
        min_x = (body.x() - tile_rect.right())
            .abs()
            .min((body.right() - tile_rect.left()).abs());
        min_y = (body.y() - tile_rect.bottom())
            .abs()
            .min((body.bottom() - tile_rect.top()).abs());
    }

    let mut ox = 0.0;
    let mut oy = 0.0;

    if min_x < min_y {
        if face_horizontal {
            ox = tile_check_x(body, tile, tile_rect.left(), tile_rect.right(), tile_bias, is_layer);
            if ox != 0.0 && !tile_intersects_body(tile_rect, body) {
                return true;
            }
        }
        if face_vertical {
            oy = tile_check_y(body, tile, tile_rect.top(), tile_rect.bottom(), tile_bias, is_layer);
        }
    } else {
        if face_vertical {
            oy = tile_check_y(body, tile, tile_rect.top(), tile_rect.bottom(), tile_bias, is_layer);
            if oy != 0.0 && !tile_intersects_body(tile_rect, body) {
                return true;
            }
        }
        if face_horizontal {
            ox = tile_check_x(body, tile, tile_rect.left(), tile_rect.right(), tile_bias, is_layer);
        }
    }

    ox != 0.0 || oy != 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::Faces;
    use approx::assert_relative_eq;
    use glam::Vec2;
    use std::rc::Rc;

    const TILE_BIAS: f32 = 16.0;

    fn advance(body: &mut Body, dt: f32) {
        body.pre_update();
        body.update(dt, Vec2::ZERO);
        body.commit_delta();
    }

    /// 5x3 layer of 16px tiles: a solid pair at (2,1) and (3,1)
    fn layer() -> TileLayer {
        #[rustfmt::skip]
        let data = [
            -1, -1, -1, -1, -1,
            -1, -1,  1,  1, -1,
            -1, -1, -1, -1, -1,
        ];
        let mut layer = TileLayer::from_indices("walls", 5, 3, 16.0, 16.0, &data).unwrap();
        layer.set_collision(&[1], true);
        layer
    }

    #[test]
    fn test_moving_right_hits_left_face() {
        let layer = layer();
        let tile = layer.tile_at(2, 1).unwrap();
        let rect = layer.tile_world_rect(tile);

        // Box 10x10 at x=20, moving 6px right into the tile at x=32
        let mut body = Body::new(16.0, 18.0, 10.0, 10.0);
        body.set_velocity(100.0, 0.0);
        advance(&mut body, 0.1);
        assert_relative_eq!(body.right(), 36.0);

        let ox = tile_check_x(&mut body, tile, rect.left(), rect.right(), TILE_BIAS, true);
        assert_relative_eq!(ox, 4.0);
        assert_relative_eq!(body.right(), 32.0);
        assert!(body.blocked().right);
        assert_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_face_gating_disables_left_face() {
        let mut layer = layer();
        layer
            .set_tile_collision(2, 1, Faces::new(true, true, false, true), true)
            .unwrap();
        let tile = layer.tile_at(2, 1).unwrap();
        let rect = layer.tile_world_rect(tile);

        let mut body = Body::new(16.0, 18.0, 10.0, 10.0);
        body.set_velocity(100.0, 0.0);
        advance(&mut body, 0.1);

        assert!(tile_intersects_body(&rect, &body));
        let ox = tile_check_x(&mut body, tile, rect.left(), rect.right(), TILE_BIAS, true);
        assert_eq!(ox, 0.0);
        assert_relative_eq!(body.right(), 36.0);
        assert!(body.blocked().is_none());
    }

    #[test]
    fn test_internal_face_never_collides() {
        let layer = layer();
        let second = layer.tile_at(3, 1).unwrap();
        let rect = layer.tile_world_rect(second);

        // Overlapping the seam between the two solid tiles while moving right
        let mut body = Body::new(40.0, 18.0, 10.0, 10.0);
        body.set_velocity(50.0, 0.0);
        advance(&mut body, 0.1);

        let ox = tile_check_x(&mut body, second, rect.left(), rect.right(), TILE_BIAS, true);
        assert_eq!(ox, 0.0);
        assert!(body.blocked().is_none());
    }

    #[test]
    fn test_non_layer_tiles_collide_on_every_face() {
        let layer = layer();
        let second = layer.tile_at(3, 1).unwrap();
        let rect = layer.tile_world_rect(second);

        let mut body = Body::new(40.0, 18.0, 10.0, 10.0);
        body.set_velocity(50.0, 0.0);
        advance(&mut body, 0.1);

        let ox = tile_check_x(&mut body, second, rect.left(), rect.right(), TILE_BIAS, false);
        assert_relative_eq!(ox, 7.0);
        assert_relative_eq!(body.right(), 48.0);
    }

    #[test]
    fn test_deep_penetration_is_ignored() {
        let layer = layer();
        let tile = layer.tile_at(2, 1).unwrap();
        let rect = layer.tile_world_rect(tile);

        let mut body = Body::new(0.0, 18.0, 10.0, 10.0);
        body.set_velocity(300.0, 0.0);
        advance(&mut body, 0.1);
        // Right edge at 40 is 8px inside, deeper than a 4px bias allows
        assert_relative_eq!(tile_check_x(&mut body, tile, rect.left(), rect.right(), 4.0, true), 0.0);
        assert_relative_eq!(body.right(), 40.0);
    }

    #[test]
    fn test_blocked_direction_is_not_rechecked() {
        let layer = layer();
        let tile = layer.tile_at(2, 1).unwrap();
        let rect = layer.tile_world_rect(tile);

        let mut body = Body::new(16.0, 18.0, 10.0, 10.0);
        body.set_velocity(100.0, 0.0);
        advance(&mut body, 0.1);
        body.add_blocked(Face::Right);

        assert_eq!(tile_check_x(&mut body, tile, rect.left(), rect.right(), TILE_BIAS, true), 0.0);
    }

    #[test]
    fn test_landing_on_top_face_with_bounce() {
        let layer = layer();
        let tile = layer.tile_at(2, 1).unwrap();
        let rect = layer.tile_world_rect(tile);

        let mut body = Body::new(34.0, 0.0, 10.0, 10.0);
        body.set_velocity(0.0, 100.0).set_bounce(0.0, 0.5);
        advance(&mut body, 0.1);
        assert_relative_eq!(body.bottom(), 20.0);

        assert!(separate_tile(&mut body, tile, &rect, TILE_BIAS, true));
        assert_relative_eq!(body.bottom(), 16.0);
        assert!(body.blocked().down);
        assert!(body.touching().down);
        assert_relative_eq!(body.velocity.y, -50.0);
    }

    #[test]
    fn test_custom_separation_stashes_tile_overlap() {
        let layer = layer();
        let tile = layer.tile_at(2, 1).unwrap();
        let rect = layer.tile_world_rect(tile);

        let mut body = Body::new(34.0, 0.0, 10.0, 10.0);
        body.set_velocity(0.0, 100.0).set_custom_separate(false, true);
        advance(&mut body, 0.1);

        assert_relative_eq!(tile_check_y(&mut body, tile, rect.top(), rect.bottom(), TILE_BIAS, true), 4.0);
        assert_relative_eq!(body.overlap_y(), 4.0);
        assert_relative_eq!(body.bottom(), 20.0);
        assert!(body.blocked().is_none());
    }

    #[test]
    fn test_tile_without_faces_is_not_separated() {
        let mut layer = layer();
        layer.set_collision(&[1], false);
        let tile = layer.tile_at(2, 1).unwrap();
        let rect = layer.tile_world_rect(tile);

        let mut body = Body::new(34.0, 0.0, 10.0, 10.0);
        body.set_velocity(0.0, 100.0);
        advance(&mut body, 0.1);

        assert!(!separate_tile(&mut body, tile, &rect, TILE_BIAS, true));
    }

    #[test]
    fn test_callback_priority_and_veto() {
        let mut layer = layer();
        let body = Body::new(0.0, 0.0, 10.0, 10.0);

        assert!(process_tile_callbacks(layer.tile_at(2, 1).unwrap(), &layer, &body));

        layer.set_tile_index_callback(&[1], Some(Rc::new(|_: &Body, _: &Tile| true)));
        assert!(!process_tile_callbacks(layer.tile_at(2, 1).unwrap(), &layer, &body));

        // A per-tile callback wins over the index callback
        layer.set_tile_location_callback(2, 1, 1, 1, Some(Rc::new(|_: &Body, _: &Tile| false)));
        assert!(process_tile_callbacks(layer.tile_at(2, 1).unwrap(), &layer, &body));
        assert!(!process_tile_callbacks(layer.tile_at(3, 1).unwrap(), &layer, &body));
    }
}
