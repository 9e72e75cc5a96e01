//! Collision resolution of the player's box against block volumes.
//!
//! Vertical and horizontal contacts are resolved in separate passes, vertical first. The
//! vertical pass applies a single correction for the nearest overlapping block. The
//! horizontal pass applies one correction per overlapping block, in nearest-first order.
//! Every correction is rebuilt from the pre-move origin; only the displacement it projects
//! onto the wall is taken from the position the previous correction produced, so several
//! walls blend into one sliding response.

use cgmath::{InnerSpace, Point3, Vector3};
use log::trace;

use super::aabb::Aabb;
use super::neighborhood::gather_adjacent_block_positions;
use crate::engine_state::voxels::block::{aabb_for_block_at, Block, BLOCK_HALF_EXTENT};
use crate::engine_state::voxels::world::BlockAccess;

/// Gap left between the player's feet (or head) and a block face after a vertical snap.
pub const VERTICAL_SNAP_EPSILON: f32 = 0.00001;

/// Fraction of the penetration pushed back out per horizontal contact.
pub const PUSH_BACK_FACTOR: f32 = 0.2;

/// Resolves a vertical collision after the player moved from `origin` to `position`.
///
/// The first solid block of the neighborhood of `origin` (nearest first) that overlaps
/// the player's box decides the outcome: the player is placed on top of it when moving
/// down or standing still, or below it when moving up. Returns true if a block was hit.
pub fn vertical_hit_test<W: BlockAccess>(
    world: &W,
    origin: Point3<f32>,
    position: &mut Point3<f32>,
    dimensions: Vector3<f32>,
) -> bool {
    let player_aabb = Aabb::new(*position, dimensions);

    for block_position in gather_adjacent_block_positions(origin) {
        let p = block_position.position;
        let block_type = world.block_type_at(p);

        if Block::get_properties_from_int(block_type).is_penetrable
            || !player_aabb.overlaps(&aabb_for_block_at(p))
        {
            continue;
        }

        let direction = origin.y - position.y;
        let offset = BLOCK_HALF_EXTENT + VERTICAL_SNAP_EPSILON + dimensions.y;
        position.y = if direction >= 0.0 {
            p.y as f32 + offset
        } else {
            p.y as f32 - offset
        };

        trace!("Vertical contact with block {:?}, y snapped to {}", p, position.y);
        return true;
    }

    false
}

/// Resolves horizontal collisions after the player moved from `origin` to `position`.
///
/// For every solid block overlapping the player's box, the position is rebuilt from
/// `origin`: a fraction of the penetration is pushed back, and the attempted displacement
/// is projected onto the wall so the player slides along it. Returns true if any block
/// was hit.
pub fn horizontal_hit_test<W: BlockAccess>(
    world: &W,
    origin: Point3<f32>,
    position: &mut Point3<f32>,
    dimensions: Vector3<f32>,
) -> bool {
    let mut result = false;
    let origin_aabb = Aabb::new(origin, dimensions);

    for block_position in gather_adjacent_block_positions(origin) {
        let p = block_position.position;
        let block_type = world.block_type_at(p);
        if Block::get_properties_from_int(block_type).is_penetrable {
            continue;
        }

        let block_aabb = aabb_for_block_at(p);
        if !Aabb::new(*position, dimensions).overlaps(&block_aabb) {
            continue;
        }
        result = true;

        let direction = Vector3::new(position.x - origin.x, 0.0, position.z - origin.z);

        let block_poi = block_aabb.closest_point_to(origin);
        let player_poi = origin_aabb.closest_point_to(block_poi);

        let plane_normal = block_aabb.normal_for_closest_face(block_poi, origin, true, false, true);

        // Perpendicular to the wall normal in the horizontal plane.
        let slide_vector = Vector3::new(plane_normal.z, 0.0, -plane_normal.x);
        let push_back = block_poi - player_poi;

        let length = slide_vector.dot(direction);

        *position = Point3::new(
            origin.x + push_back.x * PUSH_BACK_FACTOR + length * slide_vector.x,
            origin.y,
            origin.z + push_back.z * PUSH_BACK_FACTOR + length * slide_vector.z,
        );

        trace!("Horizontal contact with block {:?}, slid to {:?}", p, position);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;
    use crate::engine_state::voxels::world::World;

    const DIMENSIONS: Vector3<f32> = Vector3::new(0.3, 0.7, 0.3);

    fn world_with(blocks: &[(i32, i32, i32)]) -> World {
        let mut world = World::new();
        for &(x, y, z) in blocks {
            world.set_block_at(Point3::new(x, y, z), BlockType::STONE.id(), false, false);
        }
        world
    }

    #[test]
    fn falling_onto_a_block_lands_on_top() {
        let world = world_with(&[(0, 9, 0)]);
        let origin = Point3::new(0.0, 10.0, 0.0);
        let mut position = Point3::new(0.0, 9.9, 0.0);

        assert!(vertical_hit_test(&world, origin, &mut position, DIMENSIONS));
        assert!((position.y - (9.0 + 0.5 + 0.7 + VERTICAL_SNAP_EPSILON)).abs() < 1e-5);
    }

    #[test]
    fn rising_into_a_block_stops_below_it() {
        let world = world_with(&[(0, 12, 0)]);
        let origin = Point3::new(0.0, 10.5, 0.0);
        let mut position = Point3::new(0.0, 10.9, 0.0);

        assert!(vertical_hit_test(&world, origin, &mut position, DIMENSIONS));
        assert!((position.y - (12.0 - 0.5 - 0.7 - VERTICAL_SNAP_EPSILON)).abs() < 1e-5);
    }

    #[test]
    fn vertical_resolution_is_stable_for_the_same_snapshot() {
        let world = world_with(&[(0, 9, 0)]);
        let origin = Point3::new(0.0, 10.2, 0.0);
        let moved = Point3::new(0.0, 10.1, 0.0);

        let mut first = moved;
        let mut second = moved;
        vertical_hit_test(&world, origin, &mut first, DIMENSIONS);
        vertical_hit_test(&world, origin, &mut second, DIMENSIONS);
        assert_eq!(first, second);
    }

    #[test]
    fn penetrable_blocks_are_ignored() {
        let mut world = World::new();
        world.set_block_at(Point3::new(0, 9, 0), BlockType::WATER.id(), false, false);
        let mut position = Point3::new(0.0, 9.9, 0.0);
        assert!(!vertical_hit_test(
            &world,
            Point3::new(0.0, 10.0, 0.0),
            &mut position,
            DIMENSIONS
        ));
        assert_eq!(position.y, 9.9);
    }

    #[test]
    fn walking_diagonally_into_a_wall_slides_along_it() {
        // Wall along z at x = 1.
        let world = world_with(&[(1, 10, -1), (1, 10, 0), (1, 10, 1)]);
        let origin = Point3::new(0.15, 10.0, 0.0);
        let mut position = Point3::new(0.25, 10.0, 0.1);

        assert!(horizontal_hit_test(&world, origin, &mut position, DIMENSIONS));
        assert!(position.x + DIMENSIONS.x < 0.5, "still inside the wall: {:?}", position);
        assert!((position.z - 0.1).abs() < 1e-5, "lost the slide along z: {:?}", position);
        assert_eq!(position.y, origin.y);
    }

    #[test]
    fn walking_into_a_corner_clears_both_walls() {
        // One wall block ahead in x, one ahead in z, both touched in the same tick.
        let world = world_with(&[(1, 10, 0), (0, 10, 1)]);
        let origin = Point3::new(0.15, 10.0, 0.15);
        let mut position = Point3::new(0.25, 10.0, 0.25);

        assert!(horizontal_hit_test(&world, origin, &mut position, DIMENSIONS));
        assert!(position.x + DIMENSIONS.x < 0.5, "inside the x wall: {:?}", position);
        assert!(position.z + DIMENSIONS.z < 0.5, "inside the z wall: {:?}", position);
        assert!((position.x - 0.16).abs() < 1e-5, "{:?}", position);
        assert!((position.z - 0.16).abs() < 1e-5, "{:?}", position);
        assert_eq!(position.y, origin.y);

        // With a single wall the player keeps sliding into where the other one stood.
        let world = world_with(&[(0, 10, 1)]);
        let mut position = Point3::new(0.25, 10.0, 0.25);
        assert!(horizontal_hit_test(&world, origin, &mut position, DIMENSIONS));
        assert!((position.x - 0.25).abs() < 1e-5, "{:?}", position);
        assert!(position.z + DIMENSIONS.z < 0.5, "{:?}", position);
    }

    #[test]
    fn free_movement_is_untouched() {
        let world = World::new();
        let origin = Point3::new(0.0, 10.0, 0.0);
        let mut position = Point3::new(0.2, 10.0, 0.2);
        assert!(!horizontal_hit_test(&world, origin, &mut position, DIMENSIONS));
        assert_eq!(position, Point3::new(0.2, 10.0, 0.2));
    }
}
