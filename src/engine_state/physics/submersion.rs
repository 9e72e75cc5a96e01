//! Detection of water around the player.

use cgmath::{Point3, Vector3};

use super::aabb::Aabb;
use super::neighborhood::gather_adjacent_block_positions;
use crate::engine_state::voxels::block::{aabb_for_block_at, Block};
use crate::engine_state::voxels::world::BlockAccess;

/// How far ahead of the eye the head-under-water probe sits, matching the near plane.
pub const NEAR_PLANE_DISTANCE: f32 = 0.1;

/// Immersion flags, recomputed from scratch every tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmersionState {
    /// The player's box overlaps a water block.
    pub swimming: bool,
    /// The point just in front of the eye lies inside a water block.
    pub head_under_water: bool,
}

/// Scans the neighborhood of `position` for water overlapping the player's box or
/// containing the eye probe.
pub fn detect_submersion<W: BlockAccess>(
    world: &W,
    position: Point3<f32>,
    dimensions: Vector3<f32>,
    eye_position: Point3<f32>,
    viewing_direction: Vector3<f32>,
) -> SubmersionState {
    let player_aabb = Aabb::new(position, dimensions);
    let probe = eye_position + viewing_direction * NEAR_PLANE_DISTANCE;
    let mut state = SubmersionState::default();

    for block_position in gather_adjacent_block_positions(position) {
        let p = block_position.position;
        if !Block::get_properties_from_int(world.block_type_at(p)).is_water {
            continue;
        }

        let block_aabb = aabb_for_block_at(p);
        state.swimming |= player_aabb.overlaps(&block_aabb);
        state.head_under_water |= block_aabb.contains(probe);
    }

    state
}
