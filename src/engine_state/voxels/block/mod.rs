//! # Block Module
//!
//! This module provides the core block-related functionality for the player core.
//! It includes block type definitions, block face handling, the static per-type
//! capability table and the unit volume occupied by a block.

use block_type::{BlockType, BLOCK_COUNT};
use cgmath::{Point3, Vector3};

use crate::engine_state::physics::aabb::Aabb;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
/// This is used for efficient storage of block data in chunks.
pub type BlockTypeSize = u8;

/// Static capability flags of a block type.
///
/// These flags are all the collision, selection and submersion code ever asks about a
/// block; the rest of the block's behavior lives with the renderer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockProperties {
    /// The player's body passes through blocks of this type.
    pub is_penetrable: bool,
    /// Overlapping this type makes the player swim.
    pub is_water: bool,
    /// The selection ray ignores blocks of this type.
    pub lets_selection_ray_through: bool,
    /// New blocks may be placed against a targeted block of this type.
    pub player_can_attach_blocks: bool,
    /// A targeted block of this type gets a bounding box drawn around it.
    pub should_render_bounding_box: bool,
}

const SOLID: BlockProperties = BlockProperties {
    is_penetrable: false,
    is_water: false,
    lets_selection_ray_through: false,
    player_can_attach_blocks: true,
    should_render_bounding_box: true,
};

const PLANT: BlockProperties = BlockProperties {
    is_penetrable: true,
    is_water: false,
    lets_selection_ray_through: false,
    player_can_attach_blocks: false,
    should_render_bounding_box: true,
};

/// Maps each block type to its capability flags.
///
/// Indexed by `BlockType` as a `usize`.
pub static BLOCK_PROPERTIES: [BlockProperties; BLOCK_COUNT as usize] = [
    // AIR
    BlockProperties {
        is_penetrable: true,
        is_water: false,
        lets_selection_ray_through: true,
        player_can_attach_blocks: false,
        should_render_bounding_box: false,
    },
    SOLID, // GRASS
    SOLID, // DIRT
    SOLID, // STONE
    // WATER
    BlockProperties {
        is_penetrable: true,
        is_water: true,
        lets_selection_ray_through: true,
        player_can_attach_blocks: false,
        should_render_bounding_box: false,
    },
    SOLID, // WOOD
    SOLID, // LEAVES
    SOLID, // SAND
    PLANT, // RED_FLOWER
    PLANT, // TALL_GRASS
];

/// Represents a single voxel block in the world.
///
/// This is a lightweight structure that stores only the essential block data.
/// The actual block properties are looked up from the block type.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute keeps the layout identical to a bare `BlockTypeSize`, so a
/// zeroed buffer of blocks is a buffer of air.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
}

impl Block {
    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
        }
    }

    /// Gets the capability flags for a block given its type as an integer.
    ///
    /// Ids outside the known range resolve to the flags of air.
    pub fn get_properties_from_int(btype_int: BlockTypeSize) -> &'static BlockProperties {
        BlockType::get_block_type_from_int(btype_int).properties()
    }

    /// Returns true if this block is solid for the purpose of chunk bookkeeping.
    pub fn is_solid(&self) -> bool {
        !Self::get_properties_from_int(self.block_type).is_penetrable
    }
}

/// Half extent of the volume occupied by a block.
pub const BLOCK_HALF_EXTENT: f32 = 0.5;

/// Returns the unit volume occupied by the block at the given voxel coordinate.
///
/// Blocks are centered on their integer coordinate, so the block at `(x, y, z)` spans
/// `[x - 0.5, x + 0.5]` on each axis.
pub fn aabb_for_block_at(position: Point3<i32>) -> Aabb {
    Aabb::new(
        Point3::new(position.x as f32, position.y as f32, position.z as f32),
        Vector3::new(BLOCK_HALF_EXTENT, BLOCK_HALF_EXTENT, BLOCK_HALF_EXTENT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_volume_is_a_unit_cube_centered_on_the_voxel() {
        let aabb = aabb_for_block_at(Point3::new(2, -3, 7));
        assert_eq!(aabb.min(), Point3::new(1.5, -3.5, 6.5));
        assert_eq!(aabb.max(), Point3::new(2.5, -2.5, 7.5));
    }

    #[test]
    fn air_and_water_do_not_stop_the_selection_ray() {
        assert!(BlockType::AIR.properties().lets_selection_ray_through);
        assert!(BlockType::WATER.properties().lets_selection_ray_through);
        assert!(!BlockType::RED_FLOWER.properties().lets_selection_ray_through);
        assert!(!BlockType::STONE.properties().lets_selection_ray_through);
    }

    #[test]
    fn zeroed_block_is_air() {
        let block: Block = bytemuck::Zeroable::zeroed();
        assert_eq!(block, Block::new(BlockType::AIR));
        assert!(!block.is_solid());
    }
}
