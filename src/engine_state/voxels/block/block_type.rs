//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! It provides functionality for block type identification and conversion between
//! the compact storage id and the rich enum type.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::{BlockProperties, BlockTypeSize, BLOCK_PROPERTIES};

/// The number of distinct block types. Selected block ids cycle over `0..BLOCK_COUNT`.
pub const BLOCK_COUNT: BlockTypeSize = 10;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminants are the ids stored in chunks and passed through
/// [`BlockAccess`](crate::engine_state::voxels::world::BlockAccess). The `FromPrimitive`
/// derive allows conversion back from those ids.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// An air block, which is non-solid and transparent.
    AIR = 0,

    /// A grass block. Generated as the top layer of terrain.
    GRASS = 1,

    /// A basic dirt block, used as a common building material.
    DIRT = 2,

    /// Stone, found below the dirt layer.
    STONE = 3,

    /// Water. Penetrable, and the only type that makes the player swim.
    WATER = 4,

    /// A wooden block with a bark texture on all sides.
    WOOD = 5,

    /// Tree leaves.
    LEAVES = 6,

    /// Sand, generated around the water table.
    SAND = 7,

    /// A small decorative flower. The player walks through it but can still target it.
    RED_FLOWER = 8,

    /// Tall grass. Behaves like [`BlockType::RED_FLOWER`].
    TALL_GRASS = 9,
}

impl BlockType {
    /// Converts a `BlockTypeSize` to a `BlockType`.
    ///
    /// Unknown ids resolve to [`BlockType::AIR`].
    pub fn get_block_type_from_int(btype: BlockTypeSize) -> Self {
        BlockType::from_u8(btype).unwrap_or(BlockType::AIR)
    }

    /// Returns the static capability flags of this type.
    pub fn properties(self) -> &'static BlockProperties {
        &BLOCK_PROPERTIES[self as usize]
    }

    /// Returns the compact id of this type.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }

    /// Picks a random decoration that can grow on grass, using the given generator.
    pub fn random_plant(rng: &mut fastrand::Rng) -> Self {
        if rng.bool() {
            BlockType::RED_FLOWER
        } else {
            BlockType::TALL_GRASS
        }
    }
}
