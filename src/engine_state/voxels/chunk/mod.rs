//! # Chunk Module
//!
//! This module provides the `Chunk` struct and related functionality for managing
//! 16x16x16 blocks of voxel data, along with the terrain generators used to fill them.
//!
//! ## Storage
//!
//! Chunks keep two parallel structures:
//! - `blocks`: one `Block` per cell, in x-fastest, then z, then y order
//! - `solid_array`: a bit vector (1 bit per block) indicating which blocks are solid
//!
//! The bit vector gives O(1) solidity checks for column scans without decoding block ids.

use bitvec::prelude::BitVec;
use cgmath::Point3;
use noise::{NoiseFn, Perlin};

use super::block::block_type::BlockType;
use super::block::Block;

/// The dimension (width, height, depth) of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;
/// The number of blocks in a single 2D plane of a chunk (CHUNK_DIMENSION²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_DIMENSION * CHUNK_DIMENSION;
/// The total number of blocks in a chunk (CHUNK_DIMENSION³).
pub const CHUNK_SIZE: i32 = CHUNK_PLANE_SIZE * CHUNK_DIMENSION;

/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;
/// Terrain height around which the Perlin surface oscillates.
pub const TERRAIN_BASE_HEIGHT: f64 = 48.0;
/// Amplitude of the Perlin surface in blocks.
pub const TERRAIN_AMPLITUDE: f64 = 16.0;
/// Every air cell at or below this height is filled with water.
pub const WATER_LEVEL: i32 = 44;
/// Probability that a grass column grows a plant on top.
pub const PLANT_PROBABILITY: f32 = 0.02;

/// Represents a 16x16x16 collection of voxel blocks in the world.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,

    /// One bit per block, set when the block is solid.
    pub solid_array: BitVec,

    /// The block data for this chunk, including air.
    pub blocks: Vec<Block>,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    pub fn empty(position: &Point3<i32>) -> Self {
        Chunk {
            position: *position,
            solid_array: BitVec::repeat(false, CHUNK_SIZE as usize),
            blocks: vec![bytemuck::Zeroable::zeroed(); CHUNK_SIZE as usize],
        }
    }

    /// Creates a chunk of flat terrain: stone up to `ground_height - 1` and grass at
    /// `ground_height`, both in world block coordinates.
    pub fn flat(position: &Point3<i32>, ground_height: i32) -> Self {
        let mut chunk = Self::empty(position);
        for j in 0..CHUNK_DIMENSION {
            let world_y = j + CHUNK_DIMENSION * position.y;
            let block_type = if world_y < ground_height {
                BlockType::STONE
            } else if world_y == ground_height {
                BlockType::GRASS
            } else {
                continue;
            };
            for k in 0..CHUNK_DIMENSION {
                for i in 0..CHUNK_DIMENSION {
                    chunk.set_block_at(i, j, k, Block::new(block_type));
                }
            }
        }
        chunk
    }

    /// Generates a chunk of terrain from a 2D Perlin height field.
    ///
    /// Columns are stone, topped with three layers of dirt and a grass surface (sand near
    /// the water line). Air at or below [`WATER_LEVEL`] becomes water, and grass above the
    /// water occasionally carries a plant drawn from `rng`.
    pub fn terrain(position: &Point3<i32>, perlin: &Perlin, rng: &mut fastrand::Rng) -> Self {
        let mut chunk = Self::empty(position);

        for k in 0..CHUNK_DIMENSION {
            for i in 0..CHUNK_DIMENSION {
                let world_x = i + CHUNK_DIMENSION * position.x;
                let world_z = k + CHUNK_DIMENSION * position.z;
                let height = Self::terrain_height(perlin, world_x, world_z);
                let grows_plant = rng.f32() < PLANT_PROBABILITY;

                for j in 0..CHUNK_DIMENSION {
                    let world_y = j + CHUNK_DIMENSION * position.y;
                    let block_type = if world_y < height - 3 {
                        BlockType::STONE
                    } else if world_y < height {
                        BlockType::DIRT
                    } else if world_y == height && height <= WATER_LEVEL + 1 {
                        BlockType::SAND
                    } else if world_y == height {
                        BlockType::GRASS
                    } else if world_y <= WATER_LEVEL {
                        BlockType::WATER
                    } else if world_y == height + 1 && height > WATER_LEVEL + 1 && grows_plant {
                        BlockType::random_plant(rng)
                    } else {
                        continue;
                    };
                    chunk.set_block_at(i, j, k, Block::new(block_type));
                }
            }
        }

        chunk
    }

    /// Surface height of the Perlin terrain at the given world column.
    pub fn terrain_height(perlin: &Perlin, world_x: i32, world_z: i32) -> i32 {
        let sample = perlin.get([
            world_x as f64 * PERLIN_SCALE_FACTOR,
            world_z as f64 * PERLIN_SCALE_FACTOR,
        ]);
        (TERRAIN_BASE_HEIGHT + sample * TERRAIN_AMPLITUDE).floor() as i32
    }

    fn index(cx: i32, cy: i32, cz: i32) -> usize {
        (cx + CHUNK_DIMENSION * cz + CHUNK_PLANE_SIZE * cy) as usize
    }

    /// Gets the block at the specified chunk-relative coordinates.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds.
    pub fn get_block_at(&self, cx: i32, cy: i32, cz: i32) -> Block {
        self.blocks[Self::index(cx, cy, cz)]
    }

    /// Replaces the block at the specified chunk-relative coordinates, keeping the solid
    /// array in sync.
    pub fn set_block_at(&mut self, cx: i32, cy: i32, cz: i32, block: Block) {
        let index = Self::index(cx, cy, cz);
        self.blocks[index] = block;
        self.solid_array.set(index, block.is_solid());
    }

    /// Checks if the block at the specified chunk-relative coordinates is solid.
    pub fn is_block_solid(&self, cx: i32, cy: i32, cz: i32) -> bool {
        self.solid_array[Self::index(cx, cy, cz)]
    }

    /// Returns the highest chunk-relative y holding a solid block in the given column.
    pub fn highest_solid_in_column(&self, cx: i32, cz: i32) -> Option<i32> {
        (0..CHUNK_DIMENSION)
            .rev()
            .find(|&cy| self.is_block_solid(cx, cy, cz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chunk_has_no_solid_blocks() {
        let chunk = Chunk::empty(&Point3::new(0, 0, 0));
        assert!(chunk.solid_array.not_any());
        assert_eq!(chunk.get_block_at(3, 4, 5), Block::new(BlockType::AIR));
    }

    #[test]
    fn set_block_keeps_solid_array_in_sync() {
        let mut chunk = Chunk::empty(&Point3::new(0, 0, 0));
        chunk.set_block_at(1, 2, 3, Block::new(BlockType::STONE));
        assert!(chunk.is_block_solid(1, 2, 3));

        chunk.set_block_at(1, 2, 3, Block::new(BlockType::WATER));
        assert!(!chunk.is_block_solid(1, 2, 3));
        assert_eq!(chunk.get_block_at(1, 2, 3), Block::new(BlockType::WATER));
    }

    #[test]
    fn flat_chunk_is_grass_over_stone() {
        let chunk = Chunk::flat(&Point3::new(0, 0, 0), 5);
        assert_eq!(chunk.get_block_at(0, 5, 0), Block::new(BlockType::GRASS));
        assert_eq!(chunk.get_block_at(0, 4, 0), Block::new(BlockType::STONE));
        assert_eq!(chunk.get_block_at(0, 6, 0), Block::new(BlockType::AIR));
        assert_eq!(chunk.highest_solid_in_column(7, 9), Some(5));
    }

    #[test]
    fn terrain_fills_below_the_water_level() {
        let perlin = Perlin::new(0);
        let mut rng = fastrand::Rng::with_seed(7);
        let chunk = Chunk::terrain(&Point3::new(0, 2, 0), &perlin, &mut rng);
        for k in 0..CHUNK_DIMENSION {
            for i in 0..CHUNK_DIMENSION {
                let cy = WATER_LEVEL - 2 * CHUNK_DIMENSION;
                let block = chunk.get_block_at(i, cy, k);
                assert_ne!(block, Block::new(BlockType::AIR));
            }
        }
    }

    #[test]
    fn plants_only_grow_on_grass() {
        let perlin = Perlin::new(3);
        let mut rng = fastrand::Rng::with_seed(11);
        let mut plants = 0;

        for cx in -4..4 {
            for cz in -4..4 {
                for cy in 2..=3 {
                    let chunk = Chunk::terrain(&Point3::new(cx, cy, cz), &perlin, &mut rng);
                    for k in 0..CHUNK_DIMENSION {
                        for j in 1..CHUNK_DIMENSION {
                            for i in 0..CHUNK_DIMENSION {
                                let block = chunk.get_block_at(i, j, k);
                                if block == Block::new(BlockType::RED_FLOWER)
                                    || block == Block::new(BlockType::TALL_GRASS)
                                {
                                    plants += 1;
                                    assert_eq!(
                                        chunk.get_block_at(i, j - 1, k),
                                        Block::new(BlockType::GRASS)
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }
        assert!(plants > 0);
    }
}
