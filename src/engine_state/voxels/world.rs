//! # World Module
//!
//! This module provides the [`BlockAccess`] trait through which the player core reads and
//! edits the voxel grid, and `World`, the chunked grid used by the engine.
//!
//! ## Architecture
//!
//! The world uses a sparse storage approach where only generated or modified chunks are
//! kept in memory. Cells in chunks that were never loaded, and cells outside the vertical
//! range, read as air, so callers never special-case bounds.
//!
//! ## Chunk Generation
//!
//! Two terrain generation strategies are supported:
//! - `flat`: stone with a grass surface at a fixed height
//! - `terrain`: a Perlin noise height field with a water table and scattered plants

use std::collections::{HashMap, HashSet};

use cgmath::Point3;
use log::{debug, info, warn};
use noise::Perlin;

use super::block::{block_type::BlockType, Block, BlockTypeSize};
use super::chunk::{Chunk, CHUNK_DIMENSION};

/// Number of chunk layers stacked vertically. Block y spans `0..WORLD_HEIGHT`.
pub const WORLD_HEIGHT_IN_CHUNKS: i32 = 8;
/// Height of the world in blocks.
pub const WORLD_HEIGHT: i32 = WORLD_HEIGHT_IN_CHUNKS * CHUNK_DIMENSION;

/// Read/write access to a voxel grid, as consumed by the player core.
///
/// Implementations must return a well-defined type (usually air) for any coordinate,
/// including ones outside the stored world.
pub trait BlockAccess {
    /// Returns the id of the block type at the given voxel coordinate.
    fn block_type_at(&self, position: Point3<i32>) -> BlockTypeSize;

    /// Writes a block. `notify_neighbors` asks the grid to refresh anything derived from
    /// neighboring cells; `is_removal` allows overwriting non-penetrable blocks.
    fn set_block_at(
        &mut self,
        position: Point3<i32>,
        block_type: BlockTypeSize,
        notify_neighbors: bool,
        is_removal: bool,
    );

    /// Returns the y coordinate of the highest solid block in the given column.
    fn max_terrain_height_at(&self, x: i32, z: i32) -> i32;
}

/// Represents a voxel world composed of multiple chunks.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_player::engine_state::voxels::world::{BlockAccess, World};
///
/// let world = World::flat(1, 10);
/// assert_eq!(world.max_terrain_height_at(0, 0), 10);
/// ```
pub struct World {
    /// A mapping from chunk coordinates to chunk data.
    pub chunks: HashMap<Point3<i32>, Chunk>,
    /// Chunks whose contents changed since the last call to [`World::take_dirty_chunks`].
    dirty_chunks: HashSet<Point3<i32>>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Creates a new, empty world.
    pub fn new() -> Self {
        World {
            chunks: HashMap::new(),
            dirty_chunks: HashSet::new(),
        }
    }

    /// Creates a world of flat terrain spanning `radius` chunks around the origin in x/z,
    /// with grass at `ground_height`.
    pub fn flat(radius: i32, ground_height: i32) -> Self {
        let mut world = Self::new();
        world.generate(radius, |position| Chunk::flat(position, ground_height));
        info!("Generated flat world (radius {}, ground {})", radius, ground_height);
        world
    }

    /// Creates a world of Perlin terrain spanning `radius` chunks around the origin in x/z.
    pub fn terrain(radius: i32, seed: u32) -> Self {
        let perlin = Perlin::new(seed);
        let mut rng = fastrand::Rng::with_seed(seed as u64);
        let mut world = Self::new();
        world.generate(radius, |position| Chunk::terrain(position, &perlin, &mut rng));
        info!("Generated terrain world (radius {}, seed {})", radius, seed);
        world
    }

    fn generate<F: FnMut(&Point3<i32>) -> Chunk>(&mut self, radius: i32, mut generator: F) {
        for x in -radius..radius {
            for z in -radius..radius {
                for y in 0..WORLD_HEIGHT_IN_CHUNKS {
                    let position = Point3::new(x, y, z);
                    self.chunks.insert(position, generator(&position));
                }
            }
        }
    }

    /// Retrieves a reference to the chunk at the specified chunk coordinates.
    pub fn get_chunk_at(&self, pos: Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    /// Returns and clears the set of chunks modified since the last call.
    pub fn take_dirty_chunks(&mut self) -> HashSet<Point3<i32>> {
        std::mem::take(&mut self.dirty_chunks)
    }

    /// Splits a block coordinate into its chunk coordinate and chunk-relative coordinate.
    fn split(position: Point3<i32>) -> (Point3<i32>, Point3<i32>) {
        (
            Point3::new(
                position.x.div_euclid(CHUNK_DIMENSION),
                position.y.div_euclid(CHUNK_DIMENSION),
                position.z.div_euclid(CHUNK_DIMENSION),
            ),
            Point3::new(
                position.x.rem_euclid(CHUNK_DIMENSION),
                position.y.rem_euclid(CHUNK_DIMENSION),
                position.z.rem_euclid(CHUNK_DIMENSION),
            ),
        )
    }

    fn mark_dirty(&mut self, chunk_position: Point3<i32>, local: Point3<i32>, notify: bool) {
        self.dirty_chunks.insert(chunk_position);
        if !notify {
            return;
        }

        let last = CHUNK_DIMENSION - 1;
        let mut neighbor = |dx: i32, dy: i32, dz: i32| {
            let n = Point3::new(
                chunk_position.x + dx,
                chunk_position.y + dy,
                chunk_position.z + dz,
            );
            if self.chunks.contains_key(&n) {
                self.dirty_chunks.insert(n);
            }
        };
        if local.x == 0 {
            neighbor(-1, 0, 0);
        }
        if local.x == last {
            neighbor(1, 0, 0);
        }
        if local.y == 0 {
            neighbor(0, -1, 0);
        }
        if local.y == last {
            neighbor(0, 1, 0);
        }
        if local.z == 0 {
            neighbor(0, 0, -1);
        }
        if local.z == last {
            neighbor(0, 0, 1);
        }
    }
}

impl BlockAccess for World {
    fn block_type_at(&self, position: Point3<i32>) -> BlockTypeSize {
        if !(0..WORLD_HEIGHT).contains(&position.y) {
            return BlockType::AIR.id();
        }
        let (chunk_position, local) = Self::split(position);
        self.chunks
            .get(&chunk_position)
            .map(|chunk| chunk.get_block_at(local.x, local.y, local.z).block_type)
            .unwrap_or(BlockType::AIR.id())
    }

    fn set_block_at(
        &mut self,
        position: Point3<i32>,
        block_type: BlockTypeSize,
        notify_neighbors: bool,
        is_removal: bool,
    ) {
        if !(0..WORLD_HEIGHT).contains(&position.y) {
            warn!("Ignoring block write outside the world at {:?}", position);
            return;
        }

        let (chunk_position, local) = Self::split(position);
        let chunk = self
            .chunks
            .entry(chunk_position)
            .or_insert_with(|| Chunk::empty(&chunk_position));

        let current = chunk.get_block_at(local.x, local.y, local.z);
        if !is_removal && current.is_solid() {
            debug!(
                "Block at {:?} is occupied by type {}, not overwriting",
                position, current.block_type
            );
            return;
        }

        chunk.set_block_at(local.x, local.y, local.z, Block { block_type });
        self.mark_dirty(chunk_position, local, notify_neighbors);
        info!(
            "Block at {:?} set to {:?}",
            position,
            BlockType::get_block_type_from_int(block_type)
        );
    }

    fn max_terrain_height_at(&self, x: i32, z: i32) -> i32 {
        for chunk_y in (0..WORLD_HEIGHT_IN_CHUNKS).rev() {
            let (chunk_position, local) = Self::split(Point3::new(x, chunk_y * CHUNK_DIMENSION, z));
            let Some(chunk) = self.chunks.get(&chunk_position) else {
                continue;
            };
            if let Some(cy) = chunk.highest_solid_in_column(local.x, local.z) {
                return chunk_y * CHUNK_DIMENSION + cy;
            }
        }
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unloaded_and_out_of_range_cells_read_as_air() {
        let world = World::flat(1, 10);
        let air = BlockType::AIR.id();
        assert_eq!(world.block_type_at(Point3::new(500, 5, 500)), air);
        assert_eq!(world.block_type_at(Point3::new(0, -1, 0)), air);
        assert_eq!(world.block_type_at(Point3::new(0, WORLD_HEIGHT, 0)), air);
    }

    #[test]
    fn negative_coordinates_map_to_the_right_chunk() {
        let mut world = World::new();
        let position = Point3::new(-1, 3, -17);
        world.set_block_at(position, BlockType::WOOD.id(), false, false);
        assert_eq!(world.block_type_at(position), BlockType::WOOD.id());
        assert!(world.get_chunk_at(Point3::new(-1, 0, -2)).is_some());
    }

    #[test]
    fn placement_does_not_overwrite_solid_blocks() {
        let mut world = World::flat(1, 10);
        let ground = Point3::new(0, 10, 0);
        world.set_block_at(ground, BlockType::WOOD.id(), true, false);
        assert_eq!(world.block_type_at(ground), BlockType::GRASS.id());

        world.set_block_at(ground, BlockType::AIR.id(), true, true);
        assert_eq!(world.block_type_at(ground), BlockType::AIR.id());
    }

    #[test]
    fn notify_marks_neighboring_chunks_dirty() {
        let mut world = World::flat(1, 10);
        world.take_dirty_chunks();

        world.set_block_at(Point3::new(0, 11, 5), BlockType::DIRT.id(), true, false);
        let dirty = world.take_dirty_chunks();
        assert!(dirty.contains(&Point3::new(0, 0, 0)));
        assert!(dirty.contains(&Point3::new(-1, 0, 0)));
        assert!(world.take_dirty_chunks().is_empty());
    }

    #[test]
    fn max_terrain_height_tracks_edits() {
        let mut world = World::flat(1, 10);
        assert_eq!(world.max_terrain_height_at(3, 3), 10);
        world.set_block_at(Point3::new(3, 40, 3), BlockType::STONE.id(), false, false);
        assert_eq!(world.max_terrain_height_at(3, 3), 40);
        assert_eq!(world.max_terrain_height_at(1000, 1000), 0);
    }
}
