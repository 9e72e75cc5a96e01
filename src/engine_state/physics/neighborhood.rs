//! Distance-ordered enumeration of the voxels around a point.

use std::cmp::Ordering;

use cgmath::{InnerSpace, Point3};

/// Number of voxels in the 3x3x3 neighborhood.
pub const NEIGHBORHOOD_SIZE: usize = 27;

/// A voxel coordinate tagged with the continuous point it was gathered around.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BlockPosition {
    /// The voxel coordinate.
    pub position: Point3<i32>,
    /// The point this voxel is ranked against.
    pub origin: Point3<f32>,
}

impl BlockPosition {
    /// Creates a new block position ranked against `origin`.
    pub fn new(position: Point3<i32>, origin: Point3<f32>) -> Self {
        Self { position, origin }
    }

    /// Squared distance between the voxel center and the origin.
    pub fn distance_squared(&self) -> f32 {
        let center = Point3::new(
            self.position.x as f32,
            self.position.y as f32,
            self.position.z as f32,
        );
        (center - self.origin).magnitude2()
    }

    /// Orders by distance to the origin, nearest first.
    pub fn cmp_by_distance(&self, other: &Self) -> Ordering {
        self.distance_squared().total_cmp(&other.distance_squared())
    }
}

/// Returns the voxel containing `point`. Blocks are centered on integer coordinates.
pub fn voxel_containing(point: Point3<f32>) -> Point3<i32> {
    Point3::new(
        (point.x + 0.5).floor() as i32,
        (point.y + 0.5).floor() as i32,
        (point.z + 0.5).floor() as i32,
    )
}

/// Gathers the 27 voxels around `origin`, sorted nearest first.
///
/// The sort is stable, so voxels at equal distance keep their x, z, y insertion order and
/// the result is identical for identical inputs.
pub fn gather_adjacent_block_positions(origin: Point3<f32>) -> [BlockPosition; NEIGHBORHOOD_SIZE] {
    let center = voxel_containing(origin);
    let mut positions = [BlockPosition::new(center, origin); NEIGHBORHOOD_SIZE];

    let mut index = 0;
    for x in -1..=1 {
        for z in -1..=1 {
            for y in -1..=1 {
                positions[index] = BlockPosition::new(
                    Point3::new(center.x + x, center.y + y, center.z + z),
                    origin,
                );
                index += 1;
            }
        }
    }

    positions.sort_by(BlockPosition::cmp_by_distance);
    positions
}
