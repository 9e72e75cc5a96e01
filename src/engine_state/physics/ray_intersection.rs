//! Ray/block intersection and selection of the targeted block.
//!
//! The selector scans every cell of a fixed cube around the player instead of marching
//! the ray, so the globally nearest solid face wins regardless of how occluders are
//! arranged.

use std::cmp::Ordering;
use std::fmt;

use cgmath::{InnerSpace, Point3, Vector3};

use crate::engine_state::voxels::block::{
    aabb_for_block_at, block_side::BlockSide, Block,
};
use crate::engine_state::voxels::world::BlockAccess;

/// Cells scanned in each direction around the player's voxel.
pub const SELECTION_RADIUS: i32 = 3;

/// Rays closer than this to parallel with a face plane never hit it.
const PARALLEL_EPSILON: f32 = 1e-6;
/// Slack allowed when testing whether a plane hit lies within the face.
const FACE_EPSILON: f32 = 1e-4;

/// A hit of the selection ray on one face of a block.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    /// The struck block.
    pub block_position: Point3<i32>,
    /// The struck face.
    pub side: BlockSide,
    /// Distance along the (unit) ray direction.
    pub distance: f32,
    /// Where the ray meets the face.
    pub intersect_point: Point3<f32>,
}

impl Intersection {
    /// The cell just outside the struck face, where a placed block goes.
    pub fn calc_adjacent_block_pos(&self) -> Point3<i32> {
        self.block_position + self.side.offset()
    }

    /// Total order used to pick the selected block: nearest first, then lowest voxel
    /// coordinate (x, y, z), then face order.
    pub fn cmp_by_distance(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| {
                let a = self.block_position;
                let b = other.block_position;
                (a.x, a.y, a.z).cmp(&(b.x, b.y, b.z))
            })
            .then_with(|| self.side.cmp(&other.side))
    }
}

impl fmt::Display for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[block: ({}, {}, {}) side: {:?} t: {:.2} poi: ({:.2}, {:.2}, {:.2})]",
            self.block_position.x,
            self.block_position.y,
            self.block_position.z,
            self.side,
            self.distance,
            self.intersect_point.x,
            self.intersect_point.y,
            self.intersect_point.z,
        )
    }
}

/// Intersects a ray with every face of the block at `block_position`, appending one record
/// per face hit at a non-negative distance. Both the entry and the exit face are reported.
pub fn execute_intersection(
    block_position: Point3<i32>,
    ray_origin: Point3<f32>,
    ray_direction: Vector3<f32>,
    out: &mut Vec<Intersection>,
) {
    let aabb = aabb_for_block_at(block_position);
    let (min, max) = (aabb.min(), aabb.max());

    for side in BlockSide::all() {
        let normal = side.normal();
        let denominator = ray_direction.dot(normal);
        if denominator.abs() < PARALLEL_EPSILON {
            continue;
        }

        let face_center = aabb.center_point_for_normal(normal);
        let distance = (face_center - ray_origin).dot(normal) / denominator;
        if distance < 0.0 {
            continue;
        }

        let point = ray_origin + ray_direction * distance;
        let within = |v: f32, lo: f32, hi: f32| v >= lo - FACE_EPSILON && v <= hi + FACE_EPSILON;
        if within(point.x, min.x, max.x) && within(point.y, min.y, max.y) && within(point.z, min.z, max.z)
        {
            out.push(Intersection {
                block_position,
                side,
                distance,
                intersect_point: point,
            });
        }
    }
}

/// Finds the block the player is aiming at.
///
/// The candidate buffer is kept between queries so that steady-state selection does not
/// allocate.
#[derive(Debug, Default)]
pub struct RayBlockSelector {
    intersections: Vec<Intersection>,
}

impl RayBlockSelector {
    /// Creates a selector with room for a typical query.
    pub fn new() -> Self {
        Self {
            intersections: Vec::with_capacity(64),
        }
    }

    /// Casts a ray from `eye` along `direction` through the cube of cells around `center`
    /// and returns the nearest hit on a block that stops the selection ray.
    pub fn select<W: BlockAccess>(
        &mut self,
        world: &W,
        center: Point3<i32>,
        eye: Point3<f32>,
        direction: Vector3<f32>,
    ) -> Option<Intersection> {
        self.intersections.clear();

        for x in -SELECTION_RADIUS..=SELECTION_RADIUS {
            for y in -SELECTION_RADIUS..=SELECTION_RADIUS {
                for z in -SELECTION_RADIUS..=SELECTION_RADIUS {
                    let block_position = Point3::new(center.x + x, center.y + y, center.z + z);
                    let block_type = world.block_type_at(block_position);

                    if Block::get_properties_from_int(block_type).lets_selection_ray_through {
                        continue;
                    }

                    execute_intersection(block_position, eye, direction, &mut self.intersections);
                }
            }
        }

        self.intersections.sort_by(Intersection::cmp_by_distance);
        self.intersections.first().copied()
    }
}
