//! # Physics
//!
//! Geometry and contact handling for a single axis-aligned player box moving through
//! static unit-cube blocks.
//!
//! ## Key Components
//!
//! * `aabb` - The bounding box primitive and its queries
//! * `neighborhood` - The 27 voxels around a point, nearest first
//! * `collision` - Vertical snapping and horizontal sliding against solid blocks
//! * `submersion` - Swimming and head-under-water detection
//! * `ray_intersection` - Ray/face hits and selection of the targeted block
//!
//! Everything here is pure with respect to the world: blocks are only read through
//! [`BlockAccess`](crate::engine_state::voxels::world::BlockAccess).

pub mod aabb;
pub mod collision;
pub mod neighborhood;
pub mod ray_intersection;
pub mod submersion;
