//! # Voxels
//!
//! This module contains the voxel data the player moves through: block types and their
//! capability flags, chunked block storage with terrain generators, and the
//! [`BlockAccess`](world::BlockAccess) seam through which the player core reads and edits
//! the grid.
//!
//! ## Architecture
//!
//! * **Block**: block types, per-type properties and the unit volume of a block
//! * **Chunk**: fixed-size 3D arrays of blocks
//! * **World**: coordinates chunks and implements `BlockAccess`
//!
//! The player never holds on to the world. Every operation that needs it takes `&W` (or
//! `&mut W` for edits), so tests can substitute any grid implementing the trait.

pub mod block;
pub mod chunk;
pub mod world;
