//! Terrain module - voxel queries consumed by the jump pipeline
//!
//! The pipeline never owns a world. It reads one through [`TerrainQuery`],
//! which the host game implements over its own block store. [`VoxelGrid`]
//! is the in-memory implementation used by the simulator and tests.

pub mod classifier;
pub mod grid;

use bevy::math::{DVec3, IVec3};

pub use classifier::{is_climbable, is_standable, is_standable_within_buffer};
pub use grid::{Voxel, VoxelGrid};

/// Integer voxel coordinate
pub type Cell = IVec3;
/// Continuous world position (feet level for avatar positions)
pub type Point = DVec3;

/// Read-only view of the voxel world
pub trait TerrainQuery {
    /// Full collision block
    fn is_solid(&self, cell: Cell) -> bool;
    /// Ladder-like block the avatar can climb
    fn is_climbable(&self, cell: Cell) -> bool;
    /// Space the avatar's body can occupy
    fn is_passable(&self, cell: Cell) -> bool {
        !self.is_solid(cell)
    }
    /// Lowest and highest buildable levels
    fn world_height_bounds(&self) -> (i32, i32);
}
