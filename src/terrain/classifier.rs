//! Standability predicates over a [`TerrainQuery`]
//!
//! Pure functions, no caching. Terrain is assumed static for the duration of
//! one planning cycle, so callers may memoize if they need to.

use bevy::math::{DVec3, IVec3};

use super::{Cell, TerrainQuery};
use crate::constants::STANDABLE_BUFFER_STEP;
use crate::helpers::{cell_center, cell_of};

/// A cell the avatar can rest in: solid support below with passable space for
/// feet and head, or a climbable cell with headroom.
pub fn is_standable(terrain: &dyn TerrainQuery, cell: Cell) -> bool {
    let supported = terrain.is_solid(cell - IVec3::Y)
        && terrain.is_passable(cell)
        && terrain.is_passable(cell + IVec3::Y);
    supported || is_climbable(terrain, cell)
}

/// A climbable block with passable space above it
pub fn is_climbable(terrain: &dyn TerrainQuery, cell: Cell) -> bool {
    terrain.is_climbable(cell) && terrain.is_passable(cell + IVec3::Y)
}

/// Standability with horizontal slack: true if any X/Z offset within
/// `±buffer` of the cell center lands in a standable cell.
pub fn is_standable_within_buffer(terrain: &dyn TerrainQuery, cell: Cell, buffer: f64) -> bool {
    if is_climbable(terrain, cell) {
        return true;
    }
    let center = cell_center(cell);
    let samples = ((2.0 * buffer) / STANDABLE_BUFFER_STEP).round().max(0.0) as i32;
    for i in 0..=samples {
        let ox = -buffer + i as f64 * STANDABLE_BUFFER_STEP;
        for j in 0..=samples {
            let oz = -buffer + j as f64 * STANDABLE_BUFFER_STEP;
            let probe = cell_of(center + DVec3::new(ox, 0.0, oz));
            if is_standable(terrain, probe) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{Voxel, VoxelGrid};

    fn platform() -> VoxelGrid {
        let mut grid = VoxelGrid::new(0, 32);
        grid.fill(IVec3::new(-2, 0, -2), IVec3::new(2, 0, 2), Some(Voxel::Solid));
        grid
    }

    #[test]
    fn test_standable_needs_support_and_headroom() {
        let mut grid = platform();
        let cell = IVec3::new(0, 1, 0);
        assert!(is_standable(&grid, cell));
        assert!(!is_standable(&grid, IVec3::new(0, 2, 0)));
        assert!(!is_standable(&grid, IVec3::new(3, 1, 0)));

        grid.set_solid(IVec3::new(0, 2, 0));
        assert!(!is_standable(&grid, cell));
    }

    #[test]
    fn test_climbable_needs_headroom() {
        let mut grid = VoxelGrid::new(0, 32);
        grid.set_climbable(IVec3::new(0, 4, 0));
        assert!(is_climbable(&grid, IVec3::new(0, 4, 0)));
        assert!(is_standable(&grid, IVec3::new(0, 4, 0)));

        grid.set_solid(IVec3::new(0, 5, 0));
        assert!(!is_climbable(&grid, IVec3::new(0, 4, 0)));
        assert!(!is_standable(&grid, IVec3::new(0, 4, 0)));
    }

    #[test]
    fn test_buffer_is_superset_of_standable() {
        let mut grid = platform();
        grid.set_solid(IVec3::new(1, 2, 1));
        grid.set_climbable(IVec3::new(-1, 1, -1));
        for x in -3..=3 {
            for y in 0..=3 {
                for z in -3..=3 {
                    let cell = IVec3::new(x, y, z);
                    if is_standable(&grid, cell) {
                        assert!(
                            is_standable_within_buffer(&grid, cell, 0.3),
                            "buffer check rejected standable cell {:?}",
                            cell
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_buffer_zero_matches_standable() {
        let grid = platform();
        assert!(is_standable_within_buffer(&grid, IVec3::new(2, 1, 2), 0.0));
        assert!(!is_standable_within_buffer(&grid, IVec3::new(3, 1, 2), 0.0));
    }
}
