//! In-memory voxel terrain

use std::collections::HashMap;

use bevy::math::IVec3;
use serde::{Deserialize, Serialize};

use super::{Cell, TerrainQuery};

/// Non-empty voxel kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Voxel {
    Solid,
    Climbable,
}

impl Voxel {
    /// Course text glyph, `None` for empty space
    pub fn from_glyph(glyph: char) -> Option<Option<Voxel>> {
        match glyph {
            '#' => Some(Some(Voxel::Solid)),
            'H' => Some(Some(Voxel::Climbable)),
            '.' | ' ' => Some(None),
            _ => None,
        }
    }
}

/// Sparse voxel terrain. Cells not stored are empty.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    voxels: HashMap<Cell, Voxel>,
    min_y: i32,
    max_y: i32,
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::new(-64, 319)
    }
}

impl VoxelGrid {
    pub fn new(min_y: i32, max_y: i32) -> Self {
        Self {
            voxels: HashMap::new(),
            min_y,
            max_y,
        }
    }

    pub fn get(&self, cell: Cell) -> Option<Voxel> {
        self.voxels.get(&cell).copied()
    }

    pub fn set(&mut self, cell: Cell, voxel: Option<Voxel>) {
        match voxel {
            Some(v) => {
                self.voxels.insert(cell, v);
            }
            None => {
                self.voxels.remove(&cell);
            }
        }
    }

    pub fn set_solid(&mut self, cell: Cell) {
        self.set(cell, Some(Voxel::Solid));
    }

    pub fn set_climbable(&mut self, cell: Cell) {
        self.set(cell, Some(Voxel::Climbable));
    }

    pub fn clear(&mut self, cell: Cell) {
        self.set(cell, None);
    }

    /// Fill the inclusive box spanned by two corners
    pub fn fill(&mut self, a: Cell, b: Cell, voxel: Option<Voxel>) {
        let lo = a.min(b);
        let hi = a.max(b);
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    self.set(IVec3::new(x, y, z), voxel);
                }
            }
        }
    }

    /// Number of non-empty cells
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Iterate over every non-empty cell
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Voxel)> + '_ {
        self.voxels.iter().map(|(c, v)| (*c, *v))
    }
}

impl TerrainQuery for VoxelGrid {
    fn is_solid(&self, cell: Cell) -> bool {
        matches!(self.get(cell), Some(Voxel::Solid))
    }

    fn is_climbable(&self, cell: Cell) -> bool {
        matches!(self.get(cell), Some(Voxel::Climbable))
    }

    fn world_height_bounds(&self) -> (i32, i32) {
        (self.min_y, self.max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_is_inclusive_in_any_order() {
        let mut grid = VoxelGrid::new(0, 16);
        grid.fill(IVec3::new(2, 0, 2), IVec3::new(0, 0, 0), Some(Voxel::Solid));
        assert_eq!(grid.len(), 9);
        assert!(grid.is_solid(IVec3::new(1, 0, 1)));
        assert!(!grid.is_solid(IVec3::new(3, 0, 0)));
    }

    #[test]
    fn test_climbable_is_passable() {
        let mut grid = VoxelGrid::new(0, 16);
        grid.set_climbable(IVec3::new(0, 1, 0));
        assert!(grid.is_climbable(IVec3::new(0, 1, 0)));
        assert!(grid.is_passable(IVec3::new(0, 1, 0)));
        grid.clear(IVec3::new(0, 1, 0));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_glyphs() {
        assert_eq!(Voxel::from_glyph('#'), Some(Some(Voxel::Solid)));
        assert_eq!(Voxel::from_glyph('.'), Some(None));
        assert_eq!(Voxel::from_glyph('?'), None);
    }
}
