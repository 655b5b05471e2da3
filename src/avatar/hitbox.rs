//! Axis-aligned avatar hitbox and voxel collision

use bevy::math::{DVec3, IVec3};

use crate::constants::*;
use crate::terrain::{Cell, TerrainQuery};

/// Tolerance for touching faces
const EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub min: DVec3,
    pub max: DVec3,
}

impl Hitbox {
    /// Standing hitbox with its base centered on `feet`
    pub fn at(feet: DVec3) -> Self {
        Self {
            min: DVec3::new(feet.x - AVATAR_HALF_WIDTH, feet.y, feet.z - AVATAR_HALF_WIDTH),
            max: DVec3::new(feet.x + AVATAR_HALF_WIDTH, feet.y + AVATAR_HEIGHT, feet.z + AVATAR_HALF_WIDTH),
        }
    }

    pub fn offset(&self, delta: DVec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Shrink on X and Z only
    pub fn contract_horizontal(&self, amount: f64) -> Self {
        let shrink = DVec3::new(amount, 0.0, amount);
        Self {
            min: self.min + shrink,
            max: self.max - shrink,
        }
    }

    /// Grow toward `delta` on a single axis
    pub fn stretch(&self, axis: usize, delta: f64) -> Self {
        let mut stretched = *self;
        if delta > 0.0 {
            stretched.max[axis] += delta;
        } else {
            stretched.min[axis] += delta;
        }
        stretched
    }

    /// Solid cells the box reaches into. Faces that only touch a cell
    /// boundary don't count.
    pub fn solid_cells(&self, terrain: &dyn TerrainQuery) -> Vec<Cell> {
        let lo = self.min.floor().as_ivec3();
        let hi = (self.max - DVec3::splat(EPSILON)).floor().as_ivec3();
        let mut cells = Vec::new();
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    let cell = IVec3::new(x, y, z);
                    if terrain.is_solid(cell) {
                        cells.push(cell);
                    }
                }
            }
        }
        cells
    }

    pub fn touches_solid(&self, terrain: &dyn TerrainQuery) -> bool {
        !self.solid_cells(terrain).is_empty()
    }

    /// Clip a move of `delta` along `axis` against solid cells
    pub fn clip_axis(&self, terrain: &dyn TerrainQuery, axis: usize, delta: f64) -> f64 {
        if delta == 0.0 {
            return 0.0;
        }
        let mut allowed = delta;
        for cell in self.stretch(axis, delta).solid_cells(terrain) {
            let cell_min = cell.as_dvec3();
            let overlaps_across = (0..3).filter(|other| *other != axis).all(|other| {
                self.min[other] < cell_min[other] + 1.0 && self.max[other] > cell_min[other]
            });
            if !overlaps_across {
                continue;
            }
            if delta > 0.0 && cell_min[axis] >= self.max[axis] - EPSILON {
                allowed = allowed.min(cell_min[axis] - self.max[axis]);
            } else if delta < 0.0 && cell_min[axis] + 1.0 <= self.min[axis] + EPSILON {
                allowed = allowed.max(cell_min[axis] + 1.0 - self.min[axis]);
            }
        }
        allowed
    }
}
