//! Terrain footprint templates checked around the launch cell
//!
//! A footprint is a grid of [`FootprintCode`] rows. Row 0 sits on the launch
//! cell's support level with its middle entry directly under the launch cell;
//! later rows step away from the landing. Columns run sideways, perpendicular
//! to the jump's dominant axis.

use bevy::math::IVec3;
use serde::{Deserialize, Serialize};

use crate::terrain::{Cell, TerrainQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FootprintCode {
    Empty,
    Solid,
    Any,
}

impl FootprintCode {
    pub fn matches(self, terrain: &dyn TerrainQuery, cell: Cell) -> bool {
        match self {
            FootprintCode::Empty => !terrain.is_solid(cell),
            FootprintCode::Solid => terrain.is_solid(cell),
            FootprintCode::Any => true,
        }
    }
}

use FootprintCode::{Any, Empty, Solid};

/// Lone launch pillar with nothing directly behind it
pub const TRIPLE_OBSTRUCTION_FOOTPRINT: &[&[FootprintCode]] =
    &[&[Empty, Solid, Empty], &[Any, Empty, Any]];

/// Check a footprint under the launch cell, oriented by the jump direction.
///
/// Diagonal jumps (equal |dx| and |dz|), even widths and ragged rows never
/// match.
pub fn matches_footprint(
    terrain: &dyn TerrainQuery,
    launch: Cell,
    landing: Cell,
    footprint: &[&[FootprintCode]],
) -> bool {
    let Some(width) = footprint.first().map(|row| row.len()) else {
        return false;
    };
    if width % 2 == 0 || footprint.iter().any(|row| row.len() != width) {
        return false;
    }

    let dx = launch.x - landing.x;
    let dz = launch.z - landing.z;
    let (px, pz) = if dx.abs() > dz.abs() {
        (dx.signum(), 0)
    } else if dz.abs() > dx.abs() {
        (0, dz.signum())
    } else {
        return false;
    };

    let half = (width / 2) as i32;
    let y = launch.y - 1;
    footprint.iter().enumerate().all(|(i, row)| {
        row.iter().enumerate().all(|(j, code)| {
            let along = i as i32;
            let side = j as i32 - half;
            let cell = IVec3::new(
                launch.x + along * px + side * pz,
                y,
                launch.z + along * pz + side * px,
            );
            code.matches(terrain, cell)
        })
    })
}
