//! Jump feasibility between a launch cell and a landing cell

use bevy::math::IVec3;

use crate::constants::MAX_JUMP_RISE;
use crate::planning::obstructions::is_wrap_around_jump;
use crate::terrain::{Cell, TerrainQuery};
use crate::tuning::JumpTuning;

/// Whether a jump from `launch` can land on `landing`.
///
/// Rejects climbable support under the landing, rises of more than one cell,
/// jumps beyond the configured reach, and arcs blocked overhead unless the
/// blockage is one the obstructed-leap maneuvers route around.
pub fn is_launchable(terrain: &dyn TerrainQuery, launch: Cell, landing: Cell, tuning: &JumpTuning) -> bool {
    if terrain.is_climbable(landing - IVec3::Y) {
        return false;
    }
    if landing.y - launch.y > MAX_JUMP_RISE {
        return false;
    }
    if let Some(reach) = tuning.max_horizontal_reach
        && minimum_horizontal_distance(launch, landing) > reach
    {
        return false;
    }
    has_clearance(terrain, launch, landing) || is_wrap_around_jump(terrain, launch, landing)
}

/// Sample a coarse arc one level above the higher endpoint (two at the
/// midpoint) and reject if a sampled cell or the cell above it is solid.
pub fn has_clearance(terrain: &dyn TerrainQuery, launch: Cell, landing: Cell) -> bool {
    let dx = landing.x - launch.x;
    let dz = landing.z - launch.z;
    let steps = dx.abs().max(dz.abs());
    let base = launch.y.max(landing.y);
    for i in 1..steps {
        let t = i as f64 / steps as f64;
        let x = (launch.x as f64 + dx as f64 * t).round() as i32;
        let z = (launch.z as f64 + dz as f64 * t).round() as i32;
        let y = base + if i == steps / 2 { 2 } else { 1 };
        let sample = IVec3::new(x, y, z);
        if terrain.is_solid(sample) || terrain.is_solid(sample + IVec3::Y) {
            return false;
        }
    }
    true
}

/// Closest approach between the two cells' footprints on the horizontal plane
pub fn minimum_horizontal_distance(a: Cell, b: Cell) -> f64 {
    let gap_x = ((b.x - a.x).abs() - 1).max(0) as f64;
    let gap_z = ((b.z - a.z).abs() - 1).max(0) as f64;
    gap_x.hypot(gap_z)
}

/// Sideways displacement of the jump: the smaller of the two horizontal deltas
pub fn lateral_offset(a: Cell, b: Cell) -> f64 {
    (b.x - a.x).abs().min((b.z - a.z).abs()) as f64
}
