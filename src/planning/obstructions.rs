//! Head-height obstruction probing along an axis-aligned jump

use bevy::math::IVec3;

use crate::analysis::{lateral_offset, minimum_horizontal_distance};
use crate::constants::{MINOR_OBSTRUCTION_MAX, OBSTRUCTION_MAX_GAP, OBSTRUCTION_MIN_GAP, TRIPLE_OBSTRUCTION_COUNT};
use crate::terrain::{Cell, TerrainQuery};

/// Cells probed for obstructions, one level above the launch cell.
///
/// Walks X from launch to landing at the landing's Z, then Z at the launch's
/// X. Duplicates (the shared corner) are dropped, order is preserved.
pub fn probe_cells(launch: Cell, landing: Cell) -> Vec<Cell> {
    let y = launch.y + 1;
    let mut cells = Vec::new();
    for x in launch.x.min(landing.x)..=launch.x.max(landing.x) {
        cells.push(IVec3::new(x, y, landing.z));
    }
    for z in launch.z.min(landing.z)..=launch.z.max(landing.z) {
        let cell = IVec3::new(launch.x, y, z);
        if !cells.contains(&cell) {
            cells.push(cell);
        }
    }
    cells
}

/// Raw count of solid probe cells
pub fn count_obstructions(terrain: &dyn TerrainQuery, launch: Cell, landing: Cell) -> usize {
    probe_cells(launch, landing)
        .into_iter()
        .filter(|cell| terrain.is_solid(*cell))
        .count()
}

/// Obstruction count as the planner sees it: zero unless the jump is
/// axis-aligned with an edge gap inside the counted window.
pub fn obstruction_count(terrain: &dyn TerrainQuery, launch: Cell, landing: Cell) -> usize {
    if lateral_offset(launch, landing) != 0.0 {
        return 0;
    }
    let gap = minimum_horizontal_distance(launch, landing);
    if !(OBSTRUCTION_MIN_GAP..=OBSTRUCTION_MAX_GAP).contains(&gap) {
        return 0;
    }
    count_obstructions(terrain, launch, landing)
}

/// An obstructed jump one of the wrap-around recipes is built for
pub fn is_wrap_around_jump(terrain: &dyn TerrainQuery, launch: Cell, landing: Cell) -> bool {
    let count = obstruction_count(terrain, launch, landing);
    (1..=MINOR_OBSTRUCTION_MAX.max(TRIPLE_OBSTRUCTION_COUNT)).contains(&count)
}

/// The last solid probe cell in probing order
pub fn last_obstruction(terrain: &dyn TerrainQuery, launch: Cell, landing: Cell) -> Option<Cell> {
    probe_cells(launch, landing)
        .into_iter()
        .rev()
        .find(|cell| terrain.is_solid(*cell))
}

/// One cell past the last obstruction in the direction of travel
pub fn cell_after_last_obstruction(terrain: &dyn TerrainQuery, launch: Cell, landing: Cell) -> Option<Cell> {
    let step = IVec3::new((landing.x - launch.x).signum(), 0, (landing.z - launch.z).signum());
    last_obstruction(terrain, launch, landing).map(|cell| cell + step)
}
