//! Walk connectivity and landing-site search
//!
//! Both searches are breadth-first over standable cells with explicit caps,
//! so they always finish inside a single tick.

use std::collections::{HashSet, VecDeque};

use bevy::log::debug;
use bevy::math::IVec3;

use super::AnalysisError;
use super::feasibility::is_launchable;
use crate::constants::{CLIMB_COLUMN_MAX_SPAN, CLIMB_TRANSITION_MAX_DROP, CLIMB_TRANSITION_MAX_RISE};
use crate::terrain::{Cell, TerrainQuery, is_standable};
use crate::tuning::JumpTuning;

const HORIZONTAL_NEIGHBORS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// First standable cell on expanding square rings around `origin`
/// (one level above or below allowed). Ring 0 is the origin column.
pub fn find_nearest_standable(terrain: &dyn TerrainQuery, origin: Cell, radius: i32) -> Option<Cell> {
    for r in 0..=radius {
        for dx in -r..=r {
            for dz in -r..=r {
                if dx.abs() != r && dz.abs() != r {
                    continue;
                }
                for dy in -1..=1 {
                    let cell = origin + IVec3::new(dx, dy, dz);
                    if is_standable(terrain, cell) {
                        return Some(cell);
                    }
                }
            }
        }
    }
    None
}

/// Straight same-level walk: every rounded cell on the segment is standable
pub fn can_walk_straight(terrain: &dyn TerrainQuery, from: Cell, to: Cell) -> bool {
    if from.y != to.y {
        return false;
    }
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    let steps = dx.abs().max(dz.abs());
    if steps == 0 {
        return is_standable(terrain, from);
    }
    (0..=steps).all(|i| {
        let t = i as f64 / steps as f64;
        let x = (from.x as f64 + dx as f64 * t).round() as i32;
        let z = (from.z as f64 + dz as f64 * t).round() as i32;
        is_standable(terrain, IVec3::new(x, from.y, z))
    })
}

/// Pick the cell to jump from.
///
/// Starts at the avatar's feet cell (or the nearest standable cell when the
/// avatar is mid-air), then scans same-level rings for the standable cell
/// closest to `target` that can be reached by walking straight.
pub fn find_launch_cell(
    terrain: &dyn TerrainQuery,
    avatar_cell: Cell,
    target: Cell,
    tuning: &JumpTuning,
) -> Result<Cell, AnalysisError> {
    let start = if is_standable(terrain, avatar_cell) {
        avatar_cell
    } else {
        find_nearest_standable(terrain, avatar_cell, tuning.nearest_standable_radius)
            .ok_or(AnalysisError::NoStandableLaunchCell)?
    };

    let mut best = start;
    let mut best_dist = start.distance_squared(target);
    for r in 1..=tuning.launch_search_radius {
        for dx in -r..=r {
            for dz in -r..=r {
                if dx.abs() != r && dz.abs() != r {
                    continue;
                }
                let cell = start + IVec3::new(dx, 0, dz);
                let dist = cell.distance_squared(target);
                if dist < best_dist
                    && is_standable(terrain, cell)
                    && can_walk_straight(terrain, start, cell)
                {
                    best = cell;
                    best_dist = dist;
                }
            }
        }
    }
    Ok(best)
}

/// Raise a pointed-at cell until it is standable
pub fn lift_to_standable(terrain: &dyn TerrainQuery, target: Cell) -> Result<Cell, AnalysisError> {
    let (_, max_y) = terrain.world_height_bounds();
    let mut cell = target;
    while !is_standable(terrain, cell) {
        cell += IVec3::Y;
        if cell.y > max_y + 1 {
            return Err(AnalysisError::TargetTooHigh { max_y });
        }
    }
    Ok(cell)
}

/// Whether a single walk step from `from` to an adjacent column is legal.
///
/// Plain steps rise at most one level and drop at most `fall_tolerance`.
/// Diagonal steps may not rise. Steps touching climbable cells get the wider
/// climbing limits.
pub fn can_walk_step(terrain: &dyn TerrainQuery, from: Cell, to: Cell, fall_tolerance: i32) -> bool {
    let dx = (to.x - from.x).abs();
    let dz = (to.z - from.z).abs();
    if dx > 1 || dz > 1 {
        return false;
    }
    let dy = to.y - from.y;
    let diagonal = dx == 1 && dz == 1;
    let from_climbable = terrain.is_climbable(from);
    let to_climbable = terrain.is_climbable(to);

    if from_climbable && to_climbable {
        return can_climb_column(terrain, from, to);
    }
    if from_climbable || to_climbable {
        if diagonal && dy > 0 {
            return false;
        }
        return dy <= CLIMB_TRANSITION_MAX_RISE
            && dy >= -CLIMB_TRANSITION_MAX_DROP;
    }
    if diagonal && dy > 0 {
        return false;
    }
    dy <= 1 && dy >= -fall_tolerance
}

fn can_climb_column(terrain: &dyn TerrainQuery, from: Cell, to: Cell) -> bool {
    let dy = to.y - from.y;
    if dy.abs() > CLIMB_COLUMN_MAX_SPAN {
        return false;
    }
    let (lo, hi) = (from.y.min(to.y), from.y.max(to.y));
    ((lo + 1)..hi).all(|y| terrain.is_climbable(IVec3::new(from.x, y, from.z)))
}

/// Breadth-first walk search from `start`. Each horizontal neighbor takes the
/// highest legal foothold between one level up and `climb_fall_tolerance`
/// levels down. Gives up past `max_radius` (Chebyshev, horizontal) or after
/// `max_expansions` visited cells.
pub fn is_walk_connected(
    terrain: &dyn TerrainQuery,
    start: Cell,
    target: Cell,
    max_radius: i32,
    max_expansions: usize,
    tuning: &JumpTuning,
) -> bool {
    if start == target {
        return true;
    }
    let mut visited: HashSet<Cell> = HashSet::new();
    let mut queue: VecDeque<Cell> = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);
    let mut expansions = 0;

    while let Some(current) = queue.pop_front() {
        expansions += 1;
        if expansions > max_expansions {
            debug!("walk search hit expansion cap at {:?}", current);
            return false;
        }
        for (dx, dz) in HORIZONTAL_NEIGHBORS {
            let column = current + IVec3::new(dx, 0, dz);
            if (column.x - start.x).abs().max((column.z - start.z).abs()) > max_radius {
                continue;
            }
            let foothold = (-tuning.climb_fall_tolerance..=1).rev().find_map(|dy| {
                let candidate = column + IVec3::new(0, dy, 0);
                (is_standable(terrain, candidate)
                    && can_walk_step(terrain, current, candidate, tuning.fall_tolerance))
                .then_some(candidate)
            });
            let Some(next) = foothold else {
                continue;
            };
            if next == target {
                return true;
            }
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    false
}

/// Landing cell to aim for near `target_area`.
///
/// Breadth-first from the target over standable cells no more than one level
/// above the launch cell. If the target itself is launchable, only a strictly
/// closer launchable cell may replace it. Otherwise the closest launchable
/// candidate is taken, and none at all is an error.
pub fn find_best_landing_near(
    terrain: &dyn TerrainQuery,
    target_area: Cell,
    launch: Cell,
    tuning: &JumpTuning,
) -> Result<Cell, AnalysisError> {
    let max_y = launch.y + 1;
    let admissible = |cell: Cell| cell.y <= max_y && cell != launch && is_standable(terrain, cell);
    let launchable = |cell: Cell| is_launchable(terrain, launch, cell, tuning);

    let target_launchable = admissible(target_area) && launchable(target_area);
    let mut best: Option<(Cell, i32)> =
        target_launchable.then(|| (target_area, target_area.distance_squared(launch)));

    let mut visited: HashSet<Cell> = HashSet::new();
    let mut queue: VecDeque<(Cell, u32)> = VecDeque::new();
    visited.insert(target_area);
    queue.push_back((target_area, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if current != target_area && admissible(current) && launchable(current) {
            let dist = current.distance_squared(launch);
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((current, dist));
            }
        }
        if depth >= tuning.landing_search_radius {
            continue;
        }
        for dy in -1..=1 {
            for (dx, dz) in HORIZONTAL_NEIGHBORS {
                let next = current + IVec3::new(dx, dy, dz);
                if next.y > max_y || !is_standable(terrain, next) {
                    continue;
                }
                if visited.insert(next) {
                    queue.push_back((next, depth + 1));
                }
            }
        }
    }

    best.map(|(cell, _)| cell)
        .ok_or(AnalysisError::NoLaunchableLandingFound {
            radius: tuning.landing_search_radius,
        })
}
