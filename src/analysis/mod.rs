//! Analysis module - turns a target cell into a concrete jump
//!
//! Pipeline: lift target → pick launch cell → refuse walkable targets →
//! search landing → search run-up → place launch point.

pub mod feasibility;
pub mod momentum;
pub mod reachability;

use bevy::log::debug;
use bevy::math::DVec2;
use thiserror::Error;

pub use feasibility::{is_launchable, lateral_offset, minimum_horizontal_distance};
pub use momentum::{compute_launch_point, find_run_up};
pub use reachability::{
    find_best_landing_near, find_launch_cell, find_nearest_standable, is_walk_connected,
    lift_to_standable,
};

use crate::helpers::{cell_center, cell_of, horizontal_direction};
use crate::terrain::{Cell, Point, TerrainQuery};
use crate::tuning::JumpTuning;

/// Reasons a target cannot be turned into a jump. All of them end the
/// current analysis only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("no standable launch cell found nearby")]
    NoStandableLaunchCell,
    #[error("target is reachable by walking, no jump needed")]
    TargetReachableByWalking,
    #[error("no launchable landing found within {radius} cells of the target")]
    NoLaunchableLandingFound { radius: u32 },
    #[error("target is too high (world tops out at y={max_y})")]
    TargetTooHigh { max_y: i32 },
    #[error("a jump is already executing")]
    BusySessionActive,
}

/// Everything the planner and executor need to know about one jump
#[derive(Debug, Clone, PartialEq)]
pub struct JumpGeometry {
    /// Far end of the run-up line (launch cell center when there is none)
    pub run_start: Point,
    /// Precise point to leave the launch cell from
    pub launch: Point,
    /// Landing cell center at feet level
    pub landing: Point,
    pub launch_cell: Cell,
    pub landing_cell: Cell,
    /// Horizontal gap between the two cells' footprints
    pub horizontal_distance: f64,
    /// Landing level minus launch level
    pub height_delta: f64,
    pub lateral_offset: f64,
    /// Unit XZ direction from the launch point to the landing
    pub recommended_heading: DVec2,
    /// Whether a usable run-up line was found
    pub has_run_up: bool,
}

impl JumpGeometry {
    /// Assemble geometry for a launch/landing pair
    pub fn new(launch_cell: Cell, landing_cell: Cell, run_up: Option<Point>, overshoot: f64) -> Self {
        let launch = compute_launch_point(launch_cell, landing_cell, run_up, overshoot);
        let landing = cell_center(landing_cell);
        Self {
            run_start: run_up.unwrap_or_else(|| cell_center(launch_cell)),
            launch,
            landing,
            launch_cell,
            landing_cell,
            horizontal_distance: minimum_horizontal_distance(launch_cell, landing_cell),
            height_delta: (landing_cell.y - launch_cell.y) as f64,
            lateral_offset: lateral_offset(launch_cell, landing_cell),
            recommended_heading: horizontal_direction(launch, landing),
            has_run_up: run_up.is_some(),
        }
    }
}

/// Run the full analysis for a target the user pointed at
pub fn analyze_jump(
    terrain: &dyn TerrainQuery,
    avatar_position: Point,
    target: Cell,
    tuning: &JumpTuning,
) -> Result<JumpGeometry, AnalysisError> {
    let target_area = lift_to_standable(terrain, target)?;
    let launch_cell = find_launch_cell(terrain, cell_of(avatar_position), target_area, tuning)?;

    if is_walk_connected(
        terrain,
        launch_cell,
        target_area,
        tuning.walk_max_horizontal_radius,
        tuning.walk_max_expansions,
        tuning,
    ) {
        return Err(AnalysisError::TargetReachableByWalking);
    }

    let landing_cell = find_best_landing_near(terrain, target_area, launch_cell, tuning)?;
    if landing_cell != target_area {
        debug!("landing substituted: {:?} -> {:?}", target_area, landing_cell);
    }
    let run_up = find_run_up(terrain, launch_cell, landing_cell, tuning);
    Ok(JumpGeometry::new(
        launch_cell,
        landing_cell,
        run_up,
        tuning.launch_overshoot,
    ))
}
