//! Physics gates consulted by the planner
//!
//! The three advanced gates are hooks for jumps the simple recipe cannot
//! handle; none of them trips yet. The standing-start check decides whether
//! the simple recipe needs a run-up.

use bevy::log::debug;

use crate::analysis::JumpGeometry;
use crate::avatar::{AvatarControl, SimulatedAvatar, is_at_ledge};
use crate::constants::{LEAP_THRESHOLD, NO_SPRINT_GAP};
use crate::helpers::{cell_center, horizontal_distance, yaw_towards};
use crate::terrain::TerrainQuery;
use crate::tuning::JumpTuning;

/// A condition under which the simple recipe is not good enough
pub trait AdvancedGate: Send + Sync {
    fn name(&self) -> &'static str;
    fn trips(&self, terrain: &dyn TerrainQuery, geometry: &JumpGeometry) -> bool;
}

/// Jumps whose landing window is too narrow for a loose approach
pub struct PreciseAlignmentGate;

impl AdvancedGate for PreciseAlignmentGate {
    fn name(&self) -> &'static str {
        "precise alignment"
    }

    fn trips(&self, _terrain: &dyn TerrainQuery, _geometry: &JumpGeometry) -> bool {
        false
    }
}

/// Jumps that need momentum carried across several hops
pub struct AdvancedMomentumGate;

impl AdvancedGate for AdvancedMomentumGate {
    fn name(&self) -> &'static str {
        "advanced momentum"
    }

    fn trips(&self, _terrain: &dyn TerrainQuery, _geometry: &JumpGeometry) -> bool {
        false
    }
}

/// Jumps whose arc must bend around terrain
pub struct ObstacleAvoidanceGate;

impl AdvancedGate for ObstacleAvoidanceGate {
    fn name(&self) -> &'static str {
        "obstacle avoidance"
    }

    fn trips(&self, _terrain: &dyn TerrainQuery, _geometry: &JumpGeometry) -> bool {
        false
    }
}

pub fn default_gates() -> Vec<Box<dyn AdvancedGate>> {
    vec![
        Box::new(PreciseAlignmentGate),
        Box::new(AdvancedMomentumGate),
        Box::new(ObstacleAvoidanceGate),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StandingPhase {
    Walking,
    Launched,
    Airborne,
}

/// Result of one standing-start simulation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandingStartReport {
    pub success: bool,
    pub ticks: u32,
    /// Horizontal miss from the landing center, if the avatar came down
    pub miss: Option<f64>,
}

/// Simulate walking off the launch cell from rest and jumping at the edge.
///
/// The avatar starts at the launch cell center facing the landing, sprints
/// forward until it reaches the ledge, then jumps (keeping sprint only for
/// gaps wider than [`NO_SPRINT_GAP`]). Within [`LEAP_THRESHOLD`] of the
/// landing it lets go and brakes. Success means the first touchdown after
/// leaving the ground is on the landing level and within the tolerance.
pub fn simulate_standing_start(
    terrain: &dyn TerrainQuery,
    geometry: &JumpGeometry,
    tuning: &JumpTuning,
) -> StandingStartReport {
    let start = cell_center(geometry.launch_cell);
    let landing = geometry.landing;
    let mut avatar = SimulatedAvatar::new(terrain, start, yaw_towards(start, landing));
    avatar.set_forward(true);
    avatar.set_sprint(true);

    let mut phase = StandingPhase::Walking;
    for tick in 0..tuning.standing_start_tick_cap {
        if phase == StandingPhase::Walking
            && is_at_ledge(terrain, avatar.position, avatar.on_ground, avatar.input.jump, avatar.input.crouch)
        {
            phase = StandingPhase::Launched;
            avatar.set_jump(true);
            if geometry.horizontal_distance <= NO_SPRINT_GAP {
                avatar.set_sprint(false);
            }
        }
        if phase != StandingPhase::Walking && horizontal_distance(avatar.position, landing) <= LEAP_THRESHOLD {
            avatar.set_forward(false);
            avatar.set_sprint(false);
            avatar.set_jump(false);
            avatar.set_back(true);
        }

        avatar.step(terrain);

        if phase == StandingPhase::Launched && !avatar.on_ground {
            phase = StandingPhase::Airborne;
        } else if phase == StandingPhase::Airborne && avatar.on_ground {
            let miss = horizontal_distance(avatar.position, landing);
            let level = (avatar.position.y - landing.y).abs() < 1e-6;
            return StandingStartReport {
                success: level && miss <= tuning.landing_tolerance,
                ticks: tick + 1,
                miss: Some(miss),
            };
        }
    }

    debug!("standing-start simulation hit the tick cap");
    StandingStartReport {
        success: false,
        ticks: tuning.standing_start_tick_cap,
        miss: None,
    }
}

/// Whether a jump from rest clears the gap
pub fn standing_start_succeeds(terrain: &dyn TerrainQuery, geometry: &JumpGeometry, tuning: &JumpTuning) -> bool {
    simulate_standing_start(terrain, geometry, tuning).success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{Voxel, VoxelGrid};
    use bevy::math::IVec3;

    fn gap_course(gap: i32) -> VoxelGrid {
        let mut grid = VoxelGrid::new(-16, 32);
        grid.fill(IVec3::new(-8, 0, -1), IVec3::new(0, 0, 1), Some(Voxel::Solid));
        grid.fill(IVec3::new(gap + 1, 0, -1), IVec3::new(gap + 4, 0, 1), Some(Voxel::Solid));
        grid
    }

    fn geometry(gap: i32) -> JumpGeometry {
        JumpGeometry::new(IVec3::new(0, 1, 0), IVec3::new(gap + 1, 1, 0), None, 0.3)
    }

    #[test]
    fn test_short_gaps_clear_from_standing() {
        let tuning = JumpTuning::default();
        for gap in 1..=3 {
            let report = simulate_standing_start(&gap_course(gap), &geometry(gap), &tuning);
            assert!(report.success, "gap {} failed: {:?}", gap, report);
        }
    }

    #[test]
    fn test_wide_gap_needs_run_up() {
        let tuning = JumpTuning::default();
        let report = simulate_standing_start(&gap_course(6), &geometry(6), &tuning);
        assert!(!report.success);
    }

    #[test]
    fn test_tick_cap_terminates() {
        let tuning = JumpTuning {
            standing_start_tick_cap: 3,
            ..JumpTuning::default()
        };
        let report = simulate_standing_start(&gap_course(2), &geometry(2), &tuning);
        assert!(!report.success);
        assert_eq!(report.ticks, 3);
        assert_eq!(report.miss, None);
    }

    #[test]
    fn test_advanced_gates_stay_open() {
        let grid = gap_course(2);
        let geometry = geometry(2);
        for gate in default_gates() {
            assert!(!gate.trips(&grid, &geometry), "{} tripped", gate.name());
        }
    }
}
