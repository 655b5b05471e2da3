//! Planning module - picks the maneuver recipe for an analyzed jump

pub mod gates;
pub mod obstructions;
pub mod patterns;

use std::fmt;
use std::str::FromStr;

use bevy::log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gates::{AdvancedGate, StandingStartReport, default_gates, simulate_standing_start, standing_start_succeeds};
pub use obstructions::{cell_after_last_obstruction, last_obstruction, obstruction_count};
pub use patterns::{FootprintCode, TRIPLE_OBSTRUCTION_FOOTPRINT, matches_footprint};

use crate::analysis::JumpGeometry;
use crate::constants::{MINOR_OBSTRUCTION_MAX, TRIPLE_OBSTRUCTION_COUNT};
use crate::terrain::TerrainQuery;
use crate::tuning::JumpTuning;

/// One primitive control recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Walk to the far end of the run-up line
    RunUp,
    /// Sprint along the run-up toward the launch point until the edge
    MomentumRun,
    /// Jump and steer onto the landing
    Leap,
    /// Square up and tuck into the front corner of the launch cell
    SafeCornerApproach,
    /// Same, tucking into the back corner
    SafeCornerApproachReversed,
    /// Hop around one or two head-height obstructions
    ShortObstructedLeap,
    /// Hop around a three-wide wall from a lone pillar
    TriplePatternLeap,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::RunUp => "RunUp",
            Step::MomentumRun => "MomentumRun",
            Step::Leap => "Leap",
            Step::SafeCornerApproach => "SafeCornerApproach",
            Step::SafeCornerApproachReversed => "SafeCornerApproachReversed",
            Step::ShortObstructedLeap => "ShortObstructedLeap",
            Step::TriplePatternLeap => "TriplePatternLeap",
        };
        f.write_str(name)
    }
}

impl FromStr for Step {
    type Err = String;

    /// Accepts the display name or its snake_case form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s.trim().chars().filter(|c| *c != '_').collect::<String>().to_lowercase();
        match key.as_str() {
            "runup" => Ok(Step::RunUp),
            "momentumrun" => Ok(Step::MomentumRun),
            "leap" => Ok(Step::Leap),
            "safecornerapproach" => Ok(Step::SafeCornerApproach),
            "safecornerapproachreversed" => Ok(Step::SafeCornerApproachReversed),
            "shortobstructedleap" => Ok(Step::ShortObstructedLeap),
            "triplepatternleap" => Ok(Step::TriplePatternLeap),
            _ => Err(format!("Unknown step: {}", s.trim())),
        }
    }
}

/// Ordered steps for one jump
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepSequence(Vec<Step>);

impl StepSequence {
    pub fn new(steps: Vec<Step>) -> Self {
        Self(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Step> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = Step> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for StepSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(Step::to_string).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("jump requires unsupported advanced planning")]
    UnsupportedAdvancedJump,
    #[error("a jump is already executing")]
    BusySessionActive,
}

/// Classifies a jump and emits its recipe. Holds no per-jump state.
pub struct ManeuverPlanner {
    gates: Vec<Box<dyn AdvancedGate>>,
}

impl Default for ManeuverPlanner {
    fn default() -> Self {
        Self::new(default_gates())
    }
}

impl ManeuverPlanner {
    pub fn new(gates: Vec<Box<dyn AdvancedGate>>) -> Self {
        Self { gates }
    }

    pub fn plan(
        &self,
        terrain: &dyn TerrainQuery,
        geometry: &JumpGeometry,
        tuning: &JumpTuning,
    ) -> Result<StepSequence, PlanError> {
        let launch = geometry.launch_cell;
        let landing = geometry.landing_cell;
        let obstructions = obstruction_count(terrain, launch, landing);

        if obstructions > 0 {
            if obstructions <= MINOR_OBSTRUCTION_MAX {
                return Ok(self.emit(vec![Step::SafeCornerApproach, Step::ShortObstructedLeap]));
            }
            // The triple recipe hops one three-wide wall; four or more
            // obstructions are not attempted even when the footprint matches.
            if obstructions == TRIPLE_OBSTRUCTION_COUNT
                && matches_footprint(terrain, launch, landing, TRIPLE_OBSTRUCTION_FOOTPRINT)
            {
                return Ok(self.emit(vec![Step::SafeCornerApproachReversed, Step::TriplePatternLeap]));
            }
            debug!("{} obstructions match no known recipe", obstructions);
            return Err(PlanError::UnsupportedAdvancedJump);
        }

        if let Some(gate) = self.gates.iter().find(|gate| gate.trips(terrain, geometry)) {
            debug!("advanced gate tripped: {}", gate.name());
            return Err(PlanError::UnsupportedAdvancedJump);
        }

        let mut steps = Vec::with_capacity(3);
        if !standing_start_succeeds(terrain, geometry, tuning) {
            steps.push(Step::RunUp);
        }
        steps.push(Step::MomentumRun);
        steps.push(Step::Leap);
        Ok(self.emit(steps))
    }

    fn emit(&self, steps: Vec<Step>) -> StepSequence {
        let sequence = StepSequence::new(steps);
        info!("planned {}", sequence);
        sequence
    }
}

/// Plan with the default gate set
pub fn plan_jump(
    terrain: &dyn TerrainQuery,
    geometry: &JumpGeometry,
    tuning: &JumpTuning,
) -> Result<StepSequence, PlanError> {
    ManeuverPlanner::default().plan(terrain, geometry, tuning)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze_jump;
    use crate::terrain::{Voxel, VoxelGrid};
    use bevy::math::{DVec3, IVec3};

    fn gap_course(gap: i32) -> VoxelGrid {
        let mut grid = VoxelGrid::new(-16, 32);
        grid.fill(IVec3::new(-8, 0, -1), IVec3::new(0, 0, 1), Some(Voxel::Solid));
        grid.fill(IVec3::new(gap + 1, 0, -1), IVec3::new(gap + 4, 0, 1), Some(Voxel::Solid));
        grid
    }

    fn triple_course() -> VoxelGrid {
        let mut grid = VoxelGrid::new(-16, 32);
        grid.set_solid(IVec3::new(0, 0, 0));
        grid.set_solid(IVec3::new(4, 0, 0));
        grid.fill(IVec3::new(1, 1, 0), IVec3::new(3, 3, 0), Some(Voxel::Solid));
        grid
    }

    struct AlwaysTrips;

    impl AdvancedGate for AlwaysTrips {
        fn name(&self) -> &'static str {
            "always"
        }

        fn trips(&self, _terrain: &dyn TerrainQuery, _geometry: &JumpGeometry) -> bool {
            true
        }
    }

    #[test]
    fn test_gap_two_is_momentum_and_leap() {
        let grid = gap_course(2);
        let tuning = JumpTuning::default();
        let geometry = analyze_jump(&grid, DVec3::new(-5.5, 1.0, 0.5), IVec3::new(3, 0, 0), &tuning).unwrap();
        let sequence = plan_jump(&grid, &geometry, &tuning).unwrap();
        assert_eq!(sequence.steps(), &[Step::MomentumRun, Step::Leap]);
    }

    #[test]
    fn test_wide_gap_adds_run_up() {
        let grid = gap_course(6);
        let tuning = JumpTuning::default();
        let geometry = analyze_jump(&grid, DVec3::new(-5.5, 1.0, 0.5), IVec3::new(7, 0, 0), &tuning).unwrap();
        let sequence = plan_jump(&grid, &geometry, &tuning).unwrap();
        assert_eq!(sequence.steps(), &[Step::RunUp, Step::MomentumRun, Step::Leap]);
    }

    #[test]
    fn test_triple_obstruction_recipe() {
        let grid = triple_course();
        let tuning = JumpTuning::default();
        let geometry = analyze_jump(&grid, DVec3::new(0.5, 1.0, 0.5), IVec3::new(4, 0, 0), &tuning).unwrap();
        assert_eq!(geometry.launch_cell, IVec3::new(0, 1, 0));
        assert_eq!(geometry.landing_cell, IVec3::new(4, 1, 0));
        let sequence = plan_jump(&grid, &geometry, &tuning).unwrap();
        assert_eq!(
            sequence.steps(),
            &[Step::SafeCornerApproachReversed, Step::TriplePatternLeap]
        );
    }

    #[test]
    fn test_minor_obstruction_recipe() {
        let mut grid = VoxelGrid::new(-16, 32);
        grid.fill(IVec3::new(-3, 0, -1), IVec3::new(0, 0, 1), Some(Voxel::Solid));
        grid.set_solid(IVec3::new(3, 0, 0));
        grid.fill(IVec3::new(1, 1, 0), IVec3::new(1, 3, 0), Some(Voxel::Solid));
        let geometry = JumpGeometry::new(IVec3::new(0, 1, 0), IVec3::new(3, 1, 0), None, 0.3);
        let sequence = plan_jump(&grid, &geometry, &JumpTuning::default()).unwrap();
        assert_eq!(sequence.steps(), &[Step::SafeCornerApproach, Step::ShortObstructedLeap]);
    }

    #[test]
    fn test_unmatched_triple_is_unsupported() {
        let mut grid = triple_course();
        // A block behind the pillar breaks the footprint
        grid.set_solid(IVec3::new(-1, 0, 0));
        let geometry = JumpGeometry::new(IVec3::new(0, 1, 0), IVec3::new(4, 1, 0), None, 0.3);
        let result = plan_jump(&grid, &geometry, &JumpTuning::default());
        assert_eq!(result, Err(PlanError::UnsupportedAdvancedJump));
    }

    #[test]
    fn test_four_obstructions_are_unsupported() {
        let mut grid = triple_course();
        grid.set_solid(IVec3::new(4, 2, 0));
        let geometry = JumpGeometry::new(IVec3::new(0, 1, 0), IVec3::new(4, 1, 0), None, 0.3);
        assert_eq!(obstruction_count(&grid, geometry.launch_cell, geometry.landing_cell), 4);
        let result = plan_jump(&grid, &geometry, &JumpTuning::default());
        assert_eq!(result, Err(PlanError::UnsupportedAdvancedJump));
    }

    #[test]
    fn test_tripped_gate_is_unsupported() {
        let grid = gap_course(2);
        let geometry = JumpGeometry::new(IVec3::new(0, 1, 0), IVec3::new(3, 1, 0), None, 0.3);
        let planner = ManeuverPlanner::new(vec![Box::new(AlwaysTrips)]);
        let result = planner.plan(&grid, &geometry, &JumpTuning::default());
        assert_eq!(result, Err(PlanError::UnsupportedAdvancedJump));
        assert_eq!(
            PlanError::UnsupportedAdvancedJump.to_string(),
            "jump requires unsupported advanced planning"
        );
    }

    #[test]
    fn test_sequence_display() {
        let sequence = StepSequence::new(vec![Step::MomentumRun, Step::Leap]);
        assert_eq!(sequence.to_string(), "[MomentumRun, Leap]");
        assert_eq!(sequence.get(1), Some(Step::Leap));
        assert_eq!(sequence.get(2), None);
    }

    #[test]
    fn test_step_parses_both_spellings() {
        assert_eq!("MomentumRun".parse::<Step>(), Ok(Step::MomentumRun));
        assert_eq!("safe_corner_approach_reversed".parse::<Step>(), Ok(Step::SafeCornerApproachReversed));
        assert_eq!(" leap ".parse::<Step>(), Ok(Step::Leap));
        assert!("hop".parse::<Step>().is_err());
    }
}
