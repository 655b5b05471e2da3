//! Dispatch from a planned [`Step`] to its maneuver state machine

use super::corner::SafeCorner;
use super::frame::{ControlFrame, Progress, TickContext};
use super::leap::Leap;
use super::momentum_run::MomentumRun;
use super::obstructed_leap::ObstructedLeapPhase;
use super::run_up::RunUpPhase;
use crate::planning::Step;

/// A running maneuver, one variant per family
#[derive(Debug, Clone, PartialEq)]
pub enum Maneuver {
    RunUp(RunUpPhase),
    MomentumRun(MomentumRun),
    Leap(Leap),
    SafeCorner(SafeCorner),
    ObstructedLeap(ObstructedLeapPhase),
}

impl Maneuver {
    /// Initial state for a step
    pub fn for_step(step: Step) -> Self {
        match step {
            Step::RunUp => Maneuver::RunUp(RunUpPhase::Aim),
            Step::MomentumRun => Maneuver::MomentumRun(MomentumRun::default()),
            Step::Leap => Maneuver::Leap(Leap),
            Step::SafeCornerApproach => Maneuver::SafeCorner(SafeCorner::new(false)),
            Step::SafeCornerApproachReversed => Maneuver::SafeCorner(SafeCorner::new(true)),
            Step::ShortObstructedLeap | Step::TriplePatternLeap => {
                Maneuver::ObstructedLeap(ObstructedLeapPhase::default())
            }
        }
    }

    pub fn advance(self, ctx: &TickContext) -> (Progress<Self>, ControlFrame) {
        match self {
            Maneuver::RunUp(state) => lift(state.advance(ctx), Maneuver::RunUp),
            Maneuver::MomentumRun(state) => lift(state.advance(ctx), Maneuver::MomentumRun),
            Maneuver::Leap(state) => lift(state.advance(ctx), Maneuver::Leap),
            Maneuver::SafeCorner(state) => lift(state.advance(ctx), Maneuver::SafeCorner),
            Maneuver::ObstructedLeap(state) => lift(state.advance(ctx), Maneuver::ObstructedLeap),
        }
    }
}

fn lift<S>(
    (progress, frame): (Progress<S>, ControlFrame),
    wrap: impl FnOnce(S) -> Maneuver,
) -> (Progress<Maneuver>, ControlFrame) {
    let progress = match progress {
        Progress::Continue(state) => Progress::Continue(wrap(state)),
        Progress::Done => Progress::Done,
    };
    (progress, frame)
}

/// Where the executor is within the current step
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ExecutionState {
    #[default]
    Idle,
    Active { step: Step, maneuver: Maneuver },
    Complete { step: Step },
}

impl ExecutionState {
    pub fn step(&self) -> Option<Step> {
        match self {
            ExecutionState::Idle => None,
            ExecutionState::Active { step, .. } | ExecutionState::Complete { step } => Some(*step),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ExecutionState::Active { .. })
    }
}
