//! Jump session - the entry points a host game calls
//!
//! One session holds at most one selected jump and one executing sequence.
//! Terrain and avatar are borrowed per call; the session never owns them.

use bevy::log::{info, warn};
use bevy::prelude::Resource;

use crate::analysis::{AnalysisError, JumpGeometry, analyze_jump};
use crate::avatar::AvatarControl;
use crate::events::{EventLog, JumpEvent, cell_array};
use crate::execution::{ExecutionError, ManeuverExecutor, StepTargets};
use crate::planning::{ManeuverPlanner, PlanError, Step, StepSequence};
use crate::terrain::{Cell, Point, TerrainQuery, is_standable};
use crate::tuning::JumpTuning;

/// What a single [`JumpSession::tick`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing executing (residual countdowns may still have run)
    Idle,
    Running { step_index: usize },
    /// The previous step finished and `step_index` just began
    StepAdvanced { step_index: usize },
    Completed,
    Aborted(ExecutionError),
}

#[derive(Resource)]
pub struct JumpSession {
    tuning: JumpTuning,
    planner: ManeuverPlanner,
    executor: ManeuverExecutor,
    geometry: Option<JumpGeometry>,
    sequence: StepSequence,
    step_index: usize,
    executing: bool,
    log: EventLog,
}

impl Default for JumpSession {
    fn default() -> Self {
        Self::new(JumpTuning::default())
    }
}

impl JumpSession {
    pub fn new(tuning: JumpTuning) -> Self {
        Self::with_planner(tuning, ManeuverPlanner::default())
    }

    pub fn with_planner(tuning: JumpTuning, planner: ManeuverPlanner) -> Self {
        let mut log = EventLog::new();
        log.start_session();
        Self {
            tuning,
            planner,
            executor: ManeuverExecutor::new(),
            geometry: None,
            sequence: StepSequence::default(),
            step_index: 0,
            executing: false,
            log,
        }
    }

    pub fn tuning(&self) -> &JumpTuning {
        &self.tuning
    }

    pub fn geometry(&self) -> Option<&JumpGeometry> {
        self.geometry.as_ref()
    }

    pub fn sequence(&self) -> &StepSequence {
        &self.sequence
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn executor(&self) -> &ManeuverExecutor {
        &self.executor
    }

    pub fn events(&self) -> &EventLog {
        &self.log
    }

    pub fn events_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }

    /// Analyze the jump to `target`. A successful analysis replaces the
    /// stored selection; a failed one clears it.
    pub fn select_target(
        &mut self,
        terrain: &dyn TerrainQuery,
        avatar_position: Point,
        target: Cell,
    ) -> Result<JumpGeometry, AnalysisError> {
        if self.executing {
            warn!("target selection refused while executing");
            return Err(AnalysisError::BusySessionActive);
        }

        match analyze_jump(terrain, avatar_position, target, &self.tuning) {
            Ok(geometry) => {
                info!(
                    "target {:?}: launch {:?} -> landing {:?} (gap {:.2}, dy {})",
                    target,
                    geometry.launch_cell,
                    geometry.landing_cell,
                    geometry.horizontal_distance,
                    geometry.height_delta
                );
                self.log.log(JumpEvent::TargetSelected {
                    target: cell_array(target),
                    launch: cell_array(geometry.launch_cell),
                    landing: cell_array(geometry.landing_cell),
                    horizontal_distance: geometry.horizontal_distance,
                    height_delta: geometry.height_delta,
                    has_run_up: geometry.has_run_up,
                });
                self.geometry = Some(geometry.clone());
                Ok(geometry)
            }
            Err(e) => {
                warn!("target {:?}: {}", target, e);
                self.log.log(JumpEvent::AnalysisFailed {
                    target: cell_array(target),
                    reason: e.to_string(),
                });
                self.geometry = None;
                Err(e)
            }
        }
    }

    /// Plan `geometry` and start its first step
    pub fn begin_execution(
        &mut self,
        terrain: &dyn TerrainQuery,
        geometry: &JumpGeometry,
    ) -> Result<StepSequence, PlanError> {
        if self.executing {
            warn!("execution refused, a sequence is already running");
            return Err(PlanError::BusySessionActive);
        }

        let sequence = match self.planner.plan(terrain, geometry, &self.tuning) {
            Ok(sequence) => sequence,
            Err(e) => {
                warn!("planning failed: {}", e);
                self.log.log(JumpEvent::PlanFailed {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        };
        let Some(first) = sequence.get(0) else {
            return Err(PlanError::UnsupportedAdvancedJump);
        };

        self.log.log(JumpEvent::SequencePlanned {
            steps: sequence.steps().to_vec(),
        });
        self.geometry = Some(geometry.clone());
        self.sequence = sequence.clone();
        self.step_index = 0;
        self.executing = true;
        self.start_step(first, StepTargets::from_geometry(terrain, geometry));
        info!("executing {}", sequence);
        Ok(sequence)
    }

    /// Advance one tick. The executor's timers run even when idle.
    pub fn tick(&mut self, terrain: &dyn TerrainQuery, avatar: &mut dyn AvatarControl) -> TickOutcome {
        self.log.advance_tick();
        self.executor.tick(terrain, avatar);

        if !self.executing {
            return TickOutcome::Idle;
        }
        if !self.executor.is_step_complete() {
            return TickOutcome::Running {
                step_index: self.step_index,
            };
        }

        if let Some(step) = self.sequence.get(self.step_index) {
            self.log.log(JumpEvent::StepCompleted {
                index: self.step_index,
                step,
            });
        }
        self.step_index += 1;

        let Some(next) = self.sequence.get(self.step_index) else {
            info!("sequence complete ({} steps)", self.sequence.len());
            self.log.log(JumpEvent::SequenceCompleted {
                steps: self.sequence.len(),
            });
            self.finish();
            return TickOutcome::Completed;
        };

        let targets = match self.geometry.as_ref() {
            Some(geometry) if is_standable(terrain, geometry.launch_cell) => {
                StepTargets::from_geometry(terrain, geometry)
            }
            _ => return self.abort(avatar, ExecutionError::LostGeometryDuringExecution),
        };
        self.start_step(next, targets);
        TickOutcome::StepAdvanced {
            step_index: self.step_index,
        }
    }

    /// Stop executing and release every key
    pub fn cancel(&mut self, avatar: &mut dyn AvatarControl) {
        if self.executing {
            info!("sequence cancelled at step {}", self.step_index + 1);
            self.log.log(JumpEvent::SequenceCancelled {
                at_step: self.step_index,
            });
        }
        self.executor.cancel(avatar);
        self.finish();
    }

    pub fn is_executing(&self) -> bool {
        self.executing
    }

    /// "Step i/N (Name)" while executing, otherwise "Not executing"
    pub fn status(&self) -> String {
        match self.sequence.get(self.step_index) {
            Some(step) if self.executing => format!(
                "Step {}/{} ({})",
                self.step_index + 1,
                self.sequence.len(),
                step
            ),
            _ => "Not executing".to_string(),
        }
    }

    /// Forget the selected jump. A running sequence aborts at its next step
    /// boundary.
    pub fn clear_selection(&mut self) {
        self.geometry = None;
    }

    fn start_step(&mut self, step: Step, targets: StepTargets) {
        self.log.log(JumpEvent::StepStarted {
            index: self.step_index,
            step,
        });
        self.executor.begin_step(step, targets);
    }

    fn abort(&mut self, avatar: &mut dyn AvatarControl, error: ExecutionError) -> TickOutcome {
        warn!("sequence aborted at step {}: {}", self.step_index + 1, error);
        self.log.log(JumpEvent::SequenceAborted {
            at_step: self.step_index,
            reason: error.to_string(),
        });
        self.executor.cancel(avatar);
        self.finish();
        TickOutcome::Aborted(error)
    }

    /// Back to idle. The geometry belongs to the finished sequence.
    fn finish(&mut self) {
        self.geometry = None;
        self.executing = false;
        self.sequence = StepSequence::default();
        self.step_index = 0;
    }
}
