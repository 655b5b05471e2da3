//! Event type definitions for jump telemetry

use serde::{Deserialize, Serialize};

use crate::planning::Step;
use crate::terrain::Cell;

/// Everything a jump session reports about itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JumpEvent {
    /// Session opened (once per log)
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,  // RFC 3339
    },
    TargetSelected {
        target: [i32; 3],
        launch: [i32; 3],
        landing: [i32; 3],
        horizontal_distance: f64,
        height_delta: f64,
        has_run_up: bool,
    },
    AnalysisFailed {
        target: [i32; 3],
        reason: String,
    },
    SequencePlanned {
        steps: Vec<Step>,
    },
    PlanFailed {
        reason: String,
    },
    StepStarted {
        index: usize,
        step: Step,
    },
    StepCompleted {
        index: usize,
        step: Step,
    },
    SequenceCompleted {
        steps: usize,
    },
    SequenceCancelled {
        at_step: usize,
    },
    SequenceAborted {
        at_step: usize,
        reason: String,
    },
}

impl JumpEvent {
    /// Short code used in compact log lines
    pub fn type_code(&self) -> &'static str {
        match self {
            JumpEvent::SessionStart { .. } => "SS",
            JumpEvent::TargetSelected { .. } => "TS",
            JumpEvent::AnalysisFailed { .. } => "AF",
            JumpEvent::SequencePlanned { .. } => "SP",
            JumpEvent::PlanFailed { .. } => "PF",
            JumpEvent::StepStarted { .. } => "ST",
            JumpEvent::StepCompleted { .. } => "SC",
            JumpEvent::SequenceCompleted { .. } => "QC",
            JumpEvent::SequenceCancelled { .. } => "QX",
            JumpEvent::SequenceAborted { .. } => "QA",
        }
    }

    /// Serialized tag, e.g. `step_started`
    pub fn name(&self) -> &'static str {
        match self {
            JumpEvent::SessionStart { .. } => "session_start",
            JumpEvent::TargetSelected { .. } => "target_selected",
            JumpEvent::AnalysisFailed { .. } => "analysis_failed",
            JumpEvent::SequencePlanned { .. } => "sequence_planned",
            JumpEvent::PlanFailed { .. } => "plan_failed",
            JumpEvent::StepStarted { .. } => "step_started",
            JumpEvent::StepCompleted { .. } => "step_completed",
            JumpEvent::SequenceCompleted { .. } => "sequence_completed",
            JumpEvent::SequenceCancelled { .. } => "sequence_cancelled",
            JumpEvent::SequenceAborted { .. } => "sequence_aborted",
        }
    }

    /// Whether this event closes a sequence
    pub fn ends_sequence(&self) -> bool {
        matches!(
            self,
            JumpEvent::SequenceCompleted { .. }
                | JumpEvent::SequenceCancelled { .. }
                | JumpEvent::SequenceAborted { .. }
        )
    }
}

pub(crate) fn cell_array(cell: Cell) -> [i32; 3] {
    cell.to_array()
}
