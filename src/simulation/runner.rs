//! Course runner - plays one course through a session and a simulated avatar

use bevy::log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::avatar::SimulatedAvatar;
use crate::constants::{LANDED_RADIUS, SIM_SETTLE_TICKS};
use crate::events::LoggedEvent;
use crate::helpers::horizontal_distance;
use crate::planning::Step;
use crate::session::{JumpSession, TickOutcome};
use crate::tuning::JumpTuning;

use super::config::SimConfig;
use super::courses::CourseData;
use super::metrics::SimMetrics;
use super::parallel::run_courses_parallel;

/// How a course run ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Sequence completed and the avatar is standing on the landing
    Landed,
    /// Sequence completed somewhere else
    Missed,
    AnalysisFailed(String),
    PlanFailed(String),
    Aborted(String),
    TimedOut,
}

impl RunOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            RunOutcome::Landed => "landed",
            RunOutcome::Missed => "missed",
            RunOutcome::AnalysisFailed(_) => "analysis_failed",
            RunOutcome::PlanFailed(_) => "plan_failed",
            RunOutcome::Aborted(_) => "aborted",
            RunOutcome::TimedOut => "timed_out",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseResult {
    pub course: String,
    pub outcome: RunOutcome,
    pub sequence: Vec<Step>,
    /// Whether the planned sequence matched the course's expectation
    pub sequence_matched: Option<bool>,
    pub ticks: u32,
    pub final_position: [f64; 3],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<LoggedEvent>,
}

/// Run one course to completion or the tick cap
pub fn run_course(course: &CourseData, tuning: &JumpTuning, max_ticks: u32) -> CourseResult {
    let grid = &course.grid;
    let mut avatar = SimulatedAvatar::new(grid, course.spawn, course.yaw);
    let mut session = JumpSession::new(tuning.clone());

    let mut result = CourseResult {
        course: course.name.clone(),
        outcome: RunOutcome::TimedOut,
        sequence: Vec::new(),
        sequence_matched: None,
        ticks: 0,
        final_position: avatar.position.to_array(),
        events: Vec::new(),
    };

    let geometry = match session.select_target(grid, avatar.position, course.target) {
        Ok(geometry) => geometry,
        Err(e) => {
            result.outcome = RunOutcome::AnalysisFailed(e.to_string());
            result.events = session.events_mut().drain_events();
            return result;
        }
    };
    let sequence = match session.begin_execution(grid, &geometry) {
        Ok(sequence) => sequence,
        Err(e) => {
            result.outcome = RunOutcome::PlanFailed(e.to_string());
            result.events = session.events_mut().drain_events();
            return result;
        }
    };
    result.sequence = sequence.steps().to_vec();
    result.sequence_matched = course
        .expected
        .as_ref()
        .map(|expected| expected.as_slice() == sequence.steps());

    let mut finished = None;
    while result.ticks < max_ticks {
        let outcome = session.tick(grid, &mut avatar);
        avatar.step(grid);
        result.ticks += 1;
        match outcome {
            TickOutcome::Completed => {
                finished = Some(Ok(()));
                break;
            }
            TickOutcome::Aborted(e) => {
                finished = Some(Err(e.to_string()));
                break;
            }
            TickOutcome::StepAdvanced { step_index } => {
                debug!("{}: step {} at tick {}", course.name, step_index, result.ticks);
            }
            _ => {}
        }
    }

    // Let residual countdowns play out and the avatar come to rest
    for _ in 0..SIM_SETTLE_TICKS {
        session.tick(grid, &mut avatar);
        avatar.step(grid);
    }
    result.final_position = avatar.position.to_array();
    result.events = session.events_mut().drain_events();

    result.outcome = match finished {
        None => RunOutcome::TimedOut,
        Some(Err(reason)) => RunOutcome::Aborted(reason),
        Some(Ok(())) => {
            let level = geometry.landing.y;
            let landed = avatar.on_ground
                && (avatar.position.y - level).abs() < 1e-6
                && horizontal_distance(avatar.position, geometry.landing) <= LANDED_RADIUS;
            if landed { RunOutcome::Landed } else { RunOutcome::Missed }
        }
    };
    result
}

/// Run every selected course, sequentially or on the rayon pool
pub fn run_courses(courses: &[CourseData], config: &SimConfig, tuning: &JumpTuning) -> Vec<CourseResult> {
    if config.parallel > 0 {
        run_courses_parallel(courses, tuning, config.max_ticks)
    } else {
        courses
            .iter()
            .map(|course| {
                let result = run_course(course, tuning, config.max_ticks);
                if !config.quiet {
                    println!(
                        "  {:<24} {:<16} {:>5} ticks  {:?}",
                        result.course,
                        result.outcome.label(),
                        result.ticks,
                        result.sequence
                    );
                }
                result
            })
            .collect()
    }
}

/// Summarize a batch and log the headline
pub fn summarize(results: &[CourseResult]) -> SimMetrics {
    let metrics = SimMetrics::from_results(results);
    info!(
        "{} courses: {} landed, {} missed, {} failed",
        metrics.total,
        metrics.landed,
        metrics.missed,
        metrics.total - metrics.landed - metrics.missed
    );
    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::courses::CourseDatabase;
    use crate::simulation::generator::GapLayout;

    #[test]
    fn test_default_course_lands() {
        let db = CourseDatabase::default_courses();
        let result = run_course(&db.courses[0], &JumpTuning::default(), 400);
        assert_eq!(result.outcome, RunOutcome::Landed, "{:?}", result);
        assert_eq!(result.sequence, vec![Step::MomentumRun, Step::Leap]);
        assert_eq!(result.sequence_matched, Some(true));
        assert!(result.events.iter().any(|e| e.event.ends_sequence()));
    }

    #[test]
    fn test_walkable_course_fails_analysis() {
        let course = GapLayout {
            runway: 5,
            width: 1,
            gap: 0,
            height_delta: 0,
            shift: 0,
        }
        .build("flat".to_string());
        let result = run_course(&course, &JumpTuning::default(), 100);
        assert_eq!(
            result.outcome,
            RunOutcome::AnalysisFailed("target is reachable by walking, no jump needed".to_string())
        );
        assert_eq!(result.ticks, 0);
    }

    #[test]
    fn test_tick_cap_times_out() {
        let db = CourseDatabase::default_courses();
        let result = run_course(&db.courses[0], &JumpTuning::default(), 2);
        assert_eq!(result.outcome, RunOutcome::TimedOut);
        assert_eq!(result.ticks, 2);
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let json = serde_json::to_string(&RunOutcome::Aborted("lost".to_string())).unwrap();
        assert_eq!(json, r#"{"kind":"aborted","detail":"lost"}"#);
    }
}
