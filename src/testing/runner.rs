//! Test execution engine

use bevy::log::debug;
use bevy::math::{DVec3, IVec3};

use crate::constants::{COURSE_MAX_Y, COURSE_MIN_Y, SIM_MAX_TICKS};
use crate::planning::Step;
use crate::simulation::{COURSES_FILE, CourseData, CourseDatabase, RunOutcome, run_course};
use crate::terrain::VoxelGrid;
use crate::tuning::JumpTuning;

use super::assertions::{
    AssertionError, CapturedEvent, check_cell, check_error, check_outcome, check_sequence,
};
use super::parser::{TestDefinition, TestSetup};

/// What the jump session did during a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub outcome: RunOutcome,
    pub sequence: Vec<Step>,
    pub ticks: u32,
}

impl ScenarioReport {
    /// `landed`, or the failure label with its message
    pub fn describe(&self) -> String {
        match &self.outcome {
            RunOutcome::AnalysisFailed(detail)
            | RunOutcome::PlanFailed(detail)
            | RunOutcome::Aborted(detail) => format!("{}: {}", self.outcome.label(), detail),
            other => other.label().to_string(),
        }
    }

    /// Planned steps joined with arrows, or `-` when nothing was planned
    pub fn steps(&self) -> String {
        if self.sequence.is_empty() {
            return "-".to_string();
        }
        self.sequence
            .iter()
            .map(|step| step.to_string())
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

/// Result of running a test
#[derive(Debug)]
pub enum TestResult {
    Pass { report: ScenarioReport },
    Fail { error: AssertionError, report: ScenarioReport },
    Error { message: String },
}

/// Default tuning with the scenario's overrides merged in
pub fn apply_tuning_overrides(overrides: Option<&toml::Table>) -> Result<JumpTuning, String> {
    let base = JumpTuning::default();
    let Some(overrides) = overrides else {
        return Ok(base);
    };
    let mut value = serde_json::to_value(&base).map_err(|e| format!("Tuning: {}", e))?;
    if let Some(fields) = value.as_object_mut() {
        for (key, v) in overrides {
            let v = serde_json::to_value(v).map_err(|e| format!("Tuning '{}': {}", key, e))?;
            fields.insert(key.clone(), v);
        }
    }
    let tuning: JumpTuning =
        serde_json::from_value(value).map_err(|e| format!("Invalid tuning override: {}", e))?;
    tuning.validate()?;
    Ok(tuning)
}

/// Course named in the setup (or an empty one), with blocks and overrides applied
pub fn build_course(name: &str, setup: &TestSetup) -> Result<CourseData, String> {
    let mut course = match &setup.course {
        Some(course_name) => {
            let path = setup.courses_file.as_deref().unwrap_or(COURSES_FILE);
            let db = CourseDatabase::load_from_file(path);
            db.find(course_name).cloned().ok_or_else(|| {
                format!(
                    "Course '{}' not found. Available: {:?}",
                    course_name,
                    db.courses.iter().map(|c| &c.name).collect::<Vec<_>>()
                )
            })?
        }
        None => {
            let spawn = setup
                .spawn
                .ok_or_else(|| "Inline course needs a spawn".to_string())?;
            let target = setup
                .target
                .ok_or_else(|| "Inline course needs a target".to_string())?;
            CourseData {
                name: name.to_string(),
                spawn: DVec3::from_array(spawn),
                yaw: 0.0,
                target: IVec3::from_array(target),
                expected: None,
                grid: VoxelGrid::new(COURSE_MIN_Y, COURSE_MAX_Y),
            }
        }
    };

    for block in &setup.blocks {
        let from = IVec3::from_array(block.from);
        let to = block.to.map(IVec3::from_array).unwrap_or(from);
        course.grid.fill(from, to, block.kind);
    }
    if let Some(spawn) = setup.spawn {
        course.spawn = DVec3::from_array(spawn);
    }
    if let Some(yaw) = setup.yaw {
        course.yaw = yaw;
    }
    if let Some(target) = setup.target {
        course.target = IVec3::from_array(target);
    }
    Ok(course)
}

/// Run a single scenario and check its expectations
pub fn run_test(test: &TestDefinition) -> TestResult {
    let course = match build_course(&test.name, &test.setup) {
        Ok(course) => course,
        Err(message) => return TestResult::Error { message },
    };
    let tuning = match apply_tuning_overrides(test.setup.tuning.as_ref()) {
        Ok(tuning) => tuning,
        Err(message) => return TestResult::Error { message },
    };
    let max_ticks = test.setup.max_ticks.unwrap_or(SIM_MAX_TICKS);

    let result = run_course(&course, &tuning, max_ticks);
    debug!("{}: {:?} after {} ticks", test.name, result.outcome, result.ticks);

    let expect = &test.expect;
    let checks = || -> Result<(), AssertionError> {
        if let Some(outcome) = &expect.outcome {
            check_outcome(outcome, &result)?;
        }
        if let Some(fragment) = &expect.error {
            check_error(fragment, &result)?;
        }
        if let Some(sequence) = expect.sequence.as_ref().or(course.expected.as_ref())
            && !result.sequence.is_empty()
            && result.sequence != *sequence
        {
            return Err(AssertionError {
                message: "Planned sequence mismatch".to_string(),
                expected: format!("{:?}", sequence),
                actual: format!("{:?}", result.sequence),
            });
        }
        if let Some(sequence) = &expect.sequence
            && result.sequence.is_empty()
            && !sequence.is_empty()
        {
            return Err(AssertionError {
                message: "No sequence was planned".to_string(),
                expected: format!("{:?}", sequence),
                actual: result.outcome.label().to_string(),
            });
        }
        if let Some(landing) = expect.landing {
            check_cell("landing", landing, &result.events)?;
        }
        if let Some(launch) = expect.launch {
            check_cell("launch", launch, &result.events)?;
        }
        if let Some(limit) = expect.max_ticks
            && result.ticks > limit
        {
            return Err(AssertionError {
                message: "Sequence took too long".to_string(),
                expected: format!("<= {} ticks", limit),
                actual: format!("{} ticks", result.ticks),
            });
        }
        if !expect.events.is_empty() {
            let captured: Vec<CapturedEvent> =
                result.events.iter().map(CapturedEvent::from_logged).collect();
            check_sequence(&expect.events, &captured)?;
        }
        Ok(())
    };

    let verdict = checks();
    let report = ScenarioReport {
        outcome: result.outcome,
        sequence: result.sequence,
        ticks: result.ticks,
    };
    match verdict {
        Ok(()) => TestResult::Pass { report },
        Err(error) => TestResult::Fail { error, report },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> TestDefinition {
        toml::from_str(toml).unwrap()
    }

    const INLINE_GAP: &str = r#"
name = "Inline two gap"

[setup]
spawn = [-2.5, 1.0, 0.5]
yaw = -90.0
target = [3, 0, 0]
max_ticks = 400

[[setup.blocks]]
from = [-8, 0, -1]
to = [0, 0, 1]
kind = "solid"

[[setup.blocks]]
from = [3, 0, -1]
to = [6, 0, 1]
kind = "solid"

[expect]
outcome = "landed"
sequence = ["MomentumRun", "Leap"]
landing = [3, 1, 0]

[[expect.events]]
event = "target_selected"
tick_max = 0

[[expect.events]]
event = "sequence_planned"

[[expect.events]]
event = "step_started"

[[expect.events]]
event = "sequence_completed"
"#;

    #[test]
    fn test_inline_course_passes() {
        match run_test(&parse(INLINE_GAP)) {
            TestResult::Pass { report } => {
                assert_eq!(report.describe(), "landed");
                assert_eq!(report.steps(), "MomentumRun > Leap");
            }
            other => panic!("expected pass, got {:?}", other),
        }
    }

    #[test]
    fn test_named_course_passes() {
        let result = run_test(&parse(
            r#"
name = "Named"
[setup]
course = "Two gap"
[expect]
outcome = "landed"
"#,
        ));
        assert!(matches!(result, TestResult::Pass { .. }), "{:?}", result);
    }

    #[test]
    fn test_wrong_outcome_fails() {
        let result = run_test(&parse(
            r#"
name = "Wrong"
[setup]
course = "Two gap"
[expect]
outcome = "missed"
"#,
        ));
        match result {
            TestResult::Fail { error, report } => {
                assert_eq!(error.actual, "landed");
                assert_eq!(report.outcome, RunOutcome::Landed);
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_walkable_target_reports_error() {
        let result = run_test(&parse(
            r#"
name = "Walkable"
[setup]
spawn = [0.5, 1.0, 0.5]
target = [4, 0, 0]
[[setup.blocks]]
from = [-3, 0, 0]
to = [6, 0, 0]
kind = "solid"
[expect]
outcome = "analysis_failed"
error = "reachable by walking"
"#,
        ));
        match result {
            TestResult::Pass { report } => {
                assert_eq!(report.ticks, 0);
                assert_eq!(report.steps(), "-");
                assert_eq!(
                    report.describe(),
                    "analysis_failed: target is reachable by walking, no jump needed"
                );
            }
            other => panic!("expected pass, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_course_is_error() {
        let result = run_test(&parse(
            r#"
name = "Missing"
[setup]
course = "No such course"
"#,
        ));
        assert!(matches!(result, TestResult::Error { .. }));
    }

    #[test]
    fn test_inline_course_needs_target() {
        let setup = TestSetup {
            spawn: Some([0.5, 1.0, 0.5]),
            ..TestSetup::default()
        };
        assert_eq!(
            build_course("x", &setup).unwrap_err(),
            "Inline course needs a target"
        );
    }

    #[test]
    fn test_tuning_overrides() {
        let table: toml::Table = toml::from_str("max_horizontal_reach = 4.3\nmin_runway = 2.0").unwrap();
        let tuning = apply_tuning_overrides(Some(&table)).unwrap();
        assert_eq!(tuning.max_horizontal_reach, Some(4.3));
        assert_eq!(tuning.min_runway, 2.0);
        assert_eq!(tuning.launch_search_radius, JumpTuning::default().launch_search_radius);

        let bad: toml::Table = toml::from_str("launch_search_radius = \"far\"").unwrap();
        assert!(apply_tuning_overrides(Some(&bad)).is_err());

        let stalled: toml::Table = toml::from_str("run_up_step = 0.0").unwrap();
        assert!(apply_tuning_overrides(Some(&stalled)).is_err());
    }
}
