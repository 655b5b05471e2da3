//! Scenario testing for the jump pipeline
//!
//! Scenarios are TOML files describing a course, a target and the expected
//! analysis, plan and landing. Each one runs headless through a jump session.

pub mod assertions;
pub mod parser;
pub mod runner;

pub use assertions::{AssertionError, CapturedEvent, check_sequence};
pub use parser::{BlockDef, ExpectedEvent, TestDefinition, TestExpectations, TestSetup, parse_test_file};
pub use runner::{ScenarioReport, TestResult, apply_tuning_overrides, build_course, run_test};

/// Default path for test scenarios
pub const SCENARIOS_DIR: &str = "tests/scenarios";
