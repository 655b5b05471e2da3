//! Assertion checking for scenario expectations

use super::parser::ExpectedEvent;
use crate::events::{JumpEvent, LoggedEvent};
use crate::simulation::{CourseResult, RunOutcome};

/// Error when an assertion fails
#[derive(Debug)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n    Expected: {}\n    Actual: {}", self.message, self.expected, self.actual)
    }
}

/// Captured event with timing info
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub tick: u64,
    pub event_type: String,
}

impl CapturedEvent {
    pub fn from_logged(logged: &LoggedEvent) -> Self {
        Self {
            tick: logged.tick,
            event_type: logged.event.name().to_string(),
        }
    }
}

/// Check that captured events contain the expected ones in order
pub fn check_sequence(expected: &[ExpectedEvent], captured: &[CapturedEvent]) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        let found = captured[captured_idx..]
            .iter()
            .enumerate()
            .find(|(_, cap)| cap.event_type == exp.event);

        match found {
            Some((offset, cap)) => {
                if let Some(min) = exp.tick_min
                    && cap.tick < min
                {
                    return Err(AssertionError {
                        message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                        expected: format!("tick >= {}", min),
                        actual: format!("tick {}", cap.tick),
                    });
                }
                if let Some(max) = exp.tick_max
                    && cap.tick > max
                {
                    return Err(AssertionError {
                        message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                        expected: format!("tick <= {}", max),
                        actual: format!("tick {}", cap.tick),
                    });
                }
                captured_idx += offset + 1;
            }
            None => {
                return Err(AssertionError {
                    message: format!("Event #{} '{}' not found", i + 1, exp.event),
                    expected: format!("'{}' event in sequence", exp.event),
                    actual: format!(
                        "events after position {}: {:?}",
                        captured_idx,
                        captured[captured_idx..].iter().map(|e| &e.event_type).collect::<Vec<_>>()
                    ),
                });
            }
        }
    }

    Ok(())
}

pub fn check_outcome(expected: &str, result: &CourseResult) -> Result<(), AssertionError> {
    let actual = result.outcome.label();
    if actual == expected {
        return Ok(());
    }
    Err(AssertionError {
        message: "Outcome mismatch".to_string(),
        expected: expected.to_string(),
        actual: match failure_detail(&result.outcome) {
            Some(detail) => format!("{} ({})", actual, detail),
            None => actual.to_string(),
        },
    })
}

/// The failure message must contain `fragment`
pub fn check_error(fragment: &str, result: &CourseResult) -> Result<(), AssertionError> {
    match failure_detail(&result.outcome) {
        Some(detail) if detail.contains(fragment) => Ok(()),
        Some(detail) => Err(AssertionError {
            message: "Error message mismatch".to_string(),
            expected: format!("message containing '{}'", fragment),
            actual: detail.to_string(),
        }),
        None => Err(AssertionError {
            message: "Expected a failure".to_string(),
            expected: format!("message containing '{}'", fragment),
            actual: result.outcome.label().to_string(),
        }),
    }
}

/// Launch or landing cell recorded when the target was selected
pub fn check_cell(which: &str, expected: [i32; 3], events: &[LoggedEvent]) -> Result<(), AssertionError> {
    let selected = events.iter().find_map(|logged| match &logged.event {
        JumpEvent::TargetSelected { launch, landing, .. } => Some((*launch, *landing)),
        _ => None,
    });
    let Some((launch, landing)) = selected else {
        return Err(AssertionError {
            message: format!("No {} cell recorded", which),
            expected: format!("{:?}", expected),
            actual: "target never selected".to_string(),
        });
    };
    let actual = if which == "launch" { launch } else { landing };
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError {
            message: format!("{} cell mismatch", which),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        })
    }
}

fn failure_detail(outcome: &RunOutcome) -> Option<&str> {
    match outcome {
        RunOutcome::AnalysisFailed(detail)
        | RunOutcome::PlanFailed(detail)
        | RunOutcome::Aborted(detail) => Some(detail),
        _ => None,
    }
}
