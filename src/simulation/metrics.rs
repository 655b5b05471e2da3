//! Aggregate metrics for a batch of course runs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::runner::{CourseResult, RunOutcome};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimMetrics {
    pub total: usize,
    pub landed: usize,
    pub missed: usize,
    /// Count per outcome label
    pub outcomes: BTreeMap<String, usize>,
    /// Count per planned sequence, e.g. "[MomentumRun, Leap]"
    pub sequences: BTreeMap<String, usize>,
    /// Courses whose plan differed from the expected sequence
    pub unexpected_plans: Vec<String>,
    /// Mean ticks over landed runs
    pub avg_landed_ticks: f32,
    /// Landed / total (0.0 - 1.0)
    pub success_rate: f32,
}

impl SimMetrics {
    pub fn from_results(results: &[CourseResult]) -> Self {
        let mut metrics = Self {
            total: results.len(),
            ..Self::default()
        };
        let mut landed_ticks = 0u64;

        for result in results {
            *metrics
                .outcomes
                .entry(result.outcome.label().to_string())
                .or_insert(0) += 1;
            match result.outcome {
                RunOutcome::Landed => {
                    metrics.landed += 1;
                    landed_ticks += result.ticks as u64;
                }
                RunOutcome::Missed => metrics.missed += 1,
                _ => {}
            }
            if !result.sequence.is_empty() {
                let names: Vec<String> = result.sequence.iter().map(|s| s.to_string()).collect();
                *metrics
                    .sequences
                    .entry(format!("[{}]", names.join(", ")))
                    .or_insert(0) += 1;
            }
            if result.sequence_matched == Some(false) {
                metrics.unexpected_plans.push(result.course.clone());
            }
        }

        if metrics.landed > 0 {
            metrics.avg_landed_ticks = landed_ticks as f32 / metrics.landed as f32;
        }
        if metrics.total > 0 {
            metrics.success_rate = metrics.landed as f32 / metrics.total as f32;
        }
        metrics
    }

    /// Human-readable report
    pub fn report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Courses: {}  Landed: {} ({:.0}%)  Missed: {}\n",
            self.total,
            self.landed,
            self.success_rate * 100.0,
            self.missed
        ));
        if self.landed > 0 {
            out.push_str(&format!("Avg ticks to land: {:.1}\n", self.avg_landed_ticks));
        }
        out.push_str("Outcomes:\n");
        for (label, count) in &self.outcomes {
            out.push_str(&format!("  {:<16} {}\n", label, count));
        }
        out.push_str("Sequences:\n");
        for (sequence, count) in &self.sequences {
            out.push_str(&format!("  {:<48} {}\n", sequence, count));
        }
        if !self.unexpected_plans.is_empty() {
            out.push_str(&format!("Unexpected plans: {}\n", self.unexpected_plans.join(", ")));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::Step;

    fn result(name: &str, outcome: RunOutcome, ticks: u32, matched: Option<bool>) -> CourseResult {
        CourseResult {
            course: name.to_string(),
            outcome,
            sequence: vec![Step::MomentumRun, Step::Leap],
            sequence_matched: matched,
            ticks,
            final_position: [0.0; 3],
            events: Vec::new(),
        }
    }

    #[test]
    fn test_metrics_from_results() {
        let results = vec![
            result("a", RunOutcome::Landed, 30, Some(true)),
            result("b", RunOutcome::Landed, 50, None),
            result("c", RunOutcome::Missed, 80, Some(false)),
            result("d", RunOutcome::TimedOut, 100, None),
        ];
        let metrics = SimMetrics::from_results(&results);
        assert_eq!(metrics.total, 4);
        assert_eq!(metrics.landed, 2);
        assert_eq!(metrics.missed, 1);
        assert_eq!(metrics.avg_landed_ticks, 40.0);
        assert_eq!(metrics.success_rate, 0.5);
        assert_eq!(metrics.outcomes.get("timed_out"), Some(&1));
        assert_eq!(metrics.sequences.get("[MomentumRun, Leap]"), Some(&4));
        assert_eq!(metrics.unexpected_plans, vec!["c".to_string()]);
        assert!(metrics.report().contains("Landed: 2 (50%)"));
    }

    #[test]
    fn test_empty_batch() {
        let metrics = SimMetrics::from_results(&[]);
        assert_eq!(metrics.success_rate, 0.0);
        assert!(metrics.report().starts_with("Courses: 0"));
    }
}
