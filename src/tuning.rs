//! Runtime tuning for the jump pipeline (search bounds and physics gates)

use bevy::log::warn;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::constants::*;

fn default_launch_search_radius() -> i32 {
    LAUNCH_SEARCH_RADIUS
}
fn default_nearest_standable_radius() -> i32 {
    NEAREST_STANDABLE_RADIUS
}
fn default_walk_max_horizontal_radius() -> i32 {
    WALK_MAX_HORIZONTAL_RADIUS
}
fn default_walk_max_expansions() -> usize {
    WALK_MAX_EXPANSIONS
}
fn default_fall_tolerance() -> i32 {
    FALL_TOLERANCE
}
fn default_climb_fall_tolerance() -> i32 {
    CLIMB_FALL_TOLERANCE
}
fn default_landing_search_radius() -> u32 {
    LANDING_SEARCH_RADIUS
}
fn default_max_run_length() -> f64 {
    MAX_RUN_LENGTH
}
fn default_run_up_step() -> f64 {
    RUN_UP_STEP
}
fn default_run_up_sweep_samples() -> u32 {
    RUN_UP_SWEEP_SAMPLES
}
fn default_min_runway() -> f64 {
    MIN_RUNWAY
}
fn default_launch_overshoot() -> f64 {
    LAUNCH_OVERSHOOT
}
fn default_standable_buffer() -> f64 {
    STANDABLE_BUFFER
}
fn default_standing_start_tick_cap() -> u32 {
    STANDING_START_TICK_CAP
}
fn default_landing_tolerance() -> f64 {
    LANDING_TOLERANCE
}

/// Path to the jump tuning config
pub const JUMP_TUNING_FILE: &str = "config/jump_tuning.json";

/// Serializable tuning values stored in config
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpTuning {
    #[serde(default = "default_launch_search_radius")]
    pub launch_search_radius: i32,
    #[serde(default = "default_nearest_standable_radius")]
    pub nearest_standable_radius: i32,
    #[serde(default = "default_walk_max_horizontal_radius")]
    pub walk_max_horizontal_radius: i32,
    #[serde(default = "default_walk_max_expansions")]
    pub walk_max_expansions: usize,
    /// Largest plain drop while walking
    #[serde(default = "default_fall_tolerance")]
    pub fall_tolerance: i32,
    /// Depth scanned below each walk step for a foothold
    #[serde(default = "default_climb_fall_tolerance")]
    pub climb_fall_tolerance: i32,
    #[serde(default = "default_landing_search_radius")]
    pub landing_search_radius: u32,
    #[serde(default = "default_max_run_length")]
    pub max_run_length: f64,
    #[serde(default = "default_run_up_step")]
    pub run_up_step: f64,
    #[serde(default = "default_run_up_sweep_samples")]
    pub run_up_sweep_samples: u32,
    #[serde(default = "default_min_runway")]
    pub min_runway: f64,
    #[serde(default = "default_launch_overshoot")]
    pub launch_overshoot: f64,
    #[serde(default = "default_standable_buffer")]
    pub standable_buffer: f64,
    /// Maximum horizontal reach of a jump; `None` disables the gate
    #[serde(default)]
    pub max_horizontal_reach: Option<f64>,
    #[serde(default = "default_standing_start_tick_cap")]
    pub standing_start_tick_cap: u32,
    #[serde(default = "default_landing_tolerance")]
    pub landing_tolerance: f64,
}

impl Default for JumpTuning {
    fn default() -> Self {
        Self {
            launch_search_radius: default_launch_search_radius(),
            nearest_standable_radius: default_nearest_standable_radius(),
            walk_max_horizontal_radius: default_walk_max_horizontal_radius(),
            walk_max_expansions: default_walk_max_expansions(),
            fall_tolerance: default_fall_tolerance(),
            climb_fall_tolerance: default_climb_fall_tolerance(),
            landing_search_radius: default_landing_search_radius(),
            max_run_length: default_max_run_length(),
            run_up_step: default_run_up_step(),
            run_up_sweep_samples: default_run_up_sweep_samples(),
            min_runway: default_min_runway(),
            launch_overshoot: default_launch_overshoot(),
            standable_buffer: default_standable_buffer(),
            max_horizontal_reach: None,
            standing_start_tick_cap: default_standing_start_tick_cap(),
            landing_tolerance: default_landing_tolerance(),
        }
    }
}

impl JumpTuning {
    /// Tuning with the running-jump reach gate switched on
    pub fn with_reach_gate(mut self) -> Self {
        self.max_horizontal_reach = Some(RUNNING_JUMP_REACH);
        self
    }

    pub fn parse(contents: &str) -> Result<Self, String> {
        let tuning: Self = serde_json::from_str(contents)
            .map_err(|e| format!("Failed to parse jump tuning: {}", e))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall a search
    pub fn validate(&self) -> Result<(), String> {
        if !(self.run_up_step.is_finite() && self.run_up_step > 0.0) {
            return Err(format!("run_up_step must be positive, got {}", self.run_up_step));
        }
        if !(self.max_run_length.is_finite() && self.max_run_length >= 0.0) {
            return Err(format!("max_run_length must be non-negative, got {}", self.max_run_length));
        }
        Ok(())
    }
}

/// Load tuning from disk, falling back to defaults on any error
pub fn load_jump_tuning(path: &str) -> JumpTuning {
    match std::fs::read_to_string(path) {
        Ok(contents) => match JumpTuning::parse(&contents) {
            Ok(tuning) => tuning,
            Err(e) => {
                warn!("{} ({}), using defaults", e, path);
                JumpTuning::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path, e);
            JumpTuning::default()
        }
    }
}

/// Save tuning as pretty JSON
pub fn save_jump_tuning(path: &str, tuning: &JumpTuning) -> Result<(), String> {
    let json = serde_json::to_string_pretty(tuning)
        .map_err(|e| format!("Failed to serialize jump tuning: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {}", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_yields_defaults() {
        let tuning = JumpTuning::parse("{}").unwrap();
        assert_eq!(tuning, JumpTuning::default());
        assert!(tuning.max_horizontal_reach.is_none());
    }

    #[test]
    fn test_partial_override() {
        let tuning = JumpTuning::parse(r#"{"fall_tolerance": 5, "max_horizontal_reach": 4.3}"#)
            .unwrap();
        assert_eq!(tuning.fall_tolerance, 5);
        assert_eq!(tuning.max_horizontal_reach, Some(4.3));
        assert_eq!(tuning.launch_search_radius, LAUNCH_SEARCH_RADIUS);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(JumpTuning::parse("{ fall_tolerance").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tuning = load_jump_tuning("config/does_not_exist.json");
        assert_eq!(tuning, JumpTuning::default());
    }

    #[test]
    fn test_zero_run_up_step_is_rejected() {
        let err = JumpTuning::parse(r#"{"run_up_step": 0.0}"#).unwrap_err();
        assert_eq!(err, "run_up_step must be positive, got 0");
        assert!(JumpTuning::parse(r#"{"run_up_step": -0.5}"#).is_err());
        assert!(JumpTuning::parse(r#"{"max_run_length": -1.0}"#).is_err());
    }
}
