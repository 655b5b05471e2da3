//! Headless jump simulation
//!
//! Runs courses (from the course file or randomly generated) through a jump
//! session driving a simulated avatar, and collects landing metrics.

pub mod app_builder;
pub mod config;
pub mod courses;
pub mod generator;
pub mod metrics;
pub mod parallel;
pub mod runner;

pub use app_builder::HeadlessAppBuilder;
pub use config::{SIM_SETTINGS_FILE, SimConfig, print_help};
pub use courses::{COURSES_FILE, CourseData, CourseDatabase};
pub use generator::{GapLayout, generate_courses};
pub use metrics::SimMetrics;
pub use parallel::{init_parallel, run_courses_parallel};
pub use runner::{CourseResult, RunOutcome, run_course, run_courses, summarize};

use bevy::log::{info, warn};

use crate::tuning::load_jump_tuning;

/// Pick the courses a config asks for
pub fn select_courses(config: &SimConfig) -> Result<Vec<CourseData>, String> {
    if config.random > 0 {
        let seed = config
            .seed
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis() as u64);
        info!("Generating {} random courses (seed {})", config.random, seed);
        return Ok(generate_courses(seed, config.random));
    }

    let db = CourseDatabase::load_from_file(&config.courses_file);
    match &config.course {
        Some(name) => db
            .find(name)
            .cloned()
            .map(|course| vec![course])
            .ok_or_else(|| format!("No course named '{}'", name)),
        None => Ok(db.courses),
    }
}

/// Entry point for the `simulate` binary
pub fn run_simulation(config: SimConfig) -> Result<SimMetrics, String> {
    let tuning = load_jump_tuning(&config.tuning_file);
    let courses = select_courses(&config)?;
    if config.parallel > 0 {
        init_parallel(config.parallel)?;
    }

    if !config.quiet {
        println!("Running {} course(s)", courses.len());
    }
    let results = run_courses(&courses, &config, &tuning);
    let metrics = summarize(&results);
    if !config.quiet {
        println!("{}", metrics.report());
    }

    if let Some(path) = &config.output_file {
        let json = serde_json::to_string_pretty(&results)
            .map_err(|e| format!("Failed to serialize results: {}", e))?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {}", path, e))?;
        info!("Results written to {}", path);
    }

    if let Some(path) = &config.event_log {
        let mut lines = Vec::new();
        for result in &results {
            for event in &result.events {
                match serde_json::to_string(event) {
                    Ok(line) => lines.push(line),
                    Err(e) => warn!("Skipping event in {}: {}", result.course, e),
                }
            }
        }
        std::fs::write(path, lines.join("\n"))
            .map_err(|e| format!("Failed to write {}: {}", path, e))?;
        info!("Event log written to {}", path);
    }

    Ok(metrics)
}
