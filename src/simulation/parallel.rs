//! Parallel simulation execution
//!
//! Uses Rayon to run course batches concurrently. Each run owns its own
//! session and avatar, so courses share nothing but the tuning.

use rayon::prelude::*;

use crate::tuning::JumpTuning;

use super::courses::CourseData;
use super::runner::{CourseResult, run_course};

/// Initialize the global Rayon pool with the given thread count.
/// Call this once at startup; 0 keeps Rayon's auto-detected default.
pub fn init_parallel(threads: usize) -> Result<(), String> {
    if threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| format!("Failed to initialize Rayon thread pool: {}", e))?;
    }
    Ok(())
}

/// Run courses in parallel; results keep the input order
pub fn run_courses_parallel(courses: &[CourseData], tuning: &JumpTuning, max_ticks: u32) -> Vec<CourseResult> {
    courses
        .par_iter()
        .map(|course| run_course(course, tuning, max_ticks))
        .collect()
}
