//! Simulation configuration

use serde::{Deserialize, Serialize};

use crate::constants::SIM_MAX_TICKS;
use crate::tuning::JUMP_TUNING_FILE;

use super::courses::COURSES_FILE;

/// Configuration for a simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Course file to load
    pub courses_file: String,
    /// Run only the named course (None = every course in the file)
    pub course: Option<String>,
    /// Generate this many random courses instead of loading the file
    pub random: u32,
    /// RNG seed for random courses (None = derived from the clock)
    pub seed: Option<u64>,
    /// Number of parallel threads (0 = sequential, N = N threads)
    pub parallel: usize,
    /// Suppress per-course output
    pub quiet: bool,
    /// Tick cap per course
    pub max_ticks: u32,
    /// Tuning file for the jump pipeline
    pub tuning_file: String,
    /// Write results JSON here (None = don't write)
    pub output_file: Option<String>,
    /// Write each run's event log here as JSON lines
    pub event_log: Option<String>,
    #[serde(skip)]
    pub show_help: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            courses_file: COURSES_FILE.to_string(),
            course: None,
            random: 0,
            seed: None,
            parallel: 0, // Sequential by default
            quiet: false,
            max_ticks: SIM_MAX_TICKS,
            tuning_file: JUMP_TUNING_FILE.to_string(),
            output_file: None,
            event_log: None,
            show_help: false,
        }
    }
}

/// Local simulation settings
pub const SIM_SETTINGS_FILE: &str = "config/simulation_settings.json";

impl SimConfig {
    /// Load configuration from a JSON settings file
    pub fn from_file(path: &str) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
    }

    /// Settings file if present, otherwise built-in defaults
    pub fn from_config_files() -> Self {
        Self::from_file(SIM_SETTINGS_FILE).unwrap_or_default()
    }

    /// Parse configuration from the process command line
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_arg_list(&args)
    }

    /// Settings file (or `--settings <FILE>`) first, then CLI overrides.
    /// `args[0]` is the program name.
    pub fn from_arg_list(args: &[String]) -> Self {
        let mut config = Self::from_config_files();

        if let Some(pos) = args.iter().position(|a| a == "--settings")
            && let Some(path) = args.get(pos + 1)
        {
            match Self::from_file(path) {
                Ok(loaded) => config = loaded,
                Err(e) => eprintln!("Warning: {}", e),
            }
        }

        let mut i = 1;
        while i < args.len() {
            let value = args.get(i + 1);
            match args[i].as_str() {
                "--settings" => i += 1,
                "--course" => {
                    if let Some(v) = value {
                        config.course = Some(v.clone());
                        i += 1;
                    }
                }
                "--courses" => {
                    if let Some(v) = value {
                        config.courses_file = v.clone();
                        i += 1;
                    }
                }
                "--random" => {
                    if let Some(v) = value {
                        config.random = v.parse().unwrap_or(10);
                        i += 1;
                    }
                }
                "--seed" => {
                    if let Some(v) = value {
                        config.seed = v.parse().ok();
                        i += 1;
                    }
                }
                "--parallel" => {
                    if let Some(v) = value {
                        config.parallel = v.parse().unwrap_or(0);
                        i += 1;
                    }
                }
                "--max-ticks" => {
                    if let Some(v) = value {
                        config.max_ticks = v.parse().unwrap_or(SIM_MAX_TICKS);
                        i += 1;
                    }
                }
                "--tuning" => {
                    if let Some(v) = value {
                        config.tuning_file = v.clone();
                        i += 1;
                    }
                }
                "--output" => {
                    if let Some(v) = value {
                        config.output_file = Some(v.clone());
                        i += 1;
                    }
                }
                "--events" => {
                    if let Some(v) = value {
                        config.event_log = Some(v.clone());
                        i += 1;
                    }
                }
                "--quiet" | "-q" => config.quiet = true,
                "--help" | "-h" => config.show_help = true,
                _ => {}
            }
            i += 1;
        }

        config
    }
}

pub fn print_help() {
    println!(
        r#"Jump Simulation Tool - headless jump runs over voxel courses

USAGE:
    cargo run --bin simulate -- [OPTIONS]

OPTIONS:
    --settings <FILE>   Load settings from JSON file (CLI args override file settings)
    --courses <FILE>    Course file (default: config/courses.txt)
    --course <NAME>     Run only this course
    --random <N>        Run N random gap courses instead of the course file
    --seed <N>          RNG seed for random courses
    --parallel <N>      Run courses in parallel with N threads
    --max-ticks <N>     Tick cap per course (default: 1200)
    --tuning <FILE>     Jump tuning JSON (default: config/jump_tuning.json)
    --output <FILE>     Write results JSON to file
    --events <FILE>     Write event logs as JSON lines
    --quiet, -q         Suppress per-course output
    --help, -h          Show this help

EXAMPLES:
    cargo run --bin simulate -- --course "Two gap"
    cargo run --bin simulate -- --random 200 --seed 7 --parallel 8 --quiet
"#
    );
}
