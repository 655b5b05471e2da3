//! Jump scenario runner
//!
//! Runs every TOML scenario under `tests/scenarios/` through a headless jump
//! session and reports, per scenario, how the jump ended and which steps the
//! planner chose.
//!
//! Usage:
//!   cargo run --bin test-scenarios                  # Run all scenarios
//!   cargo run --bin test-scenarios -- gaps/         # Run one category
//!   cargo run --bin test-scenarios -- --list        # Show scenarios without running
//!   cargo run --bin test-scenarios -- --verbose     # Full expected/actual on failure

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ledgehop::testing::{SCENARIOS_DIR, ScenarioReport, TestResult, parse_test_file, run_test};

struct Options {
    filter: Option<String>,
    verbose: bool,
    list: bool,
}

impl Options {
    fn from_args() -> Self {
        let mut options = Options {
            filter: None,
            verbose: false,
            list: false,
        };
        for arg in std::env::args().skip(1) {
            match arg.as_str() {
                "--verbose" | "-v" => options.verbose = true,
                "--list" | "-l" => options.list = true,
                other if !other.starts_with('-') => options.filter = Some(other.to_string()),
                other => eprintln!("Ignoring unknown flag {}", other),
            }
        }
        options
    }
}

/// Scenario files grouped by their directory under the scenarios root
fn collect_scenarios(root: &Path, filter: Option<&str>) -> BTreeMap<String, Vec<PathBuf>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for path in entries.flatten().map(|entry| entry.path()) {
            if path.is_dir() {
                pending.push(path);
                continue;
            }
            if path.extension().is_none_or(|ext| ext != "toml") {
                continue;
            }
            let rel = path.strip_prefix(root).unwrap_or(&path);
            if filter.is_some_and(|f| !rel.to_string_lossy().contains(f)) {
                continue;
            }
            let category = rel
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default();
            groups.entry(category).or_default().push(path);
        }
    }

    for paths in groups.values_mut() {
        paths.sort();
    }
    groups
}

fn scenario_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn print_report(name: &str, verdict: &str, report: &ScenarioReport) {
    let dots = ".".repeat(32 - name.len().min(31));
    println!(
        "  {} {} {:<5} {:<16} {:>5} ticks  {}",
        name,
        dots,
        verdict,
        report.outcome.label(),
        report.ticks,
        report.steps()
    );
}

fn main() {
    let options = Options::from_args();
    let root = Path::new(SCENARIOS_DIR);
    if !root.exists() {
        eprintln!("No scenarios directory at {}", SCENARIOS_DIR);
        std::process::exit(1);
    }

    let groups = collect_scenarios(root, options.filter.as_deref());
    if groups.is_empty() {
        eprintln!("No scenarios matched {:?}", options.filter.as_deref().unwrap_or("*"));
        std::process::exit(1);
    }

    println!("Jump Scenarios");
    println!("==============");

    let mut passed = 0;
    let mut failed = 0;
    let mut errors = 0;
    let mut outcomes: BTreeMap<&'static str, u32> = BTreeMap::new();

    for (category, paths) in &groups {
        println!("\n{}/", if category.is_empty() { "." } else { category });

        for path in paths {
            let name = scenario_name(path);
            let definition = match parse_test_file(path) {
                Ok(definition) => definition,
                Err(message) => {
                    println!("  {} ERROR\n    {}", name, message);
                    errors += 1;
                    continue;
                }
            };

            if options.list {
                let target = definition
                    .setup
                    .course
                    .clone()
                    .unwrap_or_else(|| "inline course".to_string());
                println!("  {:<32} {}", name, target);
                if let Some(description) = &definition.description {
                    println!("    {}", description);
                }
                continue;
            }

            match run_test(&definition) {
                TestResult::Pass { report } => {
                    print_report(&name, "PASS", &report);
                    *outcomes.entry(report.outcome.label()).or_default() += 1;
                    passed += 1;
                }
                TestResult::Fail { error, report } => {
                    print_report(&name, "FAIL", &report);
                    *outcomes.entry(report.outcome.label()).or_default() += 1;
                    if options.verbose {
                        println!("    {}", error);
                        println!("    Run ended as {}", report.describe());
                    } else {
                        println!("    {}", error.message);
                    }
                    failed += 1;
                }
                TestResult::Error { message } => {
                    println!("  {} ERROR\n    {}", name, message);
                    errors += 1;
                }
            }
        }
    }

    if options.list {
        return;
    }

    println!("\n==============");
    println!("Results: {} passed, {} failed, {} errors", passed, failed, errors);
    let tally: Vec<String> = outcomes
        .iter()
        .map(|(label, count)| format!("{} {}", label, count))
        .collect();
    if !tally.is_empty() {
        println!("Outcomes: {}", tally.join(", "));
    }

    if failed > 0 || errors > 0 {
        std::process::exit(1);
    }
}
