//! Jump Simulation Tool - headless jump runs over voxel courses
//!
//! Plays each course through a jump session and a simulated avatar, then
//! reports how many jumps landed.
//!
//! Usage:
//!   cargo run --bin simulate -- --help
//!   cargo run --bin simulate -- --course "Two gap"
//!   cargo run --bin simulate -- --random 200 --seed 7 --parallel 8 --quiet

use ledgehop::simulation::{SimConfig, print_help, run_simulation};

fn main() {
    let config = SimConfig::from_args();
    if config.show_help {
        print_help();
        return;
    }

    match run_simulation(config) {
        Ok(metrics) => {
            if metrics.landed < metrics.total {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            std::process::exit(2);
        }
    }
}
