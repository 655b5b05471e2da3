//! Ledgehop - voxel jump assistance demo
//!
//! Runs one course through the Bevy jump plugin with logging enabled and
//! prints the session's event log.
//!
//! Usage:
//!   cargo run                      # First course in config/courses.txt
//!   cargo run -- "Triple pattern"  # Named course
//!   cargo run -- --list

use bevy::log::LogPlugin;
use bevy::prelude::*;

use ledgehop::constants::{SIM_MAX_TICKS, SIM_SETTLE_TICKS};
use ledgehop::plugin::{AvatarBody, JumpCommand, JumpCommands, JumpStatus};
use ledgehop::session::JumpSession;
use ledgehop::simulation::{COURSES_FILE, CourseDatabase, HeadlessAppBuilder};
use ledgehop::tuning::{JUMP_TUNING_FILE, load_jump_tuning};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let db = CourseDatabase::load_from_file(COURSES_FILE);

    if args.iter().any(|a| a == "--list") {
        for course in &db.courses {
            println!("{}", course.name);
        }
        return;
    }

    let course = match args.get(1) {
        Some(name) => db.find(name).cloned(),
        None => db.get(0).cloned(),
    };
    let Some(course) = course else {
        eprintln!("No course named '{}' (try --list)", args[1..].join(" "));
        std::process::exit(1);
    };

    println!("Course: {}", course.name);
    let target = course.target;
    let mut app = HeadlessAppBuilder::new(course)
        .with_tuning(load_jump_tuning(JUMP_TUNING_FILE))
        .build();
    app.add_plugins(LogPlugin::default());

    {
        let mut commands = app.world_mut().resource_mut::<JumpCommands>();
        commands.push(JumpCommand::Select(target));
        commands.push(JumpCommand::Execute);
    }

    let mut ticks = 0;
    while ticks < SIM_MAX_TICKS {
        app.update();
        ticks += 1;
        let status = app.world().resource::<JumpStatus>();
        if status.is_finished() || status.last_error.is_some() {
            break;
        }
        if ticks % 10 == 0 {
            info!("{}", status.status);
        }
    }
    for _ in 0..SIM_SETTLE_TICKS {
        app.update();
    }

    let status = app.world().resource::<JumpStatus>();
    match &status.last_error {
        Some(error) => println!("Failed: {}", error),
        None => println!("Outcome: {:?} after {} ticks", status.last_outcome, ticks),
    }
    let avatar = &app.world().resource::<AvatarBody>().0;
    println!(
        "Avatar at ({:.2}, {:.2}, {:.2}), on ground: {}",
        avatar.position.x, avatar.position.y, avatar.position.z, avatar.on_ground
    );
    println!("{}", app.world().resource::<JumpSession>().events().summary());
}
