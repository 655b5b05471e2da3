//! Headless App Builder
//!
//! Builds a headless Bevy app that runs one course through the
//! [`JumpAssistPlugin`]. Every `app.update()` advances exactly one fixed
//! tick, so runs are deterministic.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

use crate::avatar::SimulatedAvatar;
use crate::constants::TICK_MILLIS;
use crate::plugin::{AvatarBody, CourseTerrain, JumpAssistPlugin};
use crate::tuning::JumpTuning;

use super::courses::CourseData;

/// Builder for creating headless Bevy apps
pub struct HeadlessAppBuilder {
    course: CourseData,
    tuning: JumpTuning,
    minimal_threads: bool,
}

impl HeadlessAppBuilder {
    pub fn new(course: CourseData) -> Self {
        Self {
            course,
            tuning: JumpTuning::default(),
            minimal_threads: false,
        }
    }

    pub fn with_tuning(mut self, tuning: JumpTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Enable minimal thread mode (task pools = 1)
    ///
    /// Use this when running many apps in parallel to avoid hitting OS thread limits.
    pub fn with_minimal_threads(mut self) -> Self {
        self.minimal_threads = true;
        self
    }

    /// Build the app with minimal plugins, the jump plugin and the course
    /// resources. Callers queue `JumpCommand`s and call `app.update()`.
    pub fn build(self) -> App {
        let tick = Duration::from_millis(TICK_MILLIS);
        let mut app = App::new();

        if self.minimal_threads {
            app.add_plugins(
                MinimalPlugins
                    .set(ScheduleRunnerPlugin::run_loop(tick))
                    .set(TaskPoolPlugin {
                        task_pool_options: TaskPoolOptions::with_num_threads(1),
                    }),
            );
        } else {
            app.add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(tick)));
        }

        // One fixed step per update regardless of wall-clock time
        app.insert_resource(TimeUpdateStrategy::ManualDuration(tick));
        app.insert_resource(Time::<Fixed>::from_duration(tick));

        app.add_plugins(JumpAssistPlugin {
            tuning: self.tuning,
        });
        let avatar = SimulatedAvatar::new(&self.course.grid, self.course.spawn, self.course.yaw);
        app.insert_resource(AvatarBody(avatar));
        app.insert_resource(CourseTerrain(self.course.grid));
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{JumpCommand, JumpCommands, JumpStatus};
    use crate::session::TickOutcome;
    use crate::simulation::courses::CourseDatabase;

    #[test]
    fn test_builder_creates_app() {
        let course = CourseDatabase::default_courses().courses.remove(0);
        let app = HeadlessAppBuilder::new(course).with_minimal_threads().build();
        assert!(app.world().contains_resource::<CourseTerrain>());
        assert!(app.world().contains_resource::<AvatarBody>());
        assert!(app.world().contains_resource::<JumpStatus>());
    }

    #[test]
    fn test_headless_app_completes_course() {
        let course = CourseDatabase::default_courses().courses.remove(0);
        let target = course.target;
        let mut app = HeadlessAppBuilder::new(course).build();
        {
            let mut commands = app.world_mut().resource_mut::<JumpCommands>();
            commands.push(JumpCommand::Select(target));
            commands.push(JumpCommand::Execute);
        }

        for _ in 0..400 {
            app.update();
            if app.world().resource::<JumpStatus>().is_finished() {
                break;
            }
        }
        let status = app.world().resource::<JumpStatus>();
        assert_eq!(status.last_outcome, Some(TickOutcome::Completed));
    }
}
