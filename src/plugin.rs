//! Bevy integration - drives a [`JumpSession`] from `FixedUpdate`
//!
//! The host inserts [`CourseTerrain`] and [`AvatarBody`], queues
//! [`JumpCommand`]s, and reads [`JumpStatus`]. One fixed tick runs commands,
//! then the session, then avatar physics.

use bevy::prelude::*;

use crate::analysis::JumpGeometry;
use crate::avatar::SimulatedAvatar;
use crate::session::{JumpSession, TickOutcome};
use crate::terrain::{Cell, VoxelGrid};
use crate::tuning::JumpTuning;

/// Terrain the session plans against
#[derive(Resource, Clone)]
pub struct CourseTerrain(pub VoxelGrid);

/// The avatar being driven
#[derive(Resource)]
pub struct AvatarBody(pub SimulatedAvatar);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpCommand {
    /// Analyze a jump to the block at this cell
    Select(Cell),
    /// Plan and run the selected jump
    Execute,
    Cancel,
    ClearSelection,
}

/// Commands applied at the start of the next fixed tick
#[derive(Resource, Default)]
pub struct JumpCommands(Vec<JumpCommand>);

impl JumpCommands {
    pub fn push(&mut self, command: JumpCommand) {
        self.0.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Latest session state, for UI or scripted drivers
#[derive(Resource, Debug, Default)]
pub struct JumpStatus {
    pub selected: Option<JumpGeometry>,
    pub last_outcome: Option<TickOutcome>,
    pub last_error: Option<String>,
    pub status: String,
    pub ticks: u64,
}

impl JumpStatus {
    pub fn is_finished(&self) -> bool {
        matches!(
            self.last_outcome,
            Some(TickOutcome::Completed | TickOutcome::Aborted(_))
        )
    }
}

pub struct JumpAssistPlugin {
    pub tuning: JumpTuning,
}

impl Default for JumpAssistPlugin {
    fn default() -> Self {
        Self {
            tuning: JumpTuning::default(),
        }
    }
}

impl Plugin for JumpAssistPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.tuning.clone())
            .insert_resource(JumpSession::new(self.tuning.clone()))
            .init_resource::<JumpCommands>()
            .init_resource::<JumpStatus>()
            .add_systems(
                FixedUpdate,
                (apply_jump_commands, drive_jump_session, step_avatar)
                    .chain()
                    .run_if(resource_exists::<CourseTerrain>.and(resource_exists::<AvatarBody>)),
            );
    }
}

pub fn apply_jump_commands(
    mut commands: ResMut<JumpCommands>,
    mut session: ResMut<JumpSession>,
    mut status: ResMut<JumpStatus>,
    terrain: Res<CourseTerrain>,
    mut avatar: ResMut<AvatarBody>,
) {
    for command in commands.0.drain(..) {
        match command {
            JumpCommand::Select(cell) => {
                match session.select_target(&terrain.0, avatar.0.position, cell) {
                    Ok(geometry) => {
                        status.selected = Some(geometry);
                        status.last_error = None;
                    }
                    Err(e) => {
                        status.selected = None;
                        status.last_error = Some(e.to_string());
                    }
                }
            }
            JumpCommand::Execute => {
                let Some(geometry) = session.geometry().cloned() else {
                    status.last_error = Some("no target selected".to_string());
                    continue;
                };
                match session.begin_execution(&terrain.0, &geometry) {
                    Ok(_) => {
                        status.last_outcome = None;
                        status.last_error = None;
                    }
                    Err(e) => status.last_error = Some(e.to_string()),
                }
            }
            JumpCommand::Cancel => session.cancel(&mut avatar.0),
            JumpCommand::ClearSelection => {
                session.clear_selection();
                status.selected = None;
            }
        }
    }
}

pub fn drive_jump_session(
    mut session: ResMut<JumpSession>,
    mut status: ResMut<JumpStatus>,
    terrain: Res<CourseTerrain>,
    mut avatar: ResMut<AvatarBody>,
) {
    let outcome = session.tick(&terrain.0, &mut avatar.0);
    if let TickOutcome::Aborted(e) = &outcome {
        status.last_error = Some(e.to_string());
    }
    // Keep the terminal outcome visible until the next execution starts
    if outcome != TickOutcome::Idle || status.last_outcome.is_none() {
        status.last_outcome = Some(outcome);
    }
    if session.geometry().is_none() {
        status.selected = None;
    }
    status.status = session.status();
    status.ticks += 1;
}

pub fn step_avatar(terrain: Res<CourseTerrain>, mut avatar: ResMut<AvatarBody>) {
    avatar.0.step(&terrain.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::Step;
    use bevy::math::{DVec3, IVec3};

    use crate::terrain::Voxel;

    fn app_with_gap(gap: i32) -> App {
        let mut grid = VoxelGrid::new(-16, 32);
        grid.fill(IVec3::new(-8, 0, -1), IVec3::new(0, 0, 1), Some(Voxel::Solid));
        grid.fill(IVec3::new(gap + 1, 0, -1), IVec3::new(gap + 4, 0, 1), Some(Voxel::Solid));
        let avatar = SimulatedAvatar::new(&grid, DVec3::new(-2.5, 1.0, 0.5), -90.0);

        let mut app = App::new();
        app.add_plugins(JumpAssistPlugin::default());
        app.insert_resource(CourseTerrain(grid));
        app.insert_resource(AvatarBody(avatar));
        app
    }

    fn fixed_tick(app: &mut App) {
        app.world_mut().run_schedule(FixedUpdate);
    }

    #[test]
    fn test_plugin_runs_a_jump() {
        let mut app = app_with_gap(2);
        {
            let mut commands = app.world_mut().resource_mut::<JumpCommands>();
            commands.push(JumpCommand::Select(IVec3::new(3, 0, 0)));
            commands.push(JumpCommand::Execute);
        }
        fixed_tick(&mut app);
        {
            let session = app.world().resource::<JumpSession>();
            assert_eq!(session.sequence().steps(), &[Step::MomentumRun, Step::Leap]);
        }

        for _ in 0..300 {
            if app.world().resource::<JumpStatus>().is_finished() {
                break;
            }
            fixed_tick(&mut app);
        }
        let status = app.world().resource::<JumpStatus>();
        assert_eq!(status.last_outcome, Some(TickOutcome::Completed));
        assert_eq!(status.status, "Not executing");
        assert!(status.last_error.is_none());
        assert!(status.selected.is_none());
    }

    #[test]
    fn test_execute_without_selection_reports() {
        let mut app = app_with_gap(2);
        app.world_mut()
            .resource_mut::<JumpCommands>()
            .push(JumpCommand::Execute);
        fixed_tick(&mut app);
        let status = app.world().resource::<JumpStatus>();
        assert_eq!(status.last_error.as_deref(), Some("no target selected"));
        assert!(!app.world().resource::<JumpSession>().is_executing());
    }

    #[test]
    fn test_walkable_target_reports_error() {
        let mut app = app_with_gap(2);
        app.world_mut()
            .resource_mut::<JumpCommands>()
            .push(JumpCommand::Select(IVec3::new(-6, 0, 0)));
        fixed_tick(&mut app);
        let status = app.world().resource::<JumpStatus>();
        assert!(status.selected.is_none());
        assert_eq!(
            status.last_error.as_deref(),
            Some("target is reachable by walking, no jump needed")
        );
    }

    #[test]
    fn test_cancel_command_stops_execution() {
        let mut app = app_with_gap(2);
        {
            let mut commands = app.world_mut().resource_mut::<JumpCommands>();
            commands.push(JumpCommand::Select(IVec3::new(3, 0, 0)));
            commands.push(JumpCommand::Execute);
        }
        fixed_tick(&mut app);
        fixed_tick(&mut app);
        app.world_mut()
            .resource_mut::<JumpCommands>()
            .push(JumpCommand::Cancel);
        fixed_tick(&mut app);

        assert!(!app.world().resource::<JumpSession>().is_executing());
        assert!(!app.world().resource::<AvatarBody>().0.input.any_held());
    }
}
