//! Execution module - drives the avatar through one step at a time
//!
//! Each tick the executor first runs its timers (yaw tween, forced crouch,
//! forced backward nudge), then lets the active maneuver produce a
//! [`ControlFrame`] and applies it to the avatar. The timers keep running
//! after a step, or the whole sequence, has finished.

pub mod corner;
pub mod frame;
pub mod leap;
pub mod maneuver;
pub mod momentum_run;
pub mod obstructed_leap;
pub mod rotation;
pub mod run_up;

use bevy::log::debug;
use thiserror::Error;

pub use frame::{AvatarSnapshot, ControlFrame, Progress, StepTargets, TickContext, TweenCommand};
pub use maneuver::{ExecutionState, Maneuver};
pub use rotation::RotationTween;

use crate::avatar::{AvatarControl, InputState, is_at_ledge};
use crate::planning::Step;
use crate::terrain::TerrainQuery;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("lost jump data during execution")]
    LostGeometryDuringExecution,
}

#[derive(Debug, Default)]
pub struct ManeuverExecutor {
    state: ExecutionState,
    targets: Option<StepTargets>,
    tween: Option<RotationTween>,
    held: InputState,
    crouch_countdown: u32,
    back_countdown: u32,
}

impl ManeuverExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a step. The previous step's keys stay held; countdowns keep
    /// running.
    pub fn begin_step(&mut self, step: Step, targets: StepTargets) {
        debug!("begin step {}", step);
        self.state = ExecutionState::Active {
            step,
            maneuver: Maneuver::for_step(step),
        };
        self.targets = Some(targets);
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn current_step(&self) -> Option<Step> {
        self.state.step()
    }

    /// Keys the executor currently holds
    pub fn held(&self) -> InputState {
        self.held
    }

    pub fn is_step_complete(&self) -> bool {
        !self.state.is_active()
    }

    pub fn is_rotating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn countdowns(&self) -> (u32, u32) {
        (self.crouch_countdown, self.back_countdown)
    }

    /// Advance timers and the active maneuver by one tick
    pub fn tick(&mut self, terrain: &dyn TerrainQuery, avatar: &mut dyn AvatarControl) {
        self.run_timers(avatar);

        let (step, maneuver) = match std::mem::take(&mut self.state) {
            ExecutionState::Active { step, maneuver } => (step, maneuver),
            other => {
                self.state = other;
                return;
            }
        };
        let Some(targets) = self.targets.as_ref() else {
            self.state = ExecutionState::Complete { step };
            return;
        };

        let position = avatar.position();
        let on_ground = avatar.on_ground();
        let ctx = TickContext {
            targets,
            avatar: AvatarSnapshot {
                position,
                yaw: avatar.yaw(),
                on_ground,
                climbing: avatar.is_climbing(),
                at_ledge: is_at_ledge(terrain, position, on_ground, self.held.jump, self.held.crouch),
            },
            held: self.held,
            tween_active: self.tween.is_some(),
        };

        let (progress, frame) = maneuver.advance(&ctx);
        self.apply(frame, avatar);
        self.state = match progress {
            Progress::Continue(maneuver) => ExecutionState::Active { step, maneuver },
            Progress::Done => {
                debug!("step {} complete", step);
                ExecutionState::Complete { step }
            }
        };
    }

    /// Drop the active step and release every key. Timers are cleared too.
    pub fn cancel(&mut self, avatar: &mut dyn AvatarControl) {
        self.state = ExecutionState::Idle;
        self.targets = None;
        self.tween = None;
        self.crouch_countdown = 0;
        self.back_countdown = 0;
        self.stop_all_movement(avatar);
    }

    /// Release every movement key
    pub fn stop_all_movement(&mut self, avatar: &mut dyn AvatarControl) {
        avatar.set_forward(false);
        avatar.set_back(false);
        avatar.set_left(false);
        avatar.set_right(false);
        avatar.set_sprint(false);
        avatar.set_crouch(false);
        avatar.set_jump(false);
        self.held = InputState::default();
    }

    fn run_timers(&mut self, avatar: &mut dyn AvatarControl) {
        if let Some(tween) = self.tween.as_mut() {
            if let Some(yaw) = tween.advance() {
                avatar.set_yaw(yaw);
            }
            if tween.is_finished() {
                self.tween = None;
            }
        }
        if self.crouch_countdown > 0 {
            self.crouch_countdown -= 1;
            if self.crouch_countdown == 0 {
                self.held.crouch = false;
                avatar.set_crouch(false);
            }
        }
        if self.back_countdown > 0 {
            self.back_countdown -= 1;
            if self.back_countdown == 0 {
                self.held.back = false;
                avatar.set_back(false);
            }
        }
    }

    fn apply(&mut self, frame: ControlFrame, avatar: &mut dyn AvatarControl) {
        let keys = frame.keys;
        let held = self.held;
        if keys.forward != held.forward {
            avatar.set_forward(keys.forward);
        }
        if keys.back != held.back {
            avatar.set_back(keys.back);
        }
        if keys.left != held.left {
            avatar.set_left(keys.left);
        }
        if keys.right != held.right {
            avatar.set_right(keys.right);
        }
        if keys.sprint != held.sprint {
            avatar.set_sprint(keys.sprint);
        }
        if keys.crouch != held.crouch {
            avatar.set_crouch(keys.crouch);
        }
        if keys.jump != held.jump {
            avatar.set_jump(keys.jump);
        }
        self.held = keys;

        if let Some(yaw) = frame.yaw {
            avatar.set_yaw(yaw);
        }
        if let Some(pitch) = frame.pitch {
            avatar.set_pitch(pitch);
        }
        match frame.tween {
            Some(TweenCommand::Start(target)) => self.tween = Some(RotationTween::new(avatar.yaw(), target)),
            Some(TweenCommand::Stop) => self.tween = None,
            None => {}
        }
        if let Some(ticks) = frame.crouch_countdown {
            self.crouch_countdown = ticks;
        }
        if let Some(ticks) = frame.back_countdown {
            self.back_countdown = ticks;
        }
    }
}
