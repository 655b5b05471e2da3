//! Per-tick inputs and outputs of the maneuver handlers
//!
//! Handlers never touch the avatar. They read a [`TickContext`] and return a
//! [`ControlFrame`] describing the keys, yaw and countdowns the executor
//! should apply.

use crate::analysis::JumpGeometry;
use crate::avatar::InputState;
use crate::constants::{ARRIVAL_BACK_TICKS, ARRIVAL_CROUCH_TICKS};
use crate::helpers::{wrap_degrees, yaw_difference, yaw_towards};
use crate::planning::cell_after_last_obstruction;
use crate::terrain::{Cell, Point, TerrainQuery};

/// Where a step is headed, resolved once when the step begins
#[derive(Debug, Clone, PartialEq)]
pub struct StepTargets {
    pub run_start: Point,
    pub launch: Point,
    pub landing: Point,
    pub launch_cell: Cell,
    /// Gap used to decide whether to sprint
    pub jump_gap: f64,
    /// Cell just past the last head-height obstruction, if any
    pub carry_cell: Option<Cell>,
}

impl StepTargets {
    pub fn from_geometry(terrain: &dyn TerrainQuery, geometry: &JumpGeometry) -> Self {
        Self {
            run_start: geometry.run_start,
            launch: geometry.launch,
            landing: geometry.landing,
            launch_cell: geometry.launch_cell,
            jump_gap: geometry.horizontal_distance,
            carry_cell: cell_after_last_obstruction(terrain, geometry.launch_cell, geometry.landing_cell),
        }
    }

    /// Dominant horizontal axis of the jump (0 = X, 2 = Z) and its sign
    pub fn dominant_axis(&self) -> (usize, f64) {
        let dx = self.landing.x - (self.launch_cell.x as f64 + 0.5);
        let dz = self.landing.z - (self.launch_cell.z as f64 + 0.5);
        if dx.abs() > dz.abs() { (0, dx.signum()) } else { (2, dz.signum()) }
    }
}

/// What the avatar looks like at the start of a handler call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvatarSnapshot {
    pub position: Point,
    pub yaw: f32,
    pub on_ground: bool,
    pub climbing: bool,
    pub at_ledge: bool,
}

pub struct TickContext<'a> {
    pub targets: &'a StepTargets,
    pub avatar: AvatarSnapshot,
    /// Keys the executor is holding going into this tick
    pub held: InputState,
    pub tween_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenCommand {
    Start(f32),
    Stop,
}

/// Commands produced by one handler call
#[derive(Debug, Clone, PartialEq)]
pub struct ControlFrame {
    /// Full key state to hold after this tick
    pub keys: InputState,
    /// Immediate yaw snap
    pub yaw: Option<f32>,
    pub pitch: Option<f32>,
    pub tween: Option<TweenCommand>,
    pub crouch_countdown: Option<u32>,
    pub back_countdown: Option<u32>,
}

impl ControlFrame {
    pub fn new(held: InputState) -> Self {
        Self {
            keys: held,
            yaw: None,
            pitch: None,
            tween: None,
            crouch_countdown: None,
            back_countdown: None,
        }
    }

    pub fn stop_all(&mut self) {
        self.keys = InputState::default();
    }

    pub fn release_directions(&mut self) {
        self.keys.forward = false;
        self.keys.back = false;
        self.keys.left = false;
        self.keys.right = false;
    }

    /// Turn toward `target_yaw` with the tween. Returns true once the error is
    /// under `tolerance`, stopping any running tween.
    pub fn aim(&mut self, ctx: &TickContext, target_yaw: f32, tolerance: f32) -> bool {
        let error = yaw_difference(wrap_degrees(ctx.avatar.yaw), target_yaw);
        if error.abs() < tolerance {
            self.tween = Some(TweenCommand::Stop);
            true
        } else {
            if !ctx.tween_active {
                self.tween = Some(TweenCommand::Start(target_yaw));
            }
            false
        }
    }

    /// Snap to face a point
    pub fn face(&mut self, from: Point, to: Point) {
        self.yaw = Some(yaw_towards(from, to));
    }

    /// Let go on arrival: brief forced crouch, plus a brief backward nudge
    /// when the jump key was still held.
    pub fn arrive(&mut self, jump_held: bool) {
        self.stop_all();
        self.keys.crouch = true;
        self.crouch_countdown = Some(ARRIVAL_CROUCH_TICKS);
        if jump_held {
            self.keys.back = true;
            self.back_countdown = Some(ARRIVAL_BACK_TICKS);
        } else {
            self.back_countdown = Some(0);
        }
    }
}

/// Outcome of advancing a maneuver by one tick
#[derive(Debug, Clone, PartialEq)]
pub enum Progress<S> {
    Continue(S),
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::{DVec3, IVec3};

    fn targets() -> StepTargets {
        StepTargets {
            run_start: DVec3::new(-5.5, 1.0, 0.5),
            launch: DVec3::new(1.3, 1.0, 0.5),
            landing: DVec3::new(3.5, 1.0, 0.5),
            launch_cell: IVec3::new(0, 1, 0),
            jump_gap: 2.0,
            carry_cell: None,
        }
    }

    fn context(targets: &StepTargets, yaw: f32, tween_active: bool) -> TickContext<'_> {
        TickContext {
            targets,
            avatar: AvatarSnapshot {
                position: DVec3::new(0.5, 1.0, 0.5),
                yaw,
                on_ground: true,
                climbing: false,
                at_ledge: false,
            },
            held: InputState::default(),
            tween_active,
        }
    }

    #[test]
    fn test_aim_starts_tween_once() {
        let targets = targets();
        let mut frame = ControlFrame::new(InputState::default());
        assert!(!frame.aim(&context(&targets, 0.0, false), -90.0, 3.0));
        assert_eq!(frame.tween, Some(TweenCommand::Start(-90.0)));

        let mut busy = ControlFrame::new(InputState::default());
        assert!(!busy.aim(&context(&targets, 0.0, true), -90.0, 3.0));
        assert_eq!(busy.tween, None);
    }

    #[test]
    fn test_aim_within_tolerance_stops_tween() {
        let targets = targets();
        let mut frame = ControlFrame::new(InputState::default());
        assert!(frame.aim(&context(&targets, 358.5, true), 0.0, 3.0));
        assert_eq!(frame.tween, Some(TweenCommand::Stop));
    }

    #[test]
    fn test_arrive_nudges_back_only_mid_jump() {
        let held = InputState {
            forward: true,
            sprint: true,
            jump: true,
            ..InputState::default()
        };
        let mut frame = ControlFrame::new(held);
        frame.arrive(true);
        assert!(frame.keys.crouch && frame.keys.back);
        assert!(!frame.keys.forward && !frame.keys.jump && !frame.keys.sprint);
        assert_eq!(frame.back_countdown, Some(ARRIVAL_BACK_TICKS));

        let mut frame = ControlFrame::new(held);
        frame.arrive(false);
        assert!(!frame.keys.back);
        assert_eq!(frame.crouch_countdown, Some(ARRIVAL_CROUCH_TICKS));
        assert_eq!(frame.back_countdown, Some(0));
    }

    #[test]
    fn test_dominant_axis() {
        let mut targets = targets();
        assert_eq!(targets.dominant_axis(), (0, 1.0));
        targets.landing = DVec3::new(0.5, 1.0, -3.5);
        assert_eq!(targets.dominant_axis(), (2, -1.0));
    }
}
