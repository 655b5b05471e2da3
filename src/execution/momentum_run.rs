//! MomentumRun: sprint along the run-up and leave the launch cell at its edge
//!
//! Coming within the threshold of the launch point only arms the step.
//! It finishes when the avatar, armed, reaches the ledge. Overshooting the
//! launch point is expected and tolerated.

use bevy::log::debug;

use super::frame::{ControlFrame, Progress, TickContext, TweenCommand};
use crate::constants::{MOMENTUM_AIM_TOLERANCE, MOMENTUM_REAIM_ANGLE, MOMENTUM_THRESHOLD, NO_SPRINT_GAP};
use crate::helpers::{horizontal_distance, wrap_degrees, yaw_difference, yaw_towards};
use crate::terrain::Point;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MomentumRun {
    pub entered_threshold: bool,
    /// Last position seen with ground still under the whole hitbox
    pub last_supported: Option<Point>,
}

impl MomentumRun {
    pub fn advance(mut self, ctx: &TickContext) -> (Progress<Self>, ControlFrame) {
        let mut frame = ControlFrame::new(ctx.held);
        let position = ctx.avatar.position;
        let targets = ctx.targets;
        let sprint = targets.jump_gap > NO_SPRINT_GAP;

        if !self.entered_threshold && horizontal_distance(position, targets.launch) <= MOMENTUM_THRESHOLD {
            debug!("momentum run entered launch threshold");
            self.entered_threshold = true;
        }
        if !ctx.avatar.at_ledge {
            self.last_supported = Some(position);
        }

        if ctx.avatar.at_ledge && self.last_supported.is_some() && self.entered_threshold {
            frame.tween = Some(TweenCommand::Stop);
            frame.face(position, targets.landing);
            frame.keys.sprint = sprint;
            frame.keys.jump = true;
            return (Progress::Done, frame);
        }

        let heading_target = if self.entered_threshold { targets.landing } else { targets.launch };
        let target_yaw = yaw_towards(position, heading_target);
        let error = yaw_difference(wrap_degrees(ctx.avatar.yaw), target_yaw).abs();
        frame.aim(ctx, target_yaw, MOMENTUM_AIM_TOLERANCE);

        if error > MOMENTUM_REAIM_ANGLE && !self.entered_threshold {
            frame.keys.forward = false;
            return (Progress::Continue(self), frame);
        }
        frame.keys.sprint = sprint;
        frame.keys.forward = true;
        (Progress::Continue(self), frame)
    }
}
