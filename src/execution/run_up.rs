//! RunUp: walk back to the far end of the run-up line

use bevy::log::debug;

use super::frame::{ControlFrame, Progress, TickContext};
use crate::constants::{RUN_UP_AIM_TOLERANCE, RUN_UP_NEARBY_THRESHOLD, RUN_UP_PRECISE_THRESHOLD};
use crate::helpers::{horizontal_distance, yaw_towards};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunUpPhase {
    /// Tween to face the run-up start
    Aim,
    /// Walk until nearby
    Approach,
    /// Crouch-walk onto the exact spot
    Creep,
}

impl RunUpPhase {
    pub fn advance(self, ctx: &TickContext) -> (Progress<Self>, ControlFrame) {
        let mut frame = ControlFrame::new(ctx.held);
        let position = ctx.avatar.position;
        let target = ctx.targets.run_start;
        let distance = horizontal_distance(position, target);

        let next = match self {
            RunUpPhase::Aim => {
                frame.pitch = Some(0.0);
                if frame.aim(ctx, yaw_towards(position, target), RUN_UP_AIM_TOLERANCE) {
                    debug!("run-up aimed");
                    Progress::Continue(RunUpPhase::Approach)
                } else {
                    Progress::Continue(RunUpPhase::Aim)
                }
            }
            RunUpPhase::Approach => {
                if distance > RUN_UP_NEARBY_THRESHOLD {
                    frame.keys.forward = true;
                    Progress::Continue(RunUpPhase::Approach)
                } else {
                    frame.keys.forward = false;
                    Progress::Continue(RunUpPhase::Creep)
                }
            }
            RunUpPhase::Creep => {
                frame.keys.crouch = true;
                if distance > RUN_UP_PRECISE_THRESHOLD {
                    frame.face(position, target);
                    frame.keys.forward = true;
                    Progress::Continue(RunUpPhase::Creep)
                } else {
                    frame.stop_all();
                    Progress::Done
                }
            }
        };
        (next, frame)
    }
}
