//! Leap: steer the jump onto the landing and stop on arrival

use super::frame::{ControlFrame, Progress, TickContext};
use crate::constants::{LEAP_THRESHOLD, NO_SPRINT_GAP};
use crate::helpers::horizontal_distance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Leap;

impl Leap {
    pub fn advance(self, ctx: &TickContext) -> (Progress<Self>, ControlFrame) {
        let mut frame = ControlFrame::new(ctx.held);
        let position = ctx.avatar.position;
        let landing = ctx.targets.landing;

        if horizontal_distance(position, landing) > LEAP_THRESHOLD {
            frame.face(position, landing);
            frame.keys.forward = true;
            frame.keys.sprint = ctx.targets.jump_gap > NO_SPRINT_GAP;
            if ctx.avatar.climbing {
                // Hold on to the ladder instead of hopping off it
                frame.keys.crouch = true;
                frame.keys.jump = false;
            } else {
                frame.keys.crouch = false;
            }
            return (Progress::Continue(self), frame);
        }

        frame.arrive(ctx.held.jump);
        (Progress::Done, frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::InputState;
    use crate::constants::ARRIVAL_BACK_TICKS;
    use crate::execution::frame::{AvatarSnapshot, StepTargets};
    use bevy::math::{DVec3, IVec3};

    fn targets() -> StepTargets {
        StepTargets {
            run_start: DVec3::new(-5.5, 1.0, 0.5),
            launch: DVec3::new(1.3, 1.0, 0.5),
            landing: DVec3::new(4.5, 1.0, 0.5),
            launch_cell: IVec3::new(0, 1, 0),
            jump_gap: 3.0,
            carry_cell: None,
        }
    }

    fn context(targets: &StepTargets, x: f64, climbing: bool, held: InputState) -> TickContext<'_> {
        TickContext {
            targets,
            avatar: AvatarSnapshot {
                position: DVec3::new(x, 1.5, 0.5),
                yaw: -90.0,
                on_ground: false,
                climbing,
                at_ledge: false,
            },
            held,
            tween_active: false,
        }
    }

    fn jumping() -> InputState {
        InputState {
            forward: true,
            jump: true,
            ..InputState::default()
        }
    }

    #[test]
    fn test_steers_while_far() {
        let targets = targets();
        let (next, frame) = Leap.advance(&context(&targets, 2.0, false, jumping()));
        assert_eq!(next, Progress::Continue(Leap));
        assert!(frame.keys.forward && frame.keys.sprint && frame.keys.jump);
        assert!(!frame.keys.crouch);
        assert_eq!(frame.yaw, Some(-90.0));
    }

    #[test]
    fn test_climbing_suppresses_jump() {
        let targets = targets();
        let (_, frame) = Leap.advance(&context(&targets, 2.0, true, jumping()));
        assert!(frame.keys.crouch);
        assert!(!frame.keys.jump);
    }

    #[test]
    fn test_arrival_mid_jump_brakes() {
        let targets = targets();
        let (next, frame) = Leap.advance(&context(&targets, 3.8, false, jumping()));
        assert_eq!(next, Progress::Done);
        assert!(frame.keys.back && frame.keys.crouch);
        assert!(!frame.keys.forward && !frame.keys.jump);
        assert_eq!(frame.back_countdown, Some(ARRIVAL_BACK_TICKS));
    }

    #[test]
    fn test_arrival_without_jump_only_crouches() {
        let targets = targets();
        let (_, frame) = Leap.advance(&context(&targets, 3.8, false, InputState::default()));
        assert!(frame.keys.crouch);
        assert!(!frame.keys.back);
    }
}
