//! SafeCornerApproach: square up and tuck into a corner of the launch cell
//!
//! Squares the yaw to the nearest right angle toward the landing, then
//! crouch-strafes until the edge guard pins the avatar in place. The forward
//! variant tucks into the front-right corner and finishes with a short
//! back-right nudge; the reversed variant tucks into the back-left corner and
//! skips the nudge.

use bevy::log::debug;

use super::frame::{ControlFrame, Progress, TickContext};
use crate::constants::*;
use crate::helpers::{round_to_right_angle, wrap_degrees, yaw_towards};
use crate::terrain::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CornerPhase {
    Aim,
    Strafe { last_position: Option<Point> },
    Nudge { ticks_left: u32 },
    Settle { ticks_left: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeCorner {
    pub reversed: bool,
    pub phase: CornerPhase,
}

impl SafeCorner {
    pub fn new(reversed: bool) -> Self {
        Self {
            reversed,
            phase: CornerPhase::Aim,
        }
    }

    pub fn advance(self, ctx: &TickContext) -> (Progress<Self>, ControlFrame) {
        let mut frame = ControlFrame::new(ctx.held);
        let position = ctx.avatar.position;

        let phase = match self.phase {
            CornerPhase::Aim => {
                frame.pitch = Some(0.0);
                let square = round_to_right_angle(yaw_towards(position, ctx.targets.landing));
                if frame.aim(ctx, square, CORNER_AIM_TOLERANCE) {
                    frame.yaw = Some(square);
                    CornerPhase::Strafe { last_position: None }
                } else {
                    CornerPhase::Aim
                }
            }
            CornerPhase::Strafe { last_position } => {
                let settled = last_position
                    .is_some_and(|last| last.distance(position) < CORNER_STABLE_EPSILON);
                if settled {
                    frame.release_directions();
                    debug!("tucked into corner (reversed: {})", self.reversed);
                    if self.reversed {
                        CornerPhase::Settle {
                            ticks_left: CORNER_SETTLE_TICKS,
                        }
                    } else {
                        CornerPhase::Nudge {
                            ticks_left: CORNER_NUDGE_TICKS,
                        }
                    }
                } else {
                    if self.reversed {
                        frame.keys.back = true;
                        frame.keys.left = true;
                    } else {
                        frame.keys.forward = true;
                        frame.keys.right = true;
                    }
                    frame.keys.crouch = true;
                    CornerPhase::Strafe {
                        last_position: Some(position),
                    }
                }
            }
            CornerPhase::Nudge { ticks_left } => {
                let ticks_left = ticks_left.saturating_sub(1);
                frame.keys.back = true;
                frame.keys.right = true;
                let drift = CORNER_NUDGE_ROTATION / CORNER_NUDGE_TICKS as f32;
                frame.yaw = Some(wrap_degrees(ctx.avatar.yaw + drift));
                if ticks_left == 0 {
                    frame.keys.back = false;
                    frame.keys.right = false;
                    CornerPhase::Settle {
                        ticks_left: CORNER_SETTLE_TICKS,
                    }
                } else {
                    CornerPhase::Nudge { ticks_left }
                }
            }
            CornerPhase::Settle { ticks_left } => {
                let ticks_left = ticks_left.saturating_sub(1);
                if ticks_left == 0 {
                    frame.keys.crouch = false;
                    return (Progress::Done, frame);
                }
                CornerPhase::Settle { ticks_left }
            }
        };
        (Progress::Continue(Self { phase, ..self }), frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::InputState;
    use crate::execution::frame::{AvatarSnapshot, StepTargets, TweenCommand};
    use bevy::math::{DVec3, IVec3};

    fn targets() -> StepTargets {
        StepTargets {
            run_start: DVec3::new(0.5, 1.0, 0.5),
            launch: DVec3::new(1.3, 1.0, 0.5),
            landing: DVec3::new(4.5, 1.0, 1.2),
            launch_cell: IVec3::new(0, 1, 0),
            jump_gap: 3.0,
            carry_cell: None,
        }
    }

    fn context(targets: &StepTargets, position: DVec3, yaw: f32) -> TickContext<'_> {
        TickContext {
            targets,
            avatar: AvatarSnapshot {
                position,
                yaw,
                on_ground: true,
                climbing: false,
                at_ledge: false,
            },
            held: InputState::default(),
            tween_active: false,
        }
    }

    fn unwrap(progress: Progress<SafeCorner>) -> SafeCorner {
        match progress {
            Progress::Continue(state) => state,
            Progress::Done => panic!("finished early"),
        }
    }

    #[test]
    fn test_aims_at_right_angle() {
        let targets = targets();
        let start = DVec3::new(0.5, 1.0, 0.5);
        let (next, frame) = SafeCorner::new(false).advance(&context(&targets, start, 10.0));
        assert_eq!(unwrap(next).phase, CornerPhase::Aim);
        assert_eq!(frame.tween, Some(TweenCommand::Start(-90.0)));

        let (next, _) = SafeCorner::new(false).advance(&context(&targets, start, -90.05));
        assert_eq!(unwrap(next).phase, CornerPhase::Strafe { last_position: None });
    }

    #[test]
    fn test_forward_variant_runs_all_phases() {
        let targets = targets();
        let corner = DVec3::new(1.25, 1.0, 0.25);
        let mut state = SafeCorner {
            reversed: false,
            phase: CornerPhase::Strafe { last_position: None },
        };
        let (next, frame) = state.advance(&context(&targets, corner, -90.0));
        assert!(frame.keys.forward && frame.keys.right && frame.keys.crouch);
        state = unwrap(next);

        let (next, frame) = state.advance(&context(&targets, corner, -90.0));
        assert!(!frame.keys.forward && !frame.keys.right);
        state = unwrap(next);
        assert_eq!(state.phase, CornerPhase::Nudge { ticks_left: CORNER_NUDGE_TICKS });

        let mut yaw = -90.0;
        for _ in 0..CORNER_NUDGE_TICKS {
            let (next, frame) = state.advance(&context(&targets, corner, yaw));
            yaw = frame.yaw.unwrap();
            state = unwrap(next);
        }
        assert!((yaw - (-90.0 + CORNER_NUDGE_ROTATION)).abs() < 1e-3);
        assert_eq!(state.phase, CornerPhase::Settle { ticks_left: CORNER_SETTLE_TICKS });

        let mut finished = false;
        for _ in 0..CORNER_SETTLE_TICKS {
            let (next, frame) = state.advance(&context(&targets, corner, yaw));
            match next {
                Progress::Continue(s) => state = s,
                Progress::Done => {
                    assert!(!frame.keys.crouch);
                    finished = true;
                }
            }
        }
        assert!(finished);
    }

    #[test]
    fn test_reversed_variant_skips_nudge() {
        let targets = targets();
        let corner = DVec3::new(-0.25, 1.0, 0.75);
        let state = SafeCorner {
            reversed: true,
            phase: CornerPhase::Strafe { last_position: None },
        };
        let (next, frame) = state.advance(&context(&targets, corner, -90.0));
        assert!(frame.keys.back && frame.keys.left);
        let (next, _) = unwrap(next).advance(&context(&targets, corner, -90.0));
        assert_eq!(unwrap(next).phase, CornerPhase::Settle { ticks_left: CORNER_SETTLE_TICKS });
    }
}
