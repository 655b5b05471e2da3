//! Obstructed leaps: hop out around a head-height wall and swing back in
//!
//! Shared by the short and the triple-pattern variants; they differ only in
//! the corner approach that precedes them.

use bevy::log::debug;

use super::frame::{ControlFrame, Progress, TickContext};
use crate::constants::*;
use crate::helpers::{horizontal_distance, round_to_right_angle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstructedLeapPhase {
    /// Sprint forward, jumping from the second tick on, until the avatar
    /// leaves the middle of the launch cell
    Burst { ticks: u32 },
    /// Jump released, heading squared, carried past the obstruction
    Carry,
    /// Steer onto the landing and stop
    Finish,
}

impl Default for ObstructedLeapPhase {
    fn default() -> Self {
        ObstructedLeapPhase::Burst { ticks: 0 }
    }
}

impl ObstructedLeapPhase {
    pub fn advance(self, ctx: &TickContext) -> (Progress<Self>, ControlFrame) {
        let mut frame = ControlFrame::new(ctx.held);
        let position = ctx.avatar.position;
        let targets = ctx.targets;
        let (axis, sign) = targets.dominant_axis();

        let next = match self {
            ObstructedLeapPhase::Burst { ticks } => {
                frame.keys.forward = true;
                frame.keys.sprint = true;
                if ticks > 0 {
                    frame.keys.jump = true;
                }
                let offset = position[axis] - targets.launch_cell.as_dvec3()[axis];
                let left_window = !(BURST_CLAMP_LOW..=BURST_CLAMP_HIGH).contains(&offset);
                if ticks > 0 && left_window {
                    debug!("obstructed leap burst done after {} ticks", ticks + 1);
                    ObstructedLeapPhase::Carry
                } else {
                    ObstructedLeapPhase::Burst { ticks: ticks + 1 }
                }
            }
            ObstructedLeapPhase::Carry => {
                frame.keys.jump = false;
                frame.yaw = Some(round_to_right_angle(ctx.avatar.yaw));
                match targets.carry_cell {
                    Some(cell) => {
                        // Progress into the cell along the direction of travel
                        let near_face = if sign > 0.0 {
                            cell.as_dvec3()[axis]
                        } else {
                            cell.as_dvec3()[axis] + 1.0
                        };
                        let progress = (position[axis] - near_face) * sign;
                        if progress > -CARRY_WINDOW_BEHIND && progress < CARRY_WINDOW_AHEAD {
                            ObstructedLeapPhase::Finish
                        } else {
                            ObstructedLeapPhase::Carry
                        }
                    }
                    None => ObstructedLeapPhase::Finish,
                }
            }
            ObstructedLeapPhase::Finish => {
                if horizontal_distance(position, targets.landing) > FINISH_THRESHOLD {
                    frame.face(position, targets.landing);
                    ObstructedLeapPhase::Finish
                } else {
                    frame.arrive(ctx.held.jump);
                    return (Progress::Done, frame);
                }
            }
        };
        (Progress::Continue(next), frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::InputState;
    use crate::execution::frame::{AvatarSnapshot, StepTargets};
    use bevy::math::{DVec3, IVec3};

    fn targets(carry: Option<IVec3>) -> StepTargets {
        StepTargets {
            run_start: DVec3::new(0.5, 1.0, 0.5),
            launch: DVec3::new(1.3, 1.0, 0.5),
            landing: DVec3::new(4.5, 1.0, 0.5),
            launch_cell: IVec3::new(0, 1, 0),
            jump_gap: 3.0,
            carry_cell: carry,
        }
    }

    fn context(targets: &StepTargets, x: f64, yaw: f32, held: InputState) -> TickContext<'_> {
        TickContext {
            targets,
            avatar: AvatarSnapshot {
                position: DVec3::new(x, 1.2, 0.9),
                yaw,
                on_ground: false,
                climbing: false,
                at_ledge: false,
            },
            held,
            tween_active: false,
        }
    }

    #[test]
    fn test_burst_primes_before_jumping() {
        let targets = targets(Some(IVec3::new(4, 2, 0)));
        let (next, frame) = ObstructedLeapPhase::default().advance(&context(&targets, 1.2, -90.0, InputState::default()));
        assert_eq!(next, Progress::Continue(ObstructedLeapPhase::Burst { ticks: 1 }));
        assert!(frame.keys.forward && frame.keys.sprint && !frame.keys.jump);

        let (next, frame) = ObstructedLeapPhase::Burst { ticks: 1 }.advance(&context(&targets, 1.2, -90.0, frame.keys));
        assert_eq!(next, Progress::Continue(ObstructedLeapPhase::Carry));
        assert!(frame.keys.jump);
    }

    #[test]
    fn test_burst_waits_inside_window() {
        let targets = targets(None);
        let (next, _) = ObstructedLeapPhase::Burst { ticks: 3 }.advance(&context(&targets, 0.5, -90.0, InputState::default()));
        assert_eq!(next, Progress::Continue(ObstructedLeapPhase::Burst { ticks: 4 }));
    }

    #[test]
    fn test_carry_squares_heading_and_waits_for_cell() {
        let targets = targets(Some(IVec3::new(4, 2, 0)));
        let (next, frame) = ObstructedLeapPhase::Carry.advance(&context(&targets, 2.0, -83.0, InputState::default()));
        assert_eq!(next, Progress::Continue(ObstructedLeapPhase::Carry));
        assert_eq!(frame.yaw, Some(-90.0));
        assert!(!frame.keys.jump);

        let (next, _) = ObstructedLeapPhase::Carry.advance(&context(&targets, 3.7, -90.0, InputState::default()));
        assert_eq!(next, Progress::Continue(ObstructedLeapPhase::Finish));
    }

    #[test]
    fn test_carry_window_follows_travel_direction() {
        let mut targets = targets(Some(IVec3::new(-4, 2, 0)));
        targets.landing = DVec3::new(-4.5, 1.0, 0.5);
        let (next, _) = ObstructedLeapPhase::Carry.advance(&context(&targets, -2.0, 90.0, InputState::default()));
        assert_eq!(next, Progress::Continue(ObstructedLeapPhase::Carry));
        let (next, _) = ObstructedLeapPhase::Carry.advance(&context(&targets, -2.7, 90.0, InputState::default()));
        assert_eq!(next, Progress::Continue(ObstructedLeapPhase::Finish));
    }

    #[test]
    fn test_finish_arrives() {
        let targets = targets(None);
        let held = InputState {
            forward: true,
            sprint: true,
            ..InputState::default()
        };
        let (next, frame) = ObstructedLeapPhase::Finish.advance(&context(&targets, 3.0, -90.0, held));
        assert_eq!(next, Progress::Continue(ObstructedLeapPhase::Finish));
        assert!(frame.yaw.is_some());

        let (next, frame) = ObstructedLeapPhase::Finish.advance(&context(&targets, 4.1, -90.0, held));
        assert_eq!(next, Progress::Done);
        assert!(frame.keys.crouch && !frame.keys.forward && !frame.keys.back);
    }
}
