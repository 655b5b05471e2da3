//! Smooth yaw tween shared by every maneuver

use crate::constants::ROTATION_DURATION;
use crate::helpers::{smooth_step, wrap_degrees, yaw_difference};

/// Eases the avatar's yaw from `start_yaw` to `target_yaw` over a fixed
/// number of ticks, along the shorter way around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationTween {
    pub start_yaw: f32,
    pub target_yaw: f32,
    pub ticks_remaining: u32,
    pub duration: u32,
}

impl RotationTween {
    pub fn new(start_yaw: f32, target_yaw: f32) -> Self {
        Self::with_duration(start_yaw, target_yaw, ROTATION_DURATION)
    }

    pub fn with_duration(start_yaw: f32, target_yaw: f32, duration: u32) -> Self {
        let duration = duration.max(1);
        Self {
            start_yaw: wrap_degrees(start_yaw),
            target_yaw,
            ticks_remaining: duration,
            duration,
        }
    }

    /// Yaw for this tick, or `None` once the tween has run out
    pub fn advance(&mut self) -> Option<f32> {
        if self.ticks_remaining == 0 {
            return None;
        }
        self.ticks_remaining -= 1;
        let progress = 1.0 - self.ticks_remaining as f32 / self.duration as f32;
        let eased = smooth_step(progress);
        let sweep = yaw_difference(self.start_yaw, self.target_yaw);
        Some(wrap_degrees(self.start_yaw + sweep * eased))
    }

    pub fn is_finished(&self) -> bool {
        self.ticks_remaining == 0
    }
}
