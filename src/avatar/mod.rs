//! Avatar module - the controllable body the maneuvers steer
//!
//! [`AvatarControl`] is what the executor drives. [`SimulatedAvatar`] is the
//! built-in implementation used by headless runs, the standing-start check
//! and tests.

pub mod hitbox;
pub mod ledge;
pub mod sim;

pub use hitbox::Hitbox;
pub use ledge::is_at_ledge;
pub use sim::{InputState, SimulatedAvatar};

use crate::terrain::Point;

/// Read/steer access to the avatar. Implementations hold the key state;
/// setters take effect on the avatar's next physics tick.
pub trait AvatarControl {
    /// Feet position
    fn position(&self) -> Point;
    /// Current yaw in degrees (0 faces +Z, 90 faces -X)
    fn yaw(&self) -> f32;
    fn set_yaw(&mut self, yaw: f32);
    fn set_pitch(&mut self, pitch: f32);
    fn on_ground(&self) -> bool;
    fn is_climbing(&self) -> bool;
    fn set_forward(&mut self, pressed: bool);
    fn set_back(&mut self, pressed: bool);
    fn set_left(&mut self, pressed: bool);
    fn set_right(&mut self, pressed: bool);
    fn set_sprint(&mut self, pressed: bool);
    fn set_crouch(&mut self, pressed: bool);
    fn set_jump(&mut self, pressed: bool);
}
