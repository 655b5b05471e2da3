//! Simulated avatar: fixed-tick voxel movement driven by held inputs
//!
//! One call to [`SimulatedAvatar::step`] is one tick. The model covers what
//! the maneuvers care about: ground/air acceleration, sprint-jump boost,
//! friction and drag, the crouch edge guard and climbable surfaces.

use bevy::math::{DVec2, DVec3};

use super::AvatarControl;
use super::hitbox::Hitbox;
use crate::constants::*;
use crate::helpers::{cell_of, facing_from_yaw};
use crate::terrain::{Point, TerrainQuery};

/// Probe distance used to decide whether a freshly placed avatar is grounded
const EPSILON_DROP: f64 = 1e-3;

/// Movement keys held for the next tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub crouch: bool,
    pub jump: bool,
}

impl InputState {
    pub fn any_held(&self) -> bool {
        self.forward || self.back || self.left || self.right || self.sprint || self.crouch || self.jump
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedAvatar {
    pub position: Point,
    pub velocity: DVec3,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
    pub climbing: bool,
    pub input: InputState,
    pub ticks: u32,
}

impl SimulatedAvatar {
    /// Place the avatar with its feet at `position`
    pub fn new(terrain: &dyn TerrainQuery, position: Point, yaw: f32) -> Self {
        let hitbox = Hitbox::at(position);
        let on_ground = hitbox.clip_axis(terrain, 1, -EPSILON_DROP) != -EPSILON_DROP;
        Self {
            position,
            velocity: DVec3::ZERO,
            yaw,
            pitch: 0.0,
            on_ground,
            climbing: terrain.is_climbable(cell_of(position)),
            input: InputState::default(),
            ticks: 0,
        }
    }

    pub fn hitbox(&self) -> Hitbox {
        Hitbox::at(self.position)
    }

    pub fn is_sprinting(&self) -> bool {
        self.input.sprint && self.input.forward && !self.input.crouch
    }

    /// Advance one tick
    pub fn step(&mut self, terrain: &dyn TerrainQuery) {
        self.climbing = terrain.is_climbable(cell_of(self.position));
        let sprinting = self.is_sprinting();
        let facing = facing_from_yaw(self.yaw);

        if self.input.jump && self.on_ground {
            self.velocity.y = JUMP_IMPULSE;
            if sprinting {
                self.velocity.x += facing.x * SPRINT_JUMP_BOOST;
                self.velocity.z += facing.y * SPRINT_JUMP_BOOST;
            }
        }

        self.accelerate(sprinting);

        if self.climbing {
            self.velocity.x = self.velocity.x.clamp(-CLIMB_SPEED_CAP, CLIMB_SPEED_CAP);
            self.velocity.z = self.velocity.z.clamp(-CLIMB_SPEED_CAP, CLIMB_SPEED_CAP);
            self.velocity.y = self.velocity.y.max(-CLIMB_SPEED_CAP);
            if self.input.crouch && self.velocity.y < 0.0 {
                self.velocity.y = 0.0;
            }
        }

        let mut horizontal = DVec2::new(self.velocity.x, self.velocity.z);
        if self.input.crouch && self.on_ground {
            horizontal = self.guard_edges(terrain, horizontal);
        }

        let wanted_y = self.velocity.y;
        let moved_y = self.hitbox().clip_axis(terrain, 1, wanted_y);
        self.position.y += moved_y;
        self.on_ground = wanted_y < 0.0 && moved_y != wanted_y;
        if moved_y != wanted_y {
            self.velocity.y = 0.0;
        }

        let moved_x = self.hitbox().clip_axis(terrain, 0, horizontal.x);
        self.position.x += moved_x;
        let blocked_x = moved_x != horizontal.x;
        if blocked_x {
            self.velocity.x = 0.0;
        }

        let moved_z = self.hitbox().clip_axis(terrain, 2, horizontal.y);
        self.position.z += moved_z;
        let blocked_z = moved_z != horizontal.y;
        if blocked_z {
            self.velocity.z = 0.0;
        }

        if self.climbing && (blocked_x || blocked_z || self.input.jump) {
            self.velocity.y = CLIMB_ASCEND_SPEED;
        }

        self.velocity.y = (self.velocity.y - GRAVITY) * VERTICAL_DRAG;
        let friction = if self.on_ground { GROUND_FRICTION } else { AIR_DRAG };
        self.velocity.x *= friction;
        self.velocity.z *= friction;
        self.ticks += 1;
    }

    fn accelerate(&mut self, sprinting: bool) {
        let mut forward = f64::from(self.input.forward as u8) - f64::from(self.input.back as u8);
        let mut strafe = f64::from(self.input.left as u8) - f64::from(self.input.right as u8);
        if self.input.crouch {
            forward *= CROUCH_INPUT_SCALE;
            strafe *= CROUCH_INPUT_SCALE;
        }
        let length = forward.hypot(strafe);
        if length <= 1e-4 {
            return;
        }
        if length > 1.0 {
            forward /= length;
            strafe /= length;
        }
        let accel = match (self.on_ground, sprinting) {
            (true, true) => GROUND_SPRINT_ACCEL,
            (true, false) => GROUND_ACCEL,
            (false, true) => AIR_SPRINT_ACCEL,
            (false, false) => AIR_ACCEL,
        };
        let (sin, cos) = f64::from(self.yaw).to_radians().sin_cos();
        self.velocity.x += (strafe * cos - forward * sin) * accel;
        self.velocity.z += (forward * cos + strafe * sin) * accel;
    }

    /// Shorten a crouched move until the avatar keeps something underfoot
    fn guard_edges(&self, terrain: &dyn TerrainQuery, mut delta: DVec2) -> DVec2 {
        while delta.x != 0.0 && !self.supported(terrain, delta.x, 0.0) {
            delta.x = shrink(delta.x);
        }
        while delta.y != 0.0 && !self.supported(terrain, 0.0, delta.y) {
            delta.y = shrink(delta.y);
        }
        while delta.x != 0.0 && delta.y != 0.0 && !self.supported(terrain, delta.x, delta.y) {
            delta.x = shrink(delta.x);
            delta.y = shrink(delta.y);
        }
        delta
    }

    fn supported(&self, terrain: &dyn TerrainQuery, dx: f64, dz: f64) -> bool {
        let mut probe = Hitbox::at(DVec3::new(
            self.position.x + dx,
            self.position.y - CROUCH_GUARD_DEPTH,
            self.position.z + dz,
        ));
        probe.max.y = self.position.y;
        probe.touches_solid(terrain)
    }
}

fn shrink(value: f64) -> f64 {
    if value.abs() < CROUCH_GUARD_STEP {
        0.0
    } else {
        value - CROUCH_GUARD_STEP.copysign(value)
    }
}

impl AvatarControl for SimulatedAvatar {
    fn position(&self) -> Point {
        self.position
    }

    fn yaw(&self) -> f32 {
        self.yaw
    }

    fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
    }

    fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch;
    }

    fn on_ground(&self) -> bool {
        self.on_ground
    }

    fn is_climbing(&self) -> bool {
        self.climbing
    }

    fn set_forward(&mut self, pressed: bool) {
        self.input.forward = pressed;
    }

    fn set_back(&mut self, pressed: bool) {
        self.input.back = pressed;
    }

    fn set_left(&mut self, pressed: bool) {
        self.input.left = pressed;
    }

    fn set_right(&mut self, pressed: bool) {
        self.input.right = pressed;
    }

    fn set_sprint(&mut self, pressed: bool) {
        self.input.sprint = pressed;
    }

    fn set_crouch(&mut self, pressed: bool) {
        self.input.crouch = pressed;
    }

    fn set_jump(&mut self, pressed: bool) {
        self.input.jump = pressed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{Voxel, VoxelGrid};
    use bevy::math::IVec3;

    fn floor() -> VoxelGrid {
        let mut grid = VoxelGrid::new(0, 32);
        grid.fill(IVec3::new(-10, 0, -10), IVec3::new(10, 0, 10), Some(Voxel::Solid));
        grid
    }

    #[test]
    fn test_spawn_grounded() {
        let grid = floor();
        let avatar = SimulatedAvatar::new(&grid, DVec3::new(0.5, 1.0, 0.5), 0.0);
        assert!(avatar.on_ground);
        let floating = SimulatedAvatar::new(&grid, DVec3::new(0.5, 3.0, 0.5), 0.0);
        assert!(!floating.on_ground);
    }

    #[test]
    fn test_standing_still_stays_put() {
        let grid = floor();
        let mut avatar = SimulatedAvatar::new(&grid, DVec3::new(0.5, 1.0, 0.5), 0.0);
        for _ in 0..20 {
            avatar.step(&grid);
        }
        assert_eq!(avatar.position, DVec3::new(0.5, 1.0, 0.5));
        assert!(avatar.on_ground);
    }

    #[test]
    fn test_walk_forward_follows_yaw() {
        let grid = floor();
        // Yaw -90 faces +X
        let mut avatar = SimulatedAvatar::new(&grid, DVec3::new(0.5, 1.0, 0.5), -90.0);
        avatar.set_forward(true);
        for _ in 0..10 {
            avatar.step(&grid);
        }
        assert!(avatar.position.x > 1.5);
        assert!((avatar.position.z - 0.5).abs() < 1e-9);
        assert_eq!(avatar.position.y, 1.0);
    }

    #[test]
    fn test_sprint_is_faster_than_walk() {
        let grid = floor();
        let mut walker = SimulatedAvatar::new(&grid, DVec3::new(0.5, 1.0, 0.5), 0.0);
        let mut sprinter = walker.clone();
        walker.set_forward(true);
        sprinter.set_forward(true);
        sprinter.set_sprint(true);
        for _ in 0..10 {
            walker.step(&grid);
            sprinter.step(&grid);
        }
        assert!(sprinter.position.z > walker.position.z);
    }

    #[test]
    fn test_jump_lands_back_on_floor() {
        let grid = floor();
        let mut avatar = SimulatedAvatar::new(&grid, DVec3::new(0.5, 1.0, 0.5), 0.0);
        avatar.set_jump(true);
        avatar.step(&grid);
        avatar.set_jump(false);
        assert!(!avatar.on_ground);
        assert!(avatar.position.y > 1.3);
        for _ in 0..20 {
            avatar.step(&grid);
        }
        assert!(avatar.on_ground);
        assert_eq!(avatar.position.y, 1.0);
    }

    #[test]
    fn test_crouch_guard_keeps_avatar_on_block() {
        let mut grid = VoxelGrid::new(0, 32);
        grid.set_solid(IVec3::new(0, 0, 0));
        let mut avatar = SimulatedAvatar::new(&grid, DVec3::new(0.5, 1.0, 0.5), -90.0);
        avatar.set_forward(true);
        avatar.set_crouch(true);
        for _ in 0..60 {
            avatar.step(&grid);
        }
        assert!(avatar.on_ground);
        assert_eq!(avatar.position.y, 1.0);
        assert!(avatar.position.x < 1.3);
        assert!(avatar.position.x > 1.0);
    }

    #[test]
    fn test_walking_off_a_block_falls() {
        let mut grid = VoxelGrid::new(-8, 32);
        grid.set_solid(IVec3::new(0, 0, 0));
        grid.fill(IVec3::new(-5, -4, -5), IVec3::new(20, -4, 5), Some(Voxel::Solid));
        let mut avatar = SimulatedAvatar::new(&grid, DVec3::new(0.5, 1.0, 0.5), -90.0);
        avatar.set_forward(true);
        for _ in 0..40 {
            avatar.step(&grid);
        }
        assert_eq!(avatar.position.y, -3.0);
    }

    #[test]
    fn test_climbing_ascends_on_jump() {
        let mut grid = floor();
        grid.fill(IVec3::new(0, 1, 0), IVec3::new(0, 6, 0), Some(Voxel::Climbable));
        let mut avatar = SimulatedAvatar::new(&grid, DVec3::new(0.5, 1.0, 0.5), 0.0);
        avatar.set_jump(true);
        for _ in 0..15 {
            avatar.step(&grid);
        }
        assert!(avatar.is_climbing());
        assert!(avatar.position.y > 2.0);
    }
}
