//! Utility functions for ledgehop

use bevy::math::{DVec2, DVec3, IVec3};

/// Wrap an angle in degrees into [-180, 180)
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped >= 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Signed shortest difference `to - from` in degrees
pub fn yaw_difference(from: f32, to: f32) -> f32 {
    wrap_degrees(to - from)
}

/// Yaw (degrees) that faces from `from` toward `to` on the horizontal plane.
/// Yaw 0 faces +Z, yaw 90 faces -X.
pub fn yaw_towards(from: DVec3, to: DVec3) -> f32 {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    (-dx).atan2(dz).to_degrees() as f32
}

/// Unit facing vector on the XZ plane for a yaw in degrees
pub fn facing_from_yaw(yaw: f32) -> DVec2 {
    let rad = (yaw as f64).to_radians();
    DVec2::new(-rad.sin(), rad.cos())
}

/// Nearest multiple of 90 degrees
pub fn round_to_right_angle(yaw: f32) -> f32 {
    wrap_degrees((yaw / 90.0).round() * 90.0)
}

/// Cubic smooth-step on a progress value in [0, 1]
pub fn smooth_step(progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    p * p * (3.0 - 2.0 * p)
}

/// Center of a cell at its floor height (where feet rest)
pub fn cell_center(cell: IVec3) -> DVec3 {
    DVec3::new(cell.x as f64 + 0.5, cell.y as f64, cell.z as f64 + 0.5)
}

/// Cell containing a continuous point
pub fn cell_of(point: DVec3) -> IVec3 {
    IVec3::new(
        point.x.floor() as i32,
        point.y.floor() as i32,
        point.z.floor() as i32,
    )
}

/// Distance between two points ignoring height
pub fn horizontal_distance(a: DVec3, b: DVec3) -> f64 {
    DVec2::new(b.x - a.x, b.z - a.z).length()
}

/// Normalized XZ direction from `a` to `b`, or zero when they coincide
pub fn horizontal_direction(a: DVec3, b: DVec3) -> DVec2 {
    DVec2::new(b.x - a.x, b.z - a.z).normalize_or_zero()
}
