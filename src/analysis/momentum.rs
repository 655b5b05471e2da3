//! Run-up search and launch point placement

use std::f64::consts::PI;

use bevy::math::{DVec2, DVec3, IVec3};

use crate::helpers::{cell_center, cell_of, horizontal_direction};
use crate::terrain::{Cell, Point, TerrainQuery, is_standable_within_buffer};
use crate::tuning::JumpTuning;

/// Distance from the launch cell center to its edge
const HALF_CELL: f64 = 0.5;

/// Longest straight, standable run-up behind the launch cell.
///
/// Sweeps headings across ±90° around the direction pointing away from the
/// landing and marches each one outward from the launch cell center, allowing
/// one-level step-ups. Returns the far end of the longest clear line, or
/// `None` when even the best line is shorter than the minimum runway.
pub fn find_run_up(
    terrain: &dyn TerrainQuery,
    launch: Cell,
    landing: Cell,
    tuning: &JumpTuning,
) -> Option<Point> {
    let center = cell_center(launch);
    let toward = horizontal_direction(center, cell_center(landing));
    if toward == DVec2::ZERO {
        return None;
    }
    if tuning.validate().is_err() {
        return None;
    }
    let away = -toward;
    let samples = tuning.run_up_sweep_samples.max(1);
    let marches = (tuning.max_run_length / tuning.run_up_step).round() as u32;

    let mut best_length = 0.0;
    let mut best_point: Option<Point> = None;
    for i in 0..samples {
        let offset = if samples > 1 {
            (i as f64 / (samples - 1) as f64 - 0.5) * PI
        } else {
            0.0
        };
        let heading = DVec2::from_angle(offset).rotate(away);
        let mut level = launch.y;
        for k in 1..=marches {
            let distance = k as f64 * tuning.run_up_step;
            let sample = DVec3::new(
                center.x + heading.x * distance,
                level as f64,
                center.z + heading.y * distance,
            );
            let cell = cell_of(sample);
            if !is_standable_within_buffer(terrain, cell, tuning.standable_buffer) {
                if is_standable_within_buffer(terrain, cell + IVec3::Y, tuning.standable_buffer) {
                    level += 1;
                } else {
                    break;
                }
            }
            if distance > best_length {
                best_length = distance;
                best_point = Some(DVec3::new(sample.x, level as f64, sample.z));
            }
        }
    }

    best_point.filter(|_| best_length >= tuning.min_runway)
}

/// Precise point to leave the launch cell from.
///
/// Sits `overshoot` past the cell edge toward the landing. When the run-up
/// arrives at an angle, the point is pulled back along the run-up direction
/// by `(1 - cos θ)` of that reach, so the blend of leftover momentum and new
/// steering stays continuous.
pub fn compute_launch_point(launch: Cell, landing: Cell, run_up: Option<Point>, overshoot: f64) -> Point {
    let center = cell_center(launch);
    let toward = horizontal_direction(center, cell_center(landing));
    let reach = HALF_CELL + overshoot;
    let straight = DVec3::new(center.x + toward.x * reach, center.y, center.z + toward.y * reach);

    let Some(start) = run_up else {
        return straight;
    };
    let momentum = horizontal_direction(start, center);
    if momentum == DVec2::ZERO {
        return straight;
    }
    let cos_theta = toward.dot(momentum).clamp(-1.0, 1.0);
    let momentum_reach = reach * cos_theta;
    let bend = momentum * (momentum_reach - reach);
    DVec3::new(straight.x + bend.x, center.y, straight.z + bend.y)
}
