//! Tunable constants for ledgehop
//!
//! Search bounds, executor thresholds and avatar physics all live here.
//! Values that callers may want to override at runtime are mirrored in
//! `tuning::JumpTuning`.

// =============================================================================
// TERRAIN CLASSIFICATION
// =============================================================================

/// Horizontal slack sampled around a cell center when checking standability
pub const STANDABLE_BUFFER: f64 = 0.3;
/// Step between buffer samples
pub const STANDABLE_BUFFER_STEP: f64 = 0.05;

// =============================================================================
// REACHABILITY SEARCH
// =============================================================================

/// Ring radius for the nearest-standable fallback around the avatar
pub const NEAREST_STANDABLE_RADIUS: i32 = 2;
/// Ring radius scanned for the best launch cell
pub const LAUNCH_SEARCH_RADIUS: i32 = 10;
/// Chebyshev radius limit for the walk-connectivity BFS
pub const WALK_MAX_HORIZONTAL_RADIUS: i32 = 20;
/// Expansion cap for the walk-connectivity BFS
pub const WALK_MAX_EXPANSIONS: usize = 2000;
/// Largest plain drop a walk step tolerates
pub const FALL_TOLERANCE: i32 = 3;
/// How far below the current level the walk BFS looks for a foothold
pub const CLIMB_FALL_TOLERANCE: i32 = 19;
/// Largest rise when stepping onto or off a climbable cell
pub const CLIMB_TRANSITION_MAX_RISE: i32 = 2;
/// Largest drop when stepping onto or off a climbable cell
pub const CLIMB_TRANSITION_MAX_DROP: i32 = 10;
/// Largest vertical span covered along a continuous climbable column
pub const CLIMB_COLUMN_MAX_SPAN: i32 = 10;
/// BFS depth of the landing search around the target
pub const LANDING_SEARCH_RADIUS: u32 = 5;

// =============================================================================
// JUMP FEASIBILITY
// =============================================================================

/// Largest rise a single jump can make (in cells)
pub const MAX_JUMP_RISE: i32 = 1;
/// Empirical running-jump reach, used when the reach gate is enabled
pub const RUNNING_JUMP_REACH: f64 = 4.3;

// =============================================================================
// MOMENTUM SEARCH
// =============================================================================

pub const MAX_RUN_LENGTH: f64 = 20.0;
pub const RUN_UP_STEP: f64 = 0.1;
pub const RUN_UP_SWEEP_SAMPLES: u32 = 90;
/// Shortest run-up worth using
pub const MIN_RUNWAY: f64 = 0.5;
/// Distance the launch point sits past the launch cell's edge
pub const LAUNCH_OVERSHOOT: f64 = 0.3;

// =============================================================================
// PLANNING
// =============================================================================

/// Edge gap window in which head-height obstructions are counted
pub const OBSTRUCTION_MIN_GAP: f64 = 1.0;
pub const OBSTRUCTION_MAX_GAP: f64 = 3.0;
/// Obstruction counts handled by the short obstructed leap
pub const MINOR_OBSTRUCTION_MAX: usize = 2;
/// Obstruction count handled by the triple-pattern leap
pub const TRIPLE_OBSTRUCTION_COUNT: usize = 3;
/// Tick cap for the standing-start simulation
pub const STANDING_START_TICK_CAP: u32 = 500;
/// Allowed horizontal miss of the simulated landing point
pub const LANDING_TOLERANCE: f64 = 0.8;

// =============================================================================
// EXECUTOR THRESHOLDS
// =============================================================================

/// Ticks spent tweening toward a new yaw
pub const ROTATION_DURATION: u32 = 5;
/// Yaw error (degrees) accepted before the run-up starts walking
pub const RUN_UP_AIM_TOLERANCE: f32 = 3.0;
pub const RUN_UP_NEARBY_THRESHOLD: f64 = 0.5;
pub const RUN_UP_PRECISE_THRESHOLD: f64 = 0.1;
/// Distance from the launch point that arms the momentum run's edge check
pub const MOMENTUM_THRESHOLD: f64 = 0.4;
/// Yaw error (degrees) below which the momentum run counts as aimed
pub const MOMENTUM_AIM_TOLERANCE: f32 = 5.0;
/// Yaw error (degrees) above which the momentum run stops walking to re-aim
pub const MOMENTUM_REAIM_ANGLE: f32 = 10.0;
/// Distance to landing at which the leap lets go
pub const LEAP_THRESHOLD: f64 = 1.0;
/// Jumps at or below this edge gap are made without sprinting
pub const NO_SPRINT_GAP: f64 = 2.0;
/// Distance to landing at which the obstructed leap's final approach lets go
pub const FINISH_THRESHOLD: f64 = 0.6;
/// Ticks of forced crouch after arriving
pub const ARRIVAL_CROUCH_TICKS: u32 = 4;
/// Ticks of forced backward input after arriving mid-jump
pub const ARRIVAL_BACK_TICKS: u32 = 4;
/// Yaw error (degrees) accepted when squaring up to a right angle
pub const CORNER_AIM_TOLERANCE: f32 = 0.1;
/// Movement below this between ticks counts as settled against a corner
pub const CORNER_STABLE_EPSILON: f64 = 1e-4;
pub const CORNER_NUDGE_TICKS: u32 = 6;
/// Total yaw drift (degrees) applied across the corner nudge
pub const CORNER_NUDGE_ROTATION: f32 = 3.2;
pub const CORNER_SETTLE_TICKS: u32 = 3;
/// Fractional window on the launch cell the burst must leave
pub const BURST_CLAMP_LOW: f64 = 0.3;
pub const BURST_CLAMP_HIGH: f64 = 0.7;
/// Window around the cell past the last obstruction that ends the carry
pub const CARRY_WINDOW_BEHIND: f64 = 0.5;
pub const CARRY_WINDOW_AHEAD: f64 = 1.8;
/// Horizontal shrink applied to the hitbox for ledge detection
pub const LEDGE_EDGE_SHRINK: f64 = 0.001;
/// Depth below the feet probed for ledge detection
pub const LEDGE_PROBE_DEPTH: f64 = 0.5;

// =============================================================================
// AVATAR PHYSICS (per tick)
// =============================================================================

pub const AVATAR_HALF_WIDTH: f64 = 0.3;
pub const AVATAR_HEIGHT: f64 = 1.8;
pub const GROUND_ACCEL: f64 = 0.1;
pub const GROUND_SPRINT_ACCEL: f64 = 0.13;
pub const AIR_ACCEL: f64 = 0.02;
pub const AIR_SPRINT_ACCEL: f64 = 0.026;
/// Input scale while crouching
pub const CROUCH_INPUT_SCALE: f64 = 0.3;
pub const GROUND_FRICTION: f64 = 0.546;
pub const AIR_DRAG: f64 = 0.91;
pub const GRAVITY: f64 = 0.08;
pub const VERTICAL_DRAG: f64 = 0.98;
pub const JUMP_IMPULSE: f64 = 0.42;
/// Horizontal boost added along the facing when jumping while sprinting
pub const SPRINT_JUMP_BOOST: f64 = 0.2;
/// Probe depth for the crouch edge guard
pub const CROUCH_GUARD_DEPTH: f64 = 0.6;
pub const CROUCH_GUARD_STEP: f64 = 0.05;
/// Horizontal speed cap while on a climbable cell
pub const CLIMB_SPEED_CAP: f64 = 0.15;
pub const CLIMB_ASCEND_SPEED: f64 = 0.2;

// =============================================================================
// SIMULATION
// =============================================================================

/// Fixed tick length for headless apps (20 Hz)
pub const TICK_MILLIS: u64 = 50;
/// Default tick cap for one simulated course
pub const SIM_MAX_TICKS: u32 = 1200;
/// Ticks simulated after a sequence ends so the landing settles
pub const SIM_SETTLE_TICKS: u32 = 20;
/// Horizontal distance from the landing center that still counts as landed
pub const LANDED_RADIUS: f64 = 1.0;
/// World height bounds for parsed and generated courses
pub const COURSE_MIN_Y: i32 = -16;
pub const COURSE_MAX_Y: i32 = 64;
