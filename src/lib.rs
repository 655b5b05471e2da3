//! Ledgehop - jump assistance for voxel terrain
//!
//! Given a block the player points at, works out where to launch from and
//! where to land, picks a maneuver sequence (run-up, momentum run, leap,
//! corner approaches, obstructed leaps) and drives a controllable avatar
//! through it one tick at a time.

// Core modules
pub mod constants;
pub mod events;
pub mod helpers;
pub mod session;
pub mod tuning;

// Jump pipeline
pub mod analysis;
pub mod avatar;
pub mod execution;
pub mod planning;
pub mod terrain;

// Bevy integration and tooling
pub mod plugin;
pub mod simulation;
pub mod testing;

// Re-export commonly used types for convenience
pub use analysis::{AnalysisError, JumpGeometry, analyze_jump};
pub use avatar::{AvatarControl, SimulatedAvatar};
pub use events::{EventLog, JumpEvent, LoggedEvent};
pub use execution::{ExecutionError, ManeuverExecutor};
pub use planning::{ManeuverPlanner, PlanError, Step, StepSequence};
pub use plugin::{AvatarBody, CourseTerrain, JumpAssistPlugin, JumpCommand, JumpCommands, JumpStatus};
pub use session::{JumpSession, TickOutcome};
pub use terrain::{Cell, Point, TerrainQuery, Voxel, VoxelGrid};
pub use tuning::{JUMP_TUNING_FILE, JumpTuning, load_jump_tuning};
