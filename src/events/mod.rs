//! Structured jump telemetry
//!
//! A session appends [`JumpEvent`]s to its [`EventLog`] instead of printing
//! narration. The log serializes to JSON lines for offline analysis.

mod log;
mod types;

pub use log::{EventLog, LoggedEvent, parse_json_lines};
pub use types::JumpEvent;
pub(crate) use types::cell_array;
