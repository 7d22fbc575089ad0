//! Custom-command resolution
//!
//! Pattern-policy entries are tested structurally, one task per entry. The
//! rest of the catalogue is scanned once per enabled algorithm. All tasks run
//! on a [`WorkerPool`] under one deadline and the [`Coordinator`] reduces
//! whatever finished into a single winner.

mod coordinator;
mod pattern;
mod pool;
mod task;

pub use coordinator::{CUSTOM_COMMAND_TIMEOUT, Coordinator, select_winner};
pub use pattern::{compile_custom, policy_matches};
pub use pool::{Job, WorkerPool};
pub use task::resolve_with_algorithm;
