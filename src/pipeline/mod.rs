//! Pipeline components: shared executor, recursive walk, join tracking, fan-in collection,
//! error handling.

pub mod collector;
pub mod context;
pub mod error_handler;
pub mod join;
pub mod orchestrator;
pub mod walk;

pub use collector::{Aggregate, collect_into, spawn_collector};
pub use context::{Executor, WalkContext, WalkCounters, resolve_capacity};
pub use error_handler::{AbortSignal, is_vanished, walk_error_is_vanished};
pub use join::{JoinTracker, TaskToken};
pub use orchestrator::{Pipeline, PipelineSpec, run_pair_to_completion, run_to_completion};
pub use walk::{spawn_hash, spawn_walk};
