//! Shared vocabulary for the rigup workspace.
//!
//! # Design constraints
//! - The step catalog is closed and statically ordered; dispatch is a match,
//!   never a name-string lookup.
//! - `RunConfig` is built once at startup and never mutated afterwards.
//! - Execution outcomes are ephemeral; nothing in here is persisted.

pub mod config;
pub mod outcome;
pub mod select;
pub mod step;

pub use config::RunConfig;
pub use outcome::{Outcome, RunSummary, StepError, StepRecord, StepStatus};
pub use select::{is_selected, overlapping_steps};
pub use step::{parse_step_list, StepId, UnknownStep};
