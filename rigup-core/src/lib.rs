//! The rigup step runner.
//!
//! The runner is I/O-agnostic: every external command, filesystem probe,
//! and interactive prompt goes through the port traits in [`ports`], with
//! real adapters (and a dry-run wrapper) in [`adapters`]. Execution is
//! strictly sequential and fail-fast; idempotent re-execution is the only
//! recovery mechanism.

pub mod adapters;
pub mod ports;
pub mod runner;

pub use adapters::{
    AutoConfirmPrompt, DryRunCommandPort, DryRunFsPort, HostFsPort, ScriptedHost,
    ShellCommandPort, TerminalPrompt,
};
pub use ports::{CmdOutput, CommandPort, CommandSpec, FsPort, PromptPort};
pub use runner::{run_steps, RunnerError, Step, StepContext};
