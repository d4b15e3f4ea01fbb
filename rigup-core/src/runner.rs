//! Sequential, fail-fast execution of the step catalog.

use crate::ports::{CommandPort, FsPort, PromptPort};
use rigup_types::{is_selected, overlapping_steps, Outcome, RunConfig, RunSummary};
use rigup_types::{StepError, StepId, StepStatus};
use tracing::{info, warn};

/// One named provisioning action. Implementations must be idempotent:
/// re-running against an already-provisioned host detects the existing
/// state and skips redundant work.
pub trait Step {
    fn id(&self) -> StepId;
    fn run(&self, ctx: &StepContext<'_>) -> Result<Outcome, StepError>;
}

/// Everything a step action may touch.
pub struct StepContext<'a> {
    pub config: &'a RunConfig,
    pub commands: &'a dyn CommandPort,
    pub fs: &'a dyn FsPort,
    pub prompt: &'a dyn PromptPort,
}

/// Fatal failure of a single step; nothing after it ran.
#[derive(Debug, thiserror::Error)]
#[error("step '{step}' failed: {source}")]
pub struct RunnerError {
    pub step: StepId,
    #[source]
    pub source: StepError,
}

/// Run `steps` in order, subject to the selection policy, stopping at the
/// first fatal failure.
pub fn run_steps(
    steps: &[Box<dyn Step>],
    ctx: &StepContext<'_>,
) -> Result<RunSummary, RunnerError> {
    for dup in overlapping_steps(ctx.config) {
        warn!("step '{dup}' is named in both --only and --skip; exclude wins");
    }

    let mut summary = RunSummary::default();
    for step in steps {
        let id = step.id();
        if !is_selected(ctx.config, id) {
            info!("skipping {id}");
            summary.record(id, StepStatus::Skipped);
            continue;
        }

        info!("[{id}] {}", id.summary());
        match step.run(ctx) {
            Ok(Outcome::Done) => {
                info!("[{id}] ok");
                summary.record(id, StepStatus::Succeeded);
            }
            Ok(Outcome::Warned(msg)) => {
                warn!("[{id}] (soft) {msg}");
                summary.record(id, StepStatus::SucceededWithWarning(msg));
            }
            Err(source) => {
                summary.record(id, StepStatus::Failed(source.to_string()));
                return Err(RunnerError { step: id, source });
            }
        }
    }
    Ok(summary)
}
