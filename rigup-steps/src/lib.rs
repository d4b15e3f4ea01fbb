//! The provisioning step catalog.
//!
//! One module per step, each written against the `rigup-core` ports so it
//! can be exercised without touching the host. The catalog order lives in
//! `StepId::ALL`; [`catalog`] materialises it.

pub mod brew;
pub mod bundle;
pub mod clone;
pub mod os;
pub mod postflight;
pub mod preflight;
pub mod ssh;
pub mod stow;

use rigup_core::{CmdOutput, CommandPort, CommandSpec, Step};
use rigup_types::{StepError, StepId};

pub use brew::Brew;
pub use bundle::Bundle;
pub use clone::CloneDotfiles;
pub use postflight::Postflight;
pub use preflight::Preflight;
pub use ssh::Ssh;
pub use stow::Stow;

/// The full step pipeline, in execution order.
pub fn catalog() -> Vec<Box<dyn Step>> {
    StepId::ALL.iter().map(|id| step_for(*id)).collect()
}

/// Static dispatch from a step id to its implementation.
pub fn step_for(id: StepId) -> Box<dyn Step> {
    match id {
        StepId::Preflight => Box::new(Preflight),
        StepId::Ssh => Box::new(Ssh),
        StepId::Clone => Box::new(CloneDotfiles),
        StepId::Brew => Box::new(Brew),
        StepId::Bundle => Box::new(Bundle),
        StepId::Stow => Box::new(Stow),
        StepId::Postflight => Box::new(Postflight),
    }
}

/// Run a command that the step cannot proceed without.
pub(crate) fn run_required(
    commands: &dyn CommandPort,
    spec: CommandSpec,
    what: &str,
) -> Result<CmdOutput, StepError> {
    let out = commands.run(&spec)?;
    if !out.success {
        return Err(StepError::CommandFailed {
            program: spec.program,
            what: what.to_string(),
            detail: out.detail(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_matches_step_id_order() {
        let ids: Vec<StepId> = catalog().iter().map(|s| s.id()).collect();
        assert_eq!(ids, StepId::ALL.to_vec());
    }
}
