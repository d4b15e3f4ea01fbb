//! Final guidance. Purely informational; always succeeds.

use rigup_core::{Step, StepContext};
use rigup_types::{Outcome, StepError, StepId};
use tracing::info;

pub struct Postflight;

impl Step for Postflight {
    fn id(&self) -> StepId {
        StepId::Postflight
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<Outcome, StepError> {
        info!("all done; dotfiles live in {}", ctx.config.install_dir);
        info!("restart your shell (or run 'exec $SHELL') to pick up new symlinks");
        info!("re-run 'rigup' any time; every step is idempotent");
        Ok(Outcome::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigup_core::ScriptedHost;
    use rigup_types::RunConfig;

    #[test]
    fn always_succeeds_without_touching_the_host() {
        let config = RunConfig::default();
        let host = ScriptedHost::new();
        let ctx = StepContext {
            config: &config,
            commands: &host,
            fs: &host,
            prompt: &host,
        };
        assert_eq!(Postflight.run(&ctx).expect("postflight"), Outcome::Done);
        assert!(host.invoked().is_empty());
    }
}
