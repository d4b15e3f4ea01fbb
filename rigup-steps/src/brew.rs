//! Homebrew installation.

use crate::os;
use rigup_core::{CommandSpec, Step, StepContext};
use rigup_types::{Outcome, StepError, StepId};
use tracing::info;

const INSTALL_SCRIPT_URL: &str =
    "https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh";

pub struct Brew;

impl Step for Brew {
    fn id(&self) -> StepId {
        StepId::Brew
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<Outcome, StepError> {
        if ctx.commands.which("brew") {
            info!("brew already on PATH; nothing to do");
            return Ok(Outcome::Done);
        }

        let family = os::detect()?;
        info!("installing Homebrew");

        let mut spec = CommandSpec::new(
            "/bin/bash",
            ["-c", &format!("curl -fsSL {INSTALL_SCRIPT_URL} | /bin/bash")],
        );
        if ctx.config.confirm_all {
            spec = spec.env("NONINTERACTIVE", "1");
        }
        let out = ctx.commands.run(&spec)?;
        if !out.success {
            return Err(StepError::CommandFailed {
                program: "brew installer".to_string(),
                what: "installing Homebrew".to_string(),
                detail: out.detail(),
            });
        }

        // Make brew resolvable for the rest of this run.
        let bin_dir = os::brew_bin_dir(family, std::env::consts::ARCH);
        ctx.commands.prepend_path(&bin_dir)?;

        if !ctx.commands.which("brew") && !ctx.config.dry_run {
            return Err(StepError::InstallUnverified { name: "brew" });
        }

        Ok(Outcome::Done)
    }
}
