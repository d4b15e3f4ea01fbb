//! Symlink dotfiles into the home directory via GNU stow.

use crate::run_required;
use rigup_core::{CommandSpec, Step, StepContext};
use rigup_types::{Outcome, StepError, StepId};
use tracing::info;

pub struct Stow;

impl Step for Stow {
    fn id(&self) -> StepId {
        StepId::Stow
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<Outcome, StepError> {
        if !ctx.commands.which("stow") {
            return Ok(Outcome::Warned(
                "stow not found on PATH; skipping symlinks".to_string(),
            ));
        }

        let dir = &ctx.config.install_dir;
        if !ctx.fs.exists(dir) {
            return Ok(Outcome::Warned(format!(
                "dotfiles directory {dir} does not exist; run the clone step first"
            )));
        }

        let packages = ctx.fs.package_dirs(dir)?;
        if packages.is_empty() {
            info!("no stow packages under {dir}");
            return Ok(Outcome::Done);
        }

        let home = ctx.fs.home_dir();
        for package in &packages {
            info!("restowing {package}");
            // --restow replaces symlinks left behind by earlier runs.
            run_required(
                ctx.commands,
                CommandSpec::new(
                    "stow",
                    [
                        "--restow",
                        "--dir",
                        dir.as_str(),
                        "--target",
                        home.as_str(),
                        package,
                    ],
                ),
                &format!("restowing package '{package}'"),
            )?;
        }

        Ok(Outcome::Done)
    }
}
