//! Clone or update the dotfiles repository.

use crate::run_required;
use rigup_core::{CommandSpec, Step, StepContext};
use rigup_types::{Outcome, StepError, StepId};
use tracing::info;

pub struct CloneDotfiles;

impl Step for CloneDotfiles {
    fn id(&self) -> StepId {
        StepId::Clone
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<Outcome, StepError> {
        let dir = &ctx.config.install_dir;
        let repo = &ctx.config.repo_url;

        if ctx.fs.exists(&dir.join(".git")) {
            info!("updating existing checkout at {dir}");
            run_required(
                ctx.commands,
                CommandSpec::new("git", ["pull"]).cwd(dir),
                "pulling the dotfiles repository",
            )?;
        } else {
            info!("cloning {repo} into {dir}");
            run_required(
                ctx.commands,
                CommandSpec::new(
                    "git",
                    ["clone", "--recurse-submodules", repo.as_str(), dir.as_str()],
                ),
                "cloning the dotfiles repository",
            )?;
        }

        // Converge submodules on both paths.
        run_required(
            ctx.commands,
            CommandSpec::new("git", ["submodule", "update", "--init", "--recursive"]).cwd(dir),
            "updating submodules",
        )?;

        Ok(Outcome::Done)
    }
}
