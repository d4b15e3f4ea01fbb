//! Bulk package install from the Brewfile. Everything here is optional:
//! a missing manifest or a failed bundle run is a soft warning.

use crate::os::{self, OsFamily};
use rigup_core::{CommandSpec, Step, StepContext};
use rigup_types::{Outcome, StepError, StepId};
use tracing::info;

pub struct Bundle;

impl Step for Bundle {
    fn id(&self) -> StepId {
        StepId::Bundle
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<Outcome, StepError> {
        let brewfile = ctx.config.install_dir.join("Brewfile");
        if !ctx.fs.exists(&brewfile) {
            return Ok(Outcome::Warned(format!(
                "no Brewfile at {brewfile}; skipping bundle install"
            )));
        }

        let manifest = match os::detect()? {
            OsFamily::MacOs => brewfile,
            OsFamily::Linux => {
                // Casks are macOS-only; bundle against a filtered copy.
                let contents = ctx.fs.read_to_string(&brewfile)?;
                let filtered = strip_casks(&contents);
                let path = ctx.config.install_dir.join("Brewfile.linux");
                ctx.fs.write_file(&path, &filtered)?;
                path
            }
        };

        info!("running brew bundle against {manifest}");
        let out = ctx.commands.run(&CommandSpec::new(
            "brew",
            ["bundle", "--file", manifest.as_str()],
        ))?;
        if !out.success {
            return Ok(Outcome::Warned(format!(
                "brew bundle failed: {}",
                out.detail()
            )));
        }

        Ok(Outcome::Done)
    }
}

/// Drop `cask` entries from a Brewfile.
fn strip_casks(contents: &str) -> String {
    let mut out: String = contents
        .lines()
        .filter(|line| !line.trim_start().starts_with("cask "))
        .collect::<Vec<_>>()
        .join("\n");
    if contents.ends_with('\n') && !out.is_empty() {
        out.push('\n');
    }
    out
}
