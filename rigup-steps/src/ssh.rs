//! SSH credential verification.
//!
//! A usable credential is either a private key file at one of the
//! conventional paths or an agent with at least one loaded key. Unless the
//! remote check is skipped, GitHub authentication is verified with a no-op
//! `ssh -T` connection.

use rigup_core::{CommandPort, CommandSpec, Step, StepContext};
use rigup_types::{Outcome, StepError, StepId};
use tracing::info;

const KEY_FILES: &[&str] = &["id_ed25519", "id_rsa", "id_ecdsa"];

/// Marker GitHub prints on a successful no-shell authentication.
const AUTH_MARKER: &str = "successfully authenticated";

pub struct Ssh;

impl Step for Ssh {
    fn id(&self) -> StepId {
        StepId::Ssh
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<Outcome, StepError> {
        let ssh_dir = ctx.fs.home_dir().join(".ssh");
        let key_file = KEY_FILES
            .iter()
            .find(|name| ctx.fs.exists(&ssh_dir.join(name)));

        let has_credential = match key_file {
            Some(name) => {
                info!("found SSH key {ssh_dir}/{name}");
                true
            }
            None => agent_has_keys(ctx.commands),
        };

        if !has_credential {
            return Err(StepError::NoSshCredential {
                guidance: keygen_guidance(ctx.config.ssh_email.as_deref()),
            });
        }

        if ctx.config.skip_remote_check {
            info!("skipping GitHub auth check (SKIP_SSH_GITHUB_CHECK)");
        } else if ctx.config.dry_run {
            info!("dry-run: skipping GitHub auth check");
        } else {
            verify_github_auth(ctx.commands)?;
            info!("GitHub SSH authentication confirmed");
        }

        Ok(Outcome::Done)
    }
}

fn agent_has_keys(commands: &dyn CommandPort) -> bool {
    // ssh-add -l exits 0 only when the agent is reachable and has keys.
    // A spawn failure means no ssh-add at all, so no agent either.
    match commands.run(&CommandSpec::probe("ssh-add", ["-l"])) {
        Ok(out) => out.success,
        Err(_) => false,
    }
}

fn keygen_guidance(email: Option<&str>) -> String {
    let email = email.unwrap_or("you@example.com");
    format!(
        "generate one with:\n  ssh-keygen -t ed25519 -C \"{email}\"\n\
         then add the public key to your GitHub account and re-run rigup"
    )
}

fn verify_github_auth(commands: &dyn CommandPort) -> Result<(), StepError> {
    let spec = CommandSpec::probe(
        "ssh",
        [
            "-T",
            "-o",
            "BatchMode=yes",
            "-o",
            "StrictHostKeyChecking=accept-new",
            "git@github.com",
        ],
    );
    let out = commands.run(&spec)?;
    // GitHub refuses the shell and exits nonzero even on success; only the
    // output marker is trustworthy.
    if out.combined().contains(AUTH_MARKER) {
        Ok(())
    } else {
        Err(StepError::RemoteAuthFailed {
            detail: out.detail(),
        })
    }
}
