//! Builds the immutable `RunConfig` from flags plus environment defaults.
//!
//! Step-name validation happens here, before any step action executes.
//! clap's `env` attribute already resolves `DOTFILES_REPO`, `DOTFILES_DIR`,
//! and `SSH_EMAIL`; only the skip-remote-check toggle is read directly.

use anyhow::Context;
use camino::Utf8PathBuf;
use rigup_types::config::{DEFAULT_REPO_URL, SKIP_REMOTE_CHECK_ENV};
use rigup_types::{RunConfig, StepId};
use std::collections::BTreeSet;

pub(crate) fn build_run_config(cli: &crate::Cli) -> anyhow::Result<RunConfig> {
    let include = parse_step_set(&cli.only).context("invalid --only value")?;
    let exclude = parse_step_set(&cli.skip).context("invalid --skip value")?;

    Ok(RunConfig {
        confirm_all: cli.yes,
        dry_run: cli.dry_run,
        include,
        exclude,
        repo_url: cli
            .dotfiles_repo
            .clone()
            .unwrap_or_else(|| DEFAULT_REPO_URL.to_string()),
        install_dir: cli
            .dotfiles_dir
            .clone()
            .unwrap_or_else(default_install_dir),
        ssh_email: cli.ssh_email.clone(),
        skip_remote_check: env_flag(SKIP_REMOTE_CHECK_ENV),
    })
}

fn parse_step_set(names: &[String]) -> anyhow::Result<BTreeSet<StepId>> {
    let mut set = BTreeSet::new();
    for name in names {
        set.insert(name.parse::<StepId>()?);
    }
    Ok(set)
}

fn default_install_dir() -> Utf8PathBuf {
    match std::env::var("HOME") {
        Ok(home) => Utf8PathBuf::from(home).join("dotfiles"),
        Err(_) => Utf8PathBuf::from("dotfiles"),
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
