use crate::step::StepId;
use camino::Utf8PathBuf;
use std::collections::BTreeSet;

/// Fallback dotfiles remote when neither `--dotfiles-repo` nor
/// `DOTFILES_REPO` is given.
pub const DEFAULT_REPO_URL: &str = "git@github.com:yourname/dotfiles.git";

/// Environment variable that bypasses the remote GitHub auth check in the
/// ssh step (`1` or `true`).
pub const SKIP_REMOTE_CHECK_ENV: &str = "SKIP_SSH_GITHUB_CHECK";

/// Resolved settings for one invocation of the pipeline.
///
/// Built once from flags plus environment defaults, then passed by
/// reference to the runner and every step. Never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Answer yes to every interactive prompt.
    pub confirm_all: bool,

    /// Print underlying commands instead of executing them.
    pub dry_run: bool,

    /// Restrict the run to these steps. Empty means all.
    pub include: BTreeSet<StepId>,

    /// Steps to exclude. Exclude wins over include.
    pub exclude: BTreeSet<StepId>,

    /// Remote dotfiles repository (or a local path, for conformance runs).
    pub repo_url: String,

    /// Where the dotfiles repository is cloned.
    pub install_dir: Utf8PathBuf,

    /// Contact email, used only in ssh-keygen guidance.
    pub ssh_email: Option<String>,

    /// Skip the remote GitHub auth verification in the ssh step.
    pub skip_remote_check: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            confirm_all: false,
            dry_run: false,
            include: BTreeSet::new(),
            exclude: BTreeSet::new(),
            repo_url: DEFAULT_REPO_URL.to_string(),
            install_dir: Utf8PathBuf::from("dotfiles"),
            ssh_email: None,
            skip_remote_check: false,
        }
    }
}
