use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One named step of the provisioning pipeline.
///
/// The variant order here is the execution order. It is the only ordering
/// guarantee in the system: no dependency graph, no parallelism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Preflight,
    Ssh,
    Clone,
    Brew,
    Bundle,
    Stow,
    Postflight,
}

impl StepId {
    /// The full catalog, in execution order.
    pub const ALL: &'static [StepId] = &[
        StepId::Preflight,
        StepId::Ssh,
        StepId::Clone,
        StepId::Brew,
        StepId::Bundle,
        StepId::Stow,
        StepId::Postflight,
    ];

    /// Stable CLI-facing name.
    pub fn name(self) -> &'static str {
        match self {
            StepId::Preflight => "preflight",
            StepId::Ssh => "ssh",
            StepId::Clone => "clone",
            StepId::Brew => "brew",
            StepId::Bundle => "bundle",
            StepId::Stow => "stow",
            StepId::Postflight => "postflight",
        }
    }

    /// One-line description for `--list-steps`.
    pub fn summary(self) -> &'static str {
        match self {
            StepId::Preflight => "detect the OS family and verify curl/git are present",
            StepId::Ssh => "verify an SSH credential exists and GitHub auth works",
            StepId::Clone => "clone or update the dotfiles repository (with submodules)",
            StepId::Brew => "install Homebrew if it is not already on the PATH",
            StepId::Bundle => "install packages from the Brewfile (optional)",
            StepId::Stow => "restow dotfiles into the home directory (optional)",
            StepId::Postflight => "print next-step guidance",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A step name that is not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown step '{name}' (known steps: {known})", known = known_names())]
pub struct UnknownStep {
    pub name: String,
}

fn known_names() -> String {
    let names: Vec<&str> = StepId::ALL.iter().map(|s| s.name()).collect();
    names.join(", ")
}

impl FromStr for StepId {
    type Err = UnknownStep;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepId::ALL
            .iter()
            .copied()
            .find(|step| step.name() == s)
            .ok_or_else(|| UnknownStep {
                name: s.to_string(),
            })
    }
}

/// Parse a comma-separated step list, trimming whitespace and skipping
/// empty segments. The first unknown name aborts the parse.
pub fn parse_step_list(raw: &str) -> Result<Vec<StepId>, UnknownStep> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(StepId::from_str)
        .collect()
}
