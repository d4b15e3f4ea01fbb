//! Host sanity checks: OS family, build prerequisites, required tools.

use crate::os::{self, OsFamily};
use rigup_core::{CommandSpec, Step, StepContext};
use rigup_types::{Outcome, StepError, StepId};
use tracing::info;

/// Commands every later step depends on.
const REQUIRED_TOOLS: &[&str] = &["curl", "git"];

pub struct Preflight;

impl Step for Preflight {
    fn id(&self) -> StepId {
        StepId::Preflight
    }

    fn run(&self, ctx: &StepContext<'_>) -> Result<Outcome, StepError> {
        let family = os::detect()?;
        info!("detected OS family: {family}");

        let mut warning = None;
        if ctx
            .prompt
            .confirm("Install baseline build prerequisites now?")?
        {
            if let Err(msg) = install_prerequisites(ctx, family) {
                warning = Some(msg);
            }
        } else {
            info!("prerequisite install declined; continuing");
        }

        for tool in REQUIRED_TOOLS {
            if !ctx.commands.which(tool) {
                return Err(StepError::MissingCommand { name: tool });
            }
        }

        Ok(match warning {
            Some(msg) => Outcome::Warned(msg),
            None => Outcome::Done,
        })
    }
}

/// Best-effort prerequisite install. Failures are soft: the tools may
/// already be present, which the required-tool check decides.
fn install_prerequisites(ctx: &StepContext<'_>, family: OsFamily) -> Result<(), String> {
    let specs = match family {
        OsFamily::MacOs => vec![CommandSpec::new("xcode-select", ["--install"])],
        OsFamily::Linux => linux_prerequisite_specs(ctx)?,
    };

    for spec in specs {
        let display = spec.display();
        match ctx.commands.run(&spec) {
            Ok(out) if out.success => {}
            Ok(out) => {
                return Err(format!("'{display}' failed: {}", out.detail()));
            }
            Err(err) => return Err(format!("could not run '{display}': {err}")),
        }
    }
    Ok(())
}

fn linux_prerequisite_specs(ctx: &StepContext<'_>) -> Result<Vec<CommandSpec>, String> {
    let commands = if ctx.commands.which("apt-get") {
        vec![
            sudo_wrap(ctx, "apt-get", &["update"]),
            sudo_wrap(ctx, "apt-get", &["install", "-y", "build-essential", "curl", "git"]),
        ]
    } else if ctx.commands.which("dnf") {
        vec![sudo_wrap(ctx, "dnf", &["install", "-y", "gcc", "make", "curl", "git"])]
    } else if ctx.commands.which("pacman") {
        vec![sudo_wrap(
            ctx,
            "pacman",
            &["-Sy", "--noconfirm", "base-devel", "curl", "git"],
        )]
    } else {
        return Err("no supported package manager found (apt-get, dnf, pacman); \
                    install build tools manually"
            .to_string());
    };
    Ok(commands)
}

/// Prefix with sudo when it exists; inside containers we are usually root
/// and sudo is not installed.
fn sudo_wrap(ctx: &StepContext<'_>, program: &str, args: &[&str]) -> CommandSpec {
    if ctx.commands.which("sudo") {
        let mut full = vec![program];
        full.extend_from_slice(args);
        CommandSpec::new("sudo", full)
    } else {
        CommandSpec::new(program, args.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigup_core::ScriptedHost;
    use rigup_types::RunConfig;

    fn ctx<'a>(config: &'a RunConfig, host: &'a ScriptedHost) -> StepContext<'a> {
        StepContext {
            config,
            commands: host,
            fs: host,
            prompt: host,
        }
    }

    #[test]
    fn fails_when_git_is_missing() {
        let config = RunConfig::default();
        let host = ScriptedHost::new().with_binary("curl").with_confirm(false);
        let err = Preflight.run(&ctx(&config, &host)).unwrap_err();
        assert!(matches!(err, StepError::MissingCommand { name: "git" }));
    }

    #[test]
    fn declined_prompt_skips_prerequisite_install() {
        let config = RunConfig::default();
        let host = ScriptedHost::new()
            .with_binary("curl")
            .with_binary("git")
            .with_binary("apt-get")
            .with_confirm(false);
        let outcome = Preflight.run(&ctx(&config, &host)).expect("preflight");
        assert_eq!(outcome, Outcome::Done);
        assert!(!host.ran("apt-get"));
        assert!(!host.ran("sudo"));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn confirmed_prompt_installs_via_apt_without_sudo() {
        let config = RunConfig::default();
        let host = ScriptedHost::new()
            .with_binary("curl")
            .with_binary("git")
            .with_binary("apt-get");
        let outcome = Preflight.run(&ctx(&config, &host)).expect("preflight");
        assert_eq!(outcome, Outcome::Done);
        assert!(host.ran("apt-get update"));
        assert!(host.ran("apt-get install -y build-essential"));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn uses_sudo_when_present() {
        let config = RunConfig::default();
        let host = ScriptedHost::new()
            .with_binary("curl")
            .with_binary("git")
            .with_binary("sudo")
            .with_binary("apt-get");
        Preflight.run(&ctx(&config, &host)).expect("preflight");
        assert!(host.ran("sudo apt-get update"));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn unknown_package_manager_is_a_soft_warning() {
        let config = RunConfig::default();
        let host = ScriptedHost::new().with_binary("curl").with_binary("git");
        let outcome = Preflight.run(&ctx(&config, &host)).expect("preflight");
        assert!(matches!(outcome, Outcome::Warned(msg) if msg.contains("package manager")));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn failed_prerequisite_install_is_a_soft_warning() {
        let config = RunConfig::default();
        let host = ScriptedHost::new()
            .with_binary("curl")
            .with_binary("git")
            .with_binary("apt-get")
            .with_result("apt-get update", false, "", "no network");
        let outcome = Preflight.run(&ctx(&config, &host)).expect("preflight");
        assert!(matches!(outcome, Outcome::Warned(msg) if msg.contains("no network")));
    }
}
