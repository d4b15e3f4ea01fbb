//! Conformance harness: exercises the `rigup` binary inside a disposable
//! Docker container so full runs never touch the developer's machine.
//!
//! Each sub-run boots a fresh container from the conformance image, mounts
//! the working tree read-only at /src to stand in for the dotfiles remote,
//! and invokes `rigup` against it. The harness only tallies exit codes; the
//! assertions live in the pipeline itself.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use colored::Colorize;
use rigup_types::{parse_step_list, StepId};
use std::process::{Command, ExitCode};
use tracing::info;
use tracing_subscriber::EnvFilter;

const IMAGE: &str = "rigup-conformance";
const DOCKERFILE: &str = "docker/Dockerfile";

#[derive(Debug, Parser)]
#[command(
    name = "rigup-harness",
    version,
    about = "Run rigup conformance checks in a throwaway container."
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Print the final tally as JSON instead of colored text.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Build the conformance image.
    Build,
    /// Run a single step by name.
    Step { name: String },
    /// Run an explicit comma-separated step list.
    Prefix { list: String },
    /// Run every step individually.
    AllSteps,
    /// Run every order-prefix of the catalog.
    AllPrefixes,
    /// Build the image, then run all-steps and all-prefixes.
    All,
}

#[derive(Debug, Default, serde::Serialize)]
struct Tally {
    passed: Vec<String>,
    failed: Vec<String>,
}

impl Tally {
    fn record(&mut self, label: &str, ok: bool) {
        if ok {
            println!("{} {label}", "PASS".green().bold());
            self.passed.push(label.to_string());
        } else {
            println!("{} {label}", "FAIL".red().bold());
            self.failed.push(label.to_string());
        }
    }

    fn report(&self, json: bool) -> anyhow::Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
            return Ok(());
        }
        println!();
        println!(
            "{} passed, {} failed",
            self.passed.len().to_string().green(),
            if self.failed.is_empty() {
                self.failed.len().to_string().normal()
            } else {
                self.failed.len().to_string().red()
            }
        );
        for label in &self.failed {
            println!("  {} {label}", "FAIL".red());
        }
        Ok(())
    }

    fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match real_main(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(1)
        }
    }
}

fn real_main(cli: Cli) -> anyhow::Result<bool> {
    let mut tally = Tally::default();

    match &cli.command {
        Cmd::Build => {
            tally.record("build image", build_image()?);
        }
        Cmd::Step { name } => {
            let step: StepId = name.parse()?;
            run_selection(&mut tally, step.name())?;
        }
        Cmd::Prefix { list } => {
            let steps = parse_step_list(list)?;
            if steps.is_empty() {
                bail!("empty step list");
            }
            run_selection(&mut tally, &join_names(&steps))?;
        }
        Cmd::AllSteps => {
            for step in StepId::ALL {
                run_selection(&mut tally, step.name())?;
            }
        }
        Cmd::AllPrefixes => {
            for prefix in order_prefixes() {
                run_selection(&mut tally, &prefix)?;
            }
        }
        Cmd::All => {
            if !build_image()? {
                tally.record("build image", false);
                tally.report(cli.json)?;
                return Ok(false);
            }
            tally.record("build image", true);
            for step in StepId::ALL {
                run_selection(&mut tally, step.name())?;
            }
            for prefix in order_prefixes() {
                run_selection(&mut tally, &prefix)?;
            }
        }
    }

    tally.report(cli.json)?;
    Ok(tally.all_passed())
}

fn run_selection(tally: &mut Tally, selection: &str) -> anyhow::Result<()> {
    info!("running selection: {selection}");
    let src = std::env::current_dir().context("resolve working directory")?;
    let src = src
        .to_str()
        .context("working directory is not valid UTF-8")?;
    let args = docker_run_args(src, selection);
    let status = Command::new("docker")
        .args(&args)
        .status()
        .context("spawn docker; is it installed and running?")?;
    tally.record(selection, status.success());
    Ok(())
}

fn build_image() -> anyhow::Result<bool> {
    info!("building {IMAGE} from {DOCKERFILE}");
    let status = Command::new("docker")
        .args(["build", "-t", IMAGE, "-f", DOCKERFILE, "."])
        .status()
        .context("spawn docker; is it installed and running?")?;
    Ok(status.success())
}

/// Arguments for one containerized `rigup` invocation. The working tree is
/// mounted read-only and doubles as the dotfiles remote, so runs need no
/// network and no real GitHub credential.
fn docker_run_args(src: &str, selection: &str) -> Vec<String> {
    let mut args: Vec<String> = ["run", "--rm", "-e", "SKIP_SSH_GITHUB_CHECK=1", "-v"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    args.push(format!("{src}:/src:ro"));
    args.extend(
        [
            IMAGE,
            "rigup",
            "--yes",
            "--dotfiles-repo",
            "/src",
            "--dotfiles-dir",
            "/root/dotfiles",
            "--only",
            selection,
        ]
        .iter()
        .map(|s| s.to_string()),
    );
    args
}

fn join_names(steps: &[StepId]) -> String {
    steps
        .iter()
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(",")
}

/// Every prefix of the execution order, shortest first.
fn order_prefixes() -> Vec<String> {
    (1..=StepId::ALL.len())
        .map(|len| join_names(&StepId::ALL[..len]))
        .collect()
}
