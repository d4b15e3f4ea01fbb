mod config;

use camino::Utf8PathBuf;
use clap::Parser;
use rigup_core::{
    run_steps, AutoConfirmPrompt, CommandPort, DryRunCommandPort, DryRunFsPort, FsPort,
    HostFsPort, PromptPort, ShellCommandPort, StepContext, TerminalPrompt,
};
use rigup_types::{RunConfig, RunSummary, StepId};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "rigup",
    version,
    about = "Idempotent workstation bootstrap: dotfiles, packages, symlinks."
)]
pub(crate) struct Cli {
    /// Auto-confirm all interactive prompts.
    #[arg(long)]
    yes: bool,

    /// Print underlying commands instead of executing them.
    #[arg(long)]
    dry_run: bool,

    /// Restrict the run to these steps (comma-separated, repeatable).
    #[arg(long, value_name = "STEPS", value_delimiter = ',')]
    only: Vec<String>,

    /// Exclude these steps (comma-separated; repeated flags accumulate).
    #[arg(long, value_name = "STEPS", value_delimiter = ',')]
    skip: Vec<String>,

    /// Dotfiles repository URL, or a local path for offline runs.
    #[arg(long, value_name = "URL", env = "DOTFILES_REPO")]
    dotfiles_repo: Option<String>,

    /// Where the dotfiles repository is cloned.
    #[arg(long, value_name = "PATH", env = "DOTFILES_DIR")]
    dotfiles_dir: Option<Utf8PathBuf>,

    /// Contact email, used only in ssh-keygen guidance.
    #[arg(long, value_name = "EMAIL", env = "SSH_EMAIL")]
    ssh_email: Option<String>,

    /// Print the step catalog and exit.
    #[arg(long)]
    list_steps: bool,

    /// Output format for --list-steps.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            use clap::error::ErrorKind;
            // Help and version are success; every usage error is remapped
            // from clap's default exit 2 to the documented exit 1.
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    print!("{err}");
                    ExitCode::SUCCESS
                }
                _ => {
                    eprint!("{err}");
                    ExitCode::from(1)
                }
            };
        }
    };

    if let Err(err) = real_main(cli) {
        error!("{err:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main(cli: Cli) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .init();

    if cli.list_steps {
        list_steps(cli.format)?;
        return Ok(());
    }

    let config = config::build_run_config(&cli)?;
    let summary = execute(&config)?;
    info!(
        "done: {} executed, {} skipped, {} warning(s)",
        summary.executed().len(),
        summary.skipped().len(),
        summary.warnings()
    );
    Ok(())
}

fn execute(config: &RunConfig) -> anyhow::Result<RunSummary> {
    let shell = ShellCommandPort;
    let host_fs = HostFsPort;

    if config.dry_run {
        let commands = DryRunCommandPort::new(&shell);
        let fs = DryRunFsPort::new(&host_fs);
        run(config, &commands, &fs)
    } else {
        run(config, &shell, &host_fs)
    }
}

fn run(
    config: &RunConfig,
    commands: &dyn CommandPort,
    fs: &dyn FsPort,
) -> anyhow::Result<RunSummary> {
    let prompt: Box<dyn PromptPort> = if config.confirm_all || config.dry_run {
        Box::new(AutoConfirmPrompt)
    } else {
        Box::new(TerminalPrompt)
    };
    let ctx = StepContext {
        config,
        commands,
        fs,
        prompt: prompt.as_ref(),
    };
    let steps = rigup_steps::catalog();
    Ok(run_steps(&steps, &ctx)?)
}

fn list_steps(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Available steps (run in this order):\n");
            for step in StepId::ALL {
                println!("  {:<12} {}", step.name(), step.summary());
            }
            println!();
            println!("Use 'rigup --only <a,b,...>' to run a subset.");
        }
        OutputFormat::Json => {
            let steps: Vec<_> = StepId::ALL
                .iter()
                .map(|s| {
                    serde_json::json!({
                        "name": s.name(),
                        "summary": s.summary(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&steps)?);
        }
    }
    Ok(())
}
