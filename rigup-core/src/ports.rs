//! Port traits abstracting all host I/O away from the runner and steps.

use camino::{Utf8Path, Utf8PathBuf};

/// One external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<Utf8PathBuf>,
    pub env: Vec<(String, String)>,
    /// Probes are read-only; the dry-run adapter executes them for real so
    /// that control flow stays realistic without mutating anything.
    pub mutates: bool,
}

impl CommandSpec {
    /// A mutating command. Suppressed (printed only) under dry-run.
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            env: Vec::new(),
            mutates: true,
        }
    }

    /// A read-only probe. Executed even under dry-run.
    pub fn probe<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            mutates: false,
            ..Self::new(program, args)
        }
    }

    pub fn cwd(mut self, dir: &Utf8Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    /// Shell-like rendering for logs and dry-run output.
    pub fn display(&self) -> String {
        let mut out = self.program.clone();
        for arg in &self.args {
            out.push(' ');
            if arg.contains(' ') {
                out.push('\'');
                out.push_str(arg);
                out.push('\'');
            } else {
                out.push_str(arg);
            }
        }
        out
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default)]
pub struct CmdOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// Stdout and stderr concatenated, for marker scanning.
    pub fn combined(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Trimmed stderr (falling back to stdout) for error messages.
    pub fn detail(&self) -> String {
        let err = self.stderr.trim();
        if err.is_empty() {
            self.stdout.trim().to_string()
        } else {
            err.to_string()
        }
    }
}

/// External command execution and search-path queries.
pub trait CommandPort {
    /// Run a command to completion, capturing output. `Err` means the
    /// command could not be spawned; a nonzero exit is reported through
    /// `CmdOutput::success`.
    fn run(&self, spec: &CommandSpec) -> anyhow::Result<CmdOutput>;

    /// Whether `program` resolves on the current search path.
    fn which(&self, program: &str) -> bool;

    /// Prepend `dir` to the process search path for the rest of the run.
    fn prepend_path(&self, dir: &Utf8Path) -> anyhow::Result<()>;
}

/// Read-mostly filesystem queries the steps need.
pub trait FsPort {
    fn exists(&self, path: &Utf8Path) -> bool;

    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String>;

    /// Write a file (used for the filtered Brewfile). Suppressed under
    /// dry-run.
    fn write_file(&self, path: &Utf8Path, contents: &str) -> anyhow::Result<()>;

    /// Names of non-hidden top-level directories under `dir`, sorted.
    fn package_dirs(&self, dir: &Utf8Path) -> anyhow::Result<Vec<String>>;

    fn home_dir(&self) -> Utf8PathBuf;
}

/// Yes/no confirmation.
pub trait PromptPort {
    fn confirm(&self, question: &str) -> anyhow::Result<bool>;
}
