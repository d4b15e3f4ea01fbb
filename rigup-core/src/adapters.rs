//! Default host-backed port implementations, the dry-run wrappers, and an
//! in-memory scripted host for tests.

use crate::ports::{CmdOutput, CommandPort, CommandSpec, FsPort, PromptPort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::process::Command;
use std::sync::Mutex;
use tracing::{debug, info};

/// Runs commands via `std::process::Command`, blocking until completion.
#[derive(Debug, Clone, Default)]
pub struct ShellCommandPort;

impl CommandPort for ShellCommandPort {
    fn run(&self, spec: &CommandSpec) -> anyhow::Result<CmdOutput> {
        debug!("running: {}", spec.display());
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }
        let output = cmd
            .output()
            .with_context(|| format!("spawn '{}'", spec.program))?;
        Ok(CmdOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn which(&self, program: &str) -> bool {
        let Ok(path) = std::env::var("PATH") else {
            return false;
        };
        std::env::split_paths(&path).any(|dir| is_executable(&dir.join(program)))
    }

    fn prepend_path(&self, dir: &Utf8Path) -> anyhow::Result<()> {
        let current = std::env::var("PATH").unwrap_or_default();
        let updated = if current.is_empty() {
            dir.to_string()
        } else {
            format!("{dir}:{current}")
        };
        debug!("prepending {dir} to PATH");
        std::env::set_var("PATH", updated);
        Ok(())
    }
}

/// A PATH entry only counts if it could actually be spawned: a plain data
/// file shadowing a tool name must not pass the lookup.
#[cfg(unix)]
fn is_executable(path: &std::path::Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &std::path::Path) -> bool {
    path.is_file()
}

/// Filesystem queries via `fs-err`.
#[derive(Debug, Clone, Default)]
pub struct HostFsPort;

impl FsPort for HostFsPort {
    fn exists(&self, path: &Utf8Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String> {
        fs::read_to_string(path).with_context(|| format!("read {path}"))
    }

    fn write_file(&self, path: &Utf8Path, contents: &str) -> anyhow::Result<()> {
        fs::write(path, contents).with_context(|| format!("write {path}"))
    }

    fn package_dirs(&self, dir: &Utf8Path) -> anyhow::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(dir).with_context(|| format!("list {dir}"))? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    fn home_dir(&self) -> Utf8PathBuf {
        std::env::var("HOME")
            .map(Utf8PathBuf::from)
            .unwrap_or_else(|_| Utf8PathBuf::from("."))
    }
}

/// Dry-run wrapper: mutating commands are printed, never executed;
/// read-only probes pass through to the real port.
pub struct DryRunCommandPort<'a> {
    inner: &'a dyn CommandPort,
}

impl<'a> DryRunCommandPort<'a> {
    pub fn new(inner: &'a dyn CommandPort) -> Self {
        Self { inner }
    }
}

impl CommandPort for DryRunCommandPort<'_> {
    fn run(&self, spec: &CommandSpec) -> anyhow::Result<CmdOutput> {
        if spec.mutates {
            info!("+ {}", spec.display());
            return Ok(CmdOutput::ok());
        }
        self.inner.run(spec)
    }

    fn which(&self, program: &str) -> bool {
        self.inner.which(program)
    }

    fn prepend_path(&self, dir: &Utf8Path) -> anyhow::Result<()> {
        info!("+ PATH={dir}:$PATH");
        Ok(())
    }
}

/// Dry-run wrapper for the filesystem: writes are printed, reads pass
/// through.
pub struct DryRunFsPort<'a> {
    inner: &'a dyn FsPort,
}

impl<'a> DryRunFsPort<'a> {
    pub fn new(inner: &'a dyn FsPort) -> Self {
        Self { inner }
    }
}

impl FsPort for DryRunFsPort<'_> {
    fn exists(&self, path: &Utf8Path) -> bool {
        self.inner.exists(path)
    }

    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String> {
        self.inner.read_to_string(path)
    }

    fn write_file(&self, path: &Utf8Path, _contents: &str) -> anyhow::Result<()> {
        info!("+ write {path}");
        Ok(())
    }

    fn package_dirs(&self, dir: &Utf8Path) -> anyhow::Result<Vec<String>> {
        self.inner.package_dirs(dir)
    }

    fn home_dir(&self) -> Utf8PathBuf {
        self.inner.home_dir()
    }
}

/// Answers yes to everything. Used for `--yes` and dry-run.
#[derive(Debug, Clone, Default)]
pub struct AutoConfirmPrompt;

impl PromptPort for AutoConfirmPrompt {
    fn confirm(&self, question: &str) -> anyhow::Result<bool> {
        debug!("auto-confirming: {question}");
        Ok(true)
    }
}

/// Asks on stdout, reads one line from stdin. `y`/`yes` (any case) is yes.
#[derive(Debug, Clone, Default)]
pub struct TerminalPrompt;

impl PromptPort for TerminalPrompt {
    fn confirm(&self, question: &str) -> anyhow::Result<bool> {
        print!("{question} [y/N] ");
        std::io::stdout().flush().context("flush prompt")?;
        let mut answer = String::new();
        std::io::stdin()
            .read_line(&mut answer)
            .context("read confirmation")?;
        let answer = answer.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

/// In-memory host for unit tests: canned binaries, files, and command
/// results, with every invocation recorded.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    binaries: Mutex<BTreeSet<String>>,
    binaries_after_prepend: Mutex<BTreeSet<String>>,
    files: Mutex<BTreeMap<String, String>>,
    packages: Mutex<Vec<String>>,
    results: Mutex<BTreeMap<String, (bool, String, String)>>,
    home: Utf8PathBuf,
    confirm_answer: bool,
    pub invocations: Mutex<Vec<String>>,
    pub writes: Mutex<Vec<String>>,
    pub path_prepends: Mutex<Vec<String>>,
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self {
            home: Utf8PathBuf::from("/home/tester"),
            confirm_answer: true,
            ..Self::default()
        }
    }

    pub fn with_binary(self, name: &str) -> Self {
        self.binaries.lock().expect("binaries").insert(name.to_string());
        self
    }

    /// Binary that only becomes resolvable once `prepend_path` has run,
    /// simulating a tool installed mid-run.
    pub fn with_binary_after_install(self, name: &str) -> Self {
        self.binaries_after_prepend
            .lock()
            .expect("binaries_after_prepend")
            .insert(name.to_string());
        self
    }

    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.files
            .lock()
            .expect("files")
            .insert(path.to_string(), contents.to_string());
        self
    }

    pub fn with_packages(self, names: &[&str]) -> Self {
        *self.packages.lock().expect("packages") =
            names.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Canned result for any invocation whose rendered command line starts
    /// with `prefix`. Longest matching prefix wins; unmatched commands
    /// succeed with empty output.
    pub fn with_result(self, prefix: &str, success: bool, stdout: &str, stderr: &str) -> Self {
        self.results.lock().expect("results").insert(
            prefix.to_string(),
            (success, stdout.to_string(), stderr.to_string()),
        );
        self
    }

    pub fn with_home(mut self, home: &str) -> Self {
        self.home = Utf8PathBuf::from(home);
        self
    }

    pub fn with_confirm(mut self, answer: bool) -> Self {
        self.confirm_answer = answer;
        self
    }

    pub fn invoked(&self) -> Vec<String> {
        self.invocations.lock().expect("invocations").clone()
    }

    /// Whether any recorded invocation starts with `prefix`.
    pub fn ran(&self, prefix: &str) -> bool {
        self.invoked().iter().any(|line| line.starts_with(prefix))
    }
}

impl CommandPort for ScriptedHost {
    fn run(&self, spec: &CommandSpec) -> anyhow::Result<CmdOutput> {
        let line = spec.display();
        self.invocations.lock().expect("invocations").push(line.clone());

        let results = self.results.lock().expect("results");
        let best = results
            .iter()
            .filter(|(prefix, _)| line.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len());
        Ok(match best {
            Some((_, (success, stdout, stderr))) => CmdOutput {
                success: *success,
                stdout: stdout.clone(),
                stderr: stderr.clone(),
            },
            None => CmdOutput::ok(),
        })
    }

    fn which(&self, program: &str) -> bool {
        self.binaries.lock().expect("binaries").contains(program)
    }

    fn prepend_path(&self, dir: &Utf8Path) -> anyhow::Result<()> {
        self.path_prepends
            .lock()
            .expect("path_prepends")
            .push(dir.to_string());
        let installed: Vec<String> = self
            .binaries_after_prepend
            .lock()
            .expect("binaries_after_prepend")
            .iter()
            .cloned()
            .collect();
        self.binaries.lock().expect("binaries").extend(installed);
        Ok(())
    }
}

impl FsPort for ScriptedHost {
    fn exists(&self, path: &Utf8Path) -> bool {
        self.files.lock().expect("files").contains_key(path.as_str())
    }

    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String> {
        self.files
            .lock()
            .expect("files")
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such file: {path}"))
    }

    fn write_file(&self, path: &Utf8Path, contents: &str) -> anyhow::Result<()> {
        self.writes.lock().expect("writes").push(path.to_string());
        self.files
            .lock()
            .expect("files")
            .insert(path.to_string(), contents.to_string());
        Ok(())
    }

    fn package_dirs(&self, _dir: &Utf8Path) -> anyhow::Result<Vec<String>> {
        Ok(self.packages.lock().expect("packages").clone())
    }

    fn home_dir(&self) -> Utf8PathBuf {
        self.home.clone()
    }
}

impl PromptPort for ScriptedHost {
    fn confirm(&self, _question: &str) -> anyhow::Result<bool> {
        Ok(self.confirm_answer)
    }
}
