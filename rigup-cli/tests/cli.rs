//! End-to-end tests for the `rigup` binary: flag parsing, exit codes, and
//! full runs against a sandboxed HOME and PATH.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn rigup() -> Command {
    Command::cargo_bin("rigup").expect("rigup binary")
}

/// A sandbox with its own HOME and a bin dir controlling what `which` sees.
struct Sandbox {
    _temp: tempfile::TempDir,
    home: std::path::PathBuf,
    bin: std::path::PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("tempdir");
        let home = temp.path().join("home");
        let bin = temp.path().join("bin");
        fs::create_dir_all(&home).expect("home dir");
        fs::create_dir_all(&bin).expect("bin dir");
        Self {
            _temp: temp,
            home,
            bin,
        }
    }

    /// Tool lookup needs an executable file at `$PATH/<name>`; nothing
    /// spawns the stubs in these tests.
    fn with_tool(self, name: &str) -> Self {
        let stub = self.bin.join(name);
        fs::write(&stub, "#!/bin/sh\nexit 0\n").expect("tool stub");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).expect("chmod stub");
        }
        self
    }

    fn with_ssh_key(self) -> Self {
        let ssh_dir = self.home.join(".ssh");
        fs::create_dir_all(&ssh_dir).expect(".ssh dir");
        fs::write(ssh_dir.join("id_ed25519"), "fake key material").expect("key file");
        self
    }

    fn command(&self) -> Command {
        let mut cmd = rigup();
        cmd.env_clear()
            .env("HOME", &self.home)
            .env("PATH", &self.bin);
        cmd
    }

    fn dotfiles_dir(&self) -> String {
        self.home.join("dotfiles").to_string_lossy().into_owned()
    }
}

#[test]
fn help_exits_zero() {
    rigup()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--only"));
}

#[test]
fn version_exits_zero() {
    rigup()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rigup"));
}

#[test]
fn unknown_flag_exits_one() {
    rigup().arg("--bogus").assert().code(1);
}

#[test]
fn list_steps_prints_catalog_in_order() {
    let output = rigup().arg("--list-steps").assert().success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).expect("utf8");
    let preflight = stdout.find("preflight").expect("preflight listed");
    let postflight = stdout.find("postflight").expect("postflight listed");
    assert!(preflight < postflight);
    for name in ["ssh", "clone", "brew", "bundle", "stow"] {
        assert!(stdout.contains(name), "missing step {name}");
    }
}

#[test]
fn list_steps_json_is_parseable() {
    let output = rigup()
        .args(["--list-steps", "--format", "json"])
        .assert()
        .success();
    let stdout = String::from_utf8(output.get_output().stdout.clone()).expect("utf8");
    let steps: serde_json::Value = serde_json::from_str(&stdout).expect("valid json");
    let steps = steps.as_array().expect("array");
    assert_eq!(steps.len(), 7);
    assert_eq!(steps[0]["name"], "preflight");
    assert_eq!(steps[6]["name"], "postflight");
}

#[test]
fn unknown_only_step_exits_one_before_running_anything() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .args(["--only", "nope", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown step"))
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn unknown_skip_step_exits_one() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .args(["--skip", "tmux"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown step"));
}

#[test]
fn missing_credential_fails_the_ssh_step_with_guidance() {
    // Fresh HOME without keys and no reachable agent: preflight passes on
    // the stubbed curl and git, then ssh fails before clone is reached.
    let sandbox = Sandbox::new().with_tool("curl").with_tool("git");
    sandbox
        .command()
        .env("SKIP_SSH_GITHUB_CHECK", "1")
        .args(["--only", "preflight,ssh", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ssh-keygen -t ed25519"))
        .stderr(predicate::str::contains("cloning").not());
}

#[test]
#[cfg(unix)]
fn non_executable_path_entry_does_not_satisfy_preflight() {
    // A data file named `git` on PATH must not pass the tool check.
    let sandbox = Sandbox::new().with_tool("curl");
    fs::write(sandbox.bin.join("git"), "not a program").expect("data file");
    sandbox
        .command()
        .args(["--only", "preflight", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("required command 'git' not found"));
}

#[test]
fn keygen_guidance_embeds_the_given_email() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .env("SKIP_SSH_GITHUB_CHECK", "1")
        .args(["--only", "ssh", "--ssh-email", "dev@example.org"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("dev@example.org"));
}

#[test]
fn missing_stow_is_a_soft_warning_and_exits_zero() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .args(["--only", "stow"])
        .assert()
        .success()
        .stderr(predicate::str::contains("stow not found"));
}

#[test]
fn skipped_steps_are_logged_by_name() {
    let sandbox = Sandbox::new().with_tool("curl").with_tool("git").with_ssh_key();
    let dotfiles = sandbox.dotfiles_dir();
    sandbox
        .command()
        .args([
            "--skip",
            "bundle,stow",
            "--yes",
            "--dry-run",
            "--dotfiles-dir",
            &dotfiles,
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping bundle"))
        .stderr(predicate::str::contains("skipping stow"));
}

#[test]
fn step_in_both_sets_is_skipped_with_a_warning() {
    let sandbox = Sandbox::new();
    sandbox
        .command()
        .args(["--only", "postflight", "--skip", "postflight", "--yes"])
        .assert()
        .success()
        .stderr(predicate::str::contains("exclude wins"));
}

#[test]
fn dry_run_prints_commands_without_mutating_the_host() {
    let sandbox = Sandbox::new().with_tool("curl").with_tool("git").with_ssh_key();
    let dotfiles = sandbox.dotfiles_dir();
    sandbox
        .command()
        .args(["--yes", "--dry-run", "--dotfiles-dir", &dotfiles])
        .assert()
        .success()
        .stderr(predicate::str::contains("git clone --recurse-submodules"));
    assert!(
        !Path::new(&dotfiles).exists(),
        "dry run must not create the dotfiles directory"
    );
}

#[test]
fn env_vars_stand_in_for_flags() {
    // DOTFILES_DIR routes the stow warning at the configured path.
    let sandbox = Sandbox::new();
    let dotfiles = sandbox.dotfiles_dir();
    sandbox
        .command()
        .env("DOTFILES_DIR", &dotfiles)
        .args(["--only", "stow"])
        .assert()
        .success()
        .stderr(predicate::str::contains("stow not found"));
}
