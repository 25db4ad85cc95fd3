//! GitHub CLI backend.
//!
//! Drives the hosted service through the `gh` binary.
//!
//! ## Requirements
//!
//! - `gh` must be installed and authenticated (`gh auth login`)
//! - the token needs permission to write repository secrets and dispatch
//!   workflows
//!
//! Set `MASKRACE_GH` to use a binary that is not on `PATH`.

use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use tracing::{debug, trace};

use super::{Platform, RunId, RunSummary, RunView, Status};
use crate::core::constants;
use crate::error::{PlatformError, Result, SetupError};

/// Listing depth when looking for a freshly triggered run.
const LIST_LIMIT: &str = "20";

/// `gh` CLI backend.
#[derive(Debug, Clone)]
pub struct GhCli {
    program: PathBuf,
    repo: Option<String>,
}

impl GhCli {
    /// Create a backend for an explicit binary.
    ///
    /// Without `repo`, `gh` infers the repository from the current directory.
    pub fn new(program: impl Into<PathBuf>, repo: Option<String>) -> Self {
        Self {
            program: program.into(),
            repo,
        }
    }

    /// Find `gh` via `MASKRACE_GH` or `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::ToolMissing` if no binary can be found.
    pub fn locate(repo: Option<String>) -> Result<Self> {
        let program = match std::env::var_os(constants::GH_ENV) {
            Some(path) => PathBuf::from(path),
            None => which::which("gh").map_err(|_| SetupError::ToolMissing)?,
        };
        debug!(program = %program.display(), "using gh binary");
        Ok(Self::new(program, repo))
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(repo) = &self.repo {
            cmd.args(["--repo", repo]);
        }
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> PlatformError {
        PlatformError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }

    /// Run `gh` with `args`, returning stdout on success.
    fn run(&self, args: &[&str]) -> Result<String> {
        debug!(command = %args.join(" "), "gh");

        let output = self
            .command(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = check(args, output)?;
        trace!(bytes = stdout.len(), "gh output");
        Ok(stdout)
    }

    fn run_json<T: DeserializeOwned>(&self, args: &[&str]) -> Result<T> {
        let stdout = self.run(args)?;
        serde_json::from_str(&stdout).map_err(|source| {
            PlatformError::Parse {
                command: args.join(" "),
                source,
            }
            .into()
        })
    }
}

/// Turn a finished process into its stdout or a command error.
fn check(args: &[&str], output: Output) -> Result<String> {
    if !output.status.success() {
        return Err(PlatformError::Command {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

impl Platform for GhCli {
    fn set_secret(&self, name: &str, value: &str) -> Result<()> {
        let args = ["secret", "set", name];
        debug!(secret = name, "gh secret set");

        // The value goes through stdin so it never shows up in argv.
        let mut child = self
            .command(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(value.as_bytes()),
            None => Ok(()),
        };

        // Reap the child even when the write failed.
        let output = child.wait_with_output().map_err(|e| self.spawn_error(e))?;
        written.map_err(|source| PlatformError::Stdin {
            command: args.join(" "),
            source,
        })?;
        check(&args, output).map(|_| ())
    }

    fn trigger_run(
        &self,
        workflow: &str,
        git_ref: &str,
        inputs: &[(&str, String)],
    ) -> Result<()> {
        let fields: Vec<String> = inputs.iter().map(|(k, v)| format!("{}={}", k, v)).collect();

        let mut args = vec!["workflow", "run", workflow, "--ref", git_ref];
        for field in &fields {
            args.extend(["-f", field.as_str()]);
        }
        self.run(&args).map(|_| ())
    }

    fn list_runs(
        &self,
        workflow: &str,
        branch: &str,
        statuses: &[Status],
    ) -> Result<Vec<RunSummary>> {
        let runs: Vec<RunSummary> = self.run_json(&[
            "run",
            "list",
            "--workflow",
            workflow,
            "--branch",
            branch,
            "--limit",
            LIST_LIMIT,
            "--json",
            "databaseId,status",
        ])?;

        Ok(runs
            .into_iter()
            .filter(|r| statuses.contains(&r.status))
            .collect())
    }

    fn view_run(&self, run: RunId) -> Result<RunView> {
        let id = run.to_string();
        self.run_json(&["run", "view", &id, "--json", "status,conclusion,jobs"])
    }

    fn run_logs(&self, run: RunId) -> Result<String> {
        let id = run.to_string();
        self.run(&["run", "view", &id, "--log"])
    }

    fn watch_run(&self, run: RunId) -> Result<bool> {
        let id = run.to_string();
        let args = ["run", "watch", id.as_str(), "--exit-status"];
        debug!(command = %args.join(" "), "gh");

        let status = self
            .command(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| self.spawn_error(e))?;
        Ok(status.success())
    }

    fn name(&self) -> &'static str {
        "gh"
    }
}
