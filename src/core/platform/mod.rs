//! CI platform abstraction.
//!
//! The experiment only ever talks to the hosted CI service through these
//! six operations. The default backend shells out to the `gh` CLI.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Platform` trait
//! 2. Add the implementation in a new file next to `gh.rs`
//! 3. Re-export from this module

mod gh;

pub use gh::GhCli;

use serde::Deserialize;
use std::fmt;

use crate::error::Result;

/// Opaque numeric run identifier assigned at trigger time.
pub type RunId = u64;

/// Lifecycle status shared by runs and jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Queued,
    InProgress,
    Completed,
    /// `waiting`, `requested`, `pending` and anything newer.
    #[serde(other)]
    Other,
}

impl Status {
    /// Statuses a freshly triggered run can be found in.
    pub const ACTIVE: &'static [Status] = &[Status::Queued, Status::InProgress];

    /// Every status, for listings that should not filter.
    pub const ANY: &'static [Status] = &[
        Status::Queued,
        Status::InProgress,
        Status::Completed,
        Status::Other,
    ];

    pub fn is_completed(self) -> bool {
        self == Status::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Queued => "queued",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
            Status::Other => "other",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the run listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunSummary {
    #[serde(rename = "databaseId")]
    pub id: RunId,
    pub status: Status,
}

/// A sub-job inside a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Job {
    pub name: String,
    pub status: Status,
    #[serde(default)]
    pub conclusion: Option<String>,
}

/// Run status together with its jobs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunView {
    pub status: Status,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub jobs: Vec<Job>,
}

impl RunView {
    /// Look up a job by exact name.
    pub fn job(&self, name: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.name == name)
    }
}

/// Operations consumed from the hosted CI service.
///
/// Implementations are treated as black boxes. They are assumed reliable
/// apart from the delay between triggering a run and seeing it listed.
pub trait Platform {
    /// Store `value` under the repository secret `name`.
    fn set_secret(&self, name: &str, value: &str) -> Result<()>;

    /// Dispatch `workflow` on `git_ref` with string inputs.
    fn trigger_run(&self, workflow: &str, git_ref: &str, inputs: &[(&str, String)])
        -> Result<()>;

    /// Runs of `workflow` on `branch` whose status is one of `statuses`.
    fn list_runs(&self, workflow: &str, branch: &str, statuses: &[Status])
        -> Result<Vec<RunSummary>>;

    /// Current run status and per-job statuses.
    fn view_run(&self, run: RunId) -> Result<RunView>;

    /// Full textual log of a completed run.
    fn run_logs(&self, run: RunId) -> Result<String>;

    /// Block until the run is terminal. Returns whether it succeeded.
    fn watch_run(&self, run: RunId) -> Result<bool>;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}
