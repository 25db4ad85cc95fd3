//! Scripted in-process platform.
//!
//! Every call is recorded, and listings are served from a queue so tests
//! can model the delay between triggering a run and seeing it listed.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use maskrace::core::platform::{Job, Platform, RunId, RunSummary, RunView, Status};
use maskrace::error::{PlatformError, Result};

/// A recorded platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SetSecret(String),
    Trigger(String),
    List(usize),
    View(RunId),
    Logs(RunId),
    Watch(RunId),
}

pub struct ScriptedPlatform {
    pub calls: RefCell<Vec<Call>>,
    /// Listing before the trigger, used as the baseline.
    pub before: Vec<RunSummary>,
    /// Active listings after the trigger; the last entry repeats.
    pub listings: RefCell<VecDeque<Vec<RunSummary>>>,
    /// Capture job status per view call; the last entry repeats.
    pub capture: RefCell<VecDeque<Status>>,
    pub fail_secret_after: Option<usize>,
    pub fail_trigger: bool,
    pub fail_watch: bool,
    pub fail_logs: bool,
    pub log: String,
    triggered: Cell<bool>,
    secret_writes: Cell<usize>,
}

fn run(id: RunId, status: Status) -> RunSummary {
    RunSummary { id, status }
}

fn refused(command: &str) -> maskrace::error::Error {
    PlatformError::Command {
        command: command.to_string(),
        stderr: "refused".to_string(),
    }
    .into()
}

impl ScriptedPlatform {
    /// A platform where run 7 is listed right after the trigger and the
    /// capture job is already complete.
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            before: Vec::new(),
            listings: RefCell::new(VecDeque::from([vec![run(7, Status::InProgress)]])),
            capture: RefCell::new(VecDeque::from([Status::Completed])),
            fail_secret_after: None,
            fail_trigger: false,
            fail_watch: false,
            fail_logs: false,
            log: String::new(),
            triggered: Cell::new(false),
            secret_writes: Cell::new(0),
        }
    }

    /// Serve `empty` empty listings before the run shows up.
    pub fn listed_after(self, empty: usize, id: RunId) -> Self {
        let mut queue: VecDeque<Vec<RunSummary>> = (0..empty).map(|_| Vec::new()).collect();
        queue.push_back(vec![run(id, Status::Queued)]);
        *self.listings.borrow_mut() = queue;
        self
    }

    pub fn never_listed(self) -> Self {
        *self.listings.borrow_mut() = VecDeque::from([Vec::new()]);
        self
    }

    pub fn with_listing(self, listing: Vec<RunSummary>) -> Self {
        *self.listings.borrow_mut() = VecDeque::from([listing]);
        self
    }

    pub fn with_before(mut self, before: Vec<RunSummary>) -> Self {
        self.before = before;
        self
    }

    pub fn with_capture(self, statuses: &[Status]) -> Self {
        *self.capture.borrow_mut() = statuses.iter().copied().collect();
        self
    }

    pub fn with_log(mut self, log: impl Into<String>) -> Self {
        self.log = log.into();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Values written to the secret, oldest first.
    pub fn secrets(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetSecret(v) => Some(v),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| f(c)).count()
    }

    fn next<T: Clone>(queue: &RefCell<VecDeque<T>>) -> Option<T> {
        let mut queue = queue.borrow_mut();
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

pub fn summary(id: RunId, status: Status) -> RunSummary {
    run(id, status)
}

impl Platform for ScriptedPlatform {
    fn set_secret(&self, _name: &str, value: &str) -> Result<()> {
        let writes = self.secret_writes.get();
        self.secret_writes.set(writes + 1);
        if self.fail_secret_after.is_some_and(|n| writes >= n) {
            return Err(refused("secret set"));
        }
        self.calls
            .borrow_mut()
            .push(Call::SetSecret(value.to_string()));
        Ok(())
    }

    fn trigger_run(&self, workflow: &str, _git_ref: &str, _inputs: &[(&str, String)]) -> Result<()> {
        self.calls.borrow_mut().push(Call::Trigger(workflow.to_string()));
        if self.fail_trigger {
            return Err(refused("workflow run"));
        }
        self.triggered.set(true);
        Ok(())
    }

    fn list_runs(&self, _workflow: &str, _branch: &str, statuses: &[Status]) -> Result<Vec<RunSummary>> {
        let runs = if self.triggered.get() {
            Self::next(&self.listings).unwrap_or_default()
        } else {
            self.before.clone()
        };
        self.calls.borrow_mut().push(Call::List(statuses.len()));
        Ok(runs
            .into_iter()
            .filter(|r| statuses.contains(&r.status))
            .collect())
    }

    fn view_run(&self, id: RunId) -> Result<RunView> {
        self.calls.borrow_mut().push(Call::View(id));
        let status = Self::next(&self.capture).unwrap_or(Status::Queued);
        Ok(RunView {
            status: Status::InProgress,
            conclusion: None,
            jobs: vec![Job {
                name: "capture".to_string(),
                status,
                conclusion: None,
            }],
        })
    }

    fn run_logs(&self, id: RunId) -> Result<String> {
        self.calls.borrow_mut().push(Call::Logs(id));
        if self.fail_logs {
            return Err(refused("run view --log"));
        }
        Ok(self.log.clone())
    }

    fn watch_run(&self, id: RunId) -> Result<bool> {
        self.calls.borrow_mut().push(Call::Watch(id));
        if self.fail_watch {
            return Err(refused("run watch"));
        }
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
