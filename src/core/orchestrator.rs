//! Rotation orchestration.
//!
//! One experiment is a straight line of remote calls:
//!
//! 1. Write the initial value through the lease
//! 2. Trigger the workflow and discover its run
//! 3. Wait for the synchronization signal
//! 4. Write each rotation value
//! 5. Wait for the run to finish and fetch its log
//!
//! Failures in 1–4 abort the experiment. Failures in 5 are logged and
//! swallowed so the report can still be printed from partial data.

use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::config::Timing;
use super::lease::SecretLease;
use super::platform::{Platform, RunId, Status};
use super::poll::Poll;
use crate::error::{Result, SetupError};

/// When to perform the rotation relative to the running job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncSignal {
    /// Wall-clock sleep after discovery.
    Delay(Duration),
    /// The named job reached `completed`.
    JobCompleted(String),
    /// The named job reached `completed`, then a fixed grace delay.
    JobCompletedThenGrace { job: String, grace: Duration },
}

/// Everything needed to run one experiment against the platform.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub workflow: String,
    pub inputs: Vec<(&'static str, String)>,
    /// Value written before triggering.
    pub initial: String,
    /// `None` skips synchronization and rotation entirely.
    pub signal: Option<SyncSignal>,
    /// Values written after the signal, in order.
    pub rotations: Vec<String>,
    /// Pause between consecutive rotations.
    pub rotation_interval: Duration,
}

/// What an experiment observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub run: RunId,
    /// `None` when the watch call itself failed.
    pub succeeded: Option<bool>,
    /// Empty when the log could not be fetched.
    pub log: String,
}

/// Progress notifications emitted by [`Orchestrator::execute`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Triggered,
    Discovered(RunId),
    Synchronized,
    Rotated { version: usize },
    Finished(Option<bool>),
    LogFetched { bytes: usize },
}

/// Drives a [`Platform`] through an experiment.
pub struct Orchestrator<'p, P: Platform + ?Sized> {
    platform: &'p P,
    branch: String,
    timing: Timing,
    observer: Option<&'p dyn Fn(&Event)>,
}

impl<'p, P: Platform + ?Sized> Orchestrator<'p, P> {
    pub fn new(platform: &'p P, branch: impl Into<String>, timing: Timing) -> Self {
        Self {
            platform,
            branch: branch.into(),
            timing,
            observer: None,
        }
    }

    /// Call `observer` at every step of [`execute`](Self::execute).
    pub fn with_observer(mut self, observer: &'p dyn Fn(&Event)) -> Self {
        self.observer = Some(observer);
        self
    }

    fn notify(&self, event: Event) {
        if let Some(observer) = self.observer {
            observer(&event);
        }
    }

    /// Run `recipe`, writing the secret only through `lease`.
    pub fn execute(&self, lease: &mut SecretLease<'_, P>, recipe: &Recipe) -> Result<Outcome> {
        let baseline = self.baseline(&recipe.workflow);

        lease.set(&recipe.initial)?;
        self.trigger(&recipe.workflow, &recipe.inputs)?;
        self.notify(Event::Triggered);
        let run = self.discover(&recipe.workflow, baseline)?;
        self.notify(Event::Discovered(run));

        if let Some(signal) = &recipe.signal {
            self.synchronize(run, signal)?;
            self.notify(Event::Synchronized);
            for (i, value) in recipe.rotations.iter().enumerate() {
                if i > 0 {
                    thread::sleep(recipe.rotation_interval);
                }
                lease.set(value)?;
                self.notify(Event::Rotated {
                    version: lease.history().len(),
                });
            }
        }

        let succeeded = self.await_completion(run);
        self.notify(Event::Finished(succeeded));
        let log = self.fetch_logs(run);
        self.notify(Event::LogFetched { bytes: log.len() });
        Ok(Outcome {
            run,
            succeeded,
            log,
        })
    }

    /// Newest existing run of `workflow`, recorded before triggering.
    pub fn baseline(&self, workflow: &str) -> Option<RunId> {
        match self.platform.list_runs(workflow, &self.branch, Status::ANY) {
            Ok(runs) => {
                let newest = runs.iter().map(|r| r.id).max();
                debug!(?newest, "baseline run");
                newest
            }
            Err(e) => {
                warn!(error = %e, "could not read baseline runs");
                None
            }
        }
    }

    /// Dispatch `workflow` on the configured branch.
    pub fn trigger(&self, workflow: &str, inputs: &[(&str, String)]) -> Result<()> {
        info!(workflow, branch = %self.branch, "triggering workflow");
        self.platform
            .trigger_run(workflow, &self.branch, inputs)
            .map_err(|e| {
                SetupError::Trigger {
                    workflow: workflow.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    /// Poll the listing until a queued or in-progress run newer than
    /// `baseline` shows up, returning the newest one.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::RunNotFound` once the attempt budget is spent.
    pub fn discover(&self, workflow: &str, baseline: Option<RunId>) -> Result<RunId> {
        let poll = Poll::bounded(self.timing.poll_interval(), self.timing.discovery_attempts);

        poll.until(|attempt| {
            match self.platform.list_runs(workflow, &self.branch, Status::ACTIVE) {
                Ok(runs) => {
                    let newest = runs
                        .iter()
                        .map(|r| r.id)
                        .filter(|id| baseline.map_or(true, |b| *id > b))
                        .max();
                    if newest.is_none() {
                        debug!(attempt, "run not listed yet");
                    }
                    newest
                }
                Err(e) => {
                    warn!(attempt, error = %e, "listing runs failed");
                    None
                }
            }
        })
        .map(|run| {
            info!(run, "discovered run");
            run
        })
        .map_err(|exhausted| {
            SetupError::RunNotFound {
                workflow: workflow.to_string(),
                branch: self.branch.clone(),
                attempts: exhausted.attempts,
            }
            .into()
        })
    }

    /// Block until `job` of `run` is `completed`.
    pub fn await_job(&self, run: RunId, job: &str) -> Result<()> {
        let poll = Poll::with_limit(self.timing.poll_interval(), self.timing.barrier_attempts);
        info!(run, job, "waiting for job to complete");

        poll.until(|attempt| match self.platform.view_run(run) {
            Ok(view) => {
                let status = view.job(job).map(|j| j.status);
                debug!(attempt, job, status = ?status, "job status");
                status.filter(|s| s.is_completed()).map(|_| ())
            }
            Err(e) => {
                warn!(attempt, error = %e, "viewing run failed");
                None
            }
        })
        .map_err(|exhausted| {
            SetupError::BarrierTimeout {
                run,
                job: job.to_string(),
                attempts: exhausted.attempts,
            }
            .into()
        })
    }

    /// Wait for `signal`.
    pub fn synchronize(&self, run: RunId, signal: &SyncSignal) -> Result<()> {
        match signal {
            SyncSignal::Delay(delay) => {
                info!(delay_ms = delay.as_millis() as u64, "sleeping before rotation");
                thread::sleep(*delay);
            }
            SyncSignal::JobCompleted(job) => self.await_job(run, job)?,
            SyncSignal::JobCompletedThenGrace { job, grace } => {
                self.await_job(run, job)?;
                debug!(grace_ms = grace.as_millis() as u64, "grace delay");
                thread::sleep(*grace);
            }
        }
        Ok(())
    }

    /// Block until the run is terminal. Its outcome is informational only.
    pub fn await_completion(&self, run: RunId) -> Option<bool> {
        info!(run, "waiting for run to finish");
        match self.platform.watch_run(run) {
            Ok(succeeded) => {
                if !succeeded {
                    info!(run, "run did not succeed, analyzing anyway");
                }
                Some(succeeded)
            }
            Err(e) => {
                warn!(run, error = %e, "watching run failed");
                None
            }
        }
    }

    /// Fetch the run log once. An unreadable log reads as empty.
    pub fn fetch_logs(&self, run: RunId) -> String {
        match self.platform.run_logs(run) {
            Ok(log) => {
                debug!(run, bytes = log.len(), "fetched log");
                log
            }
            Err(e) => {
                warn!(run, error = %e, "fetching log failed");
                String::new()
            }
        }
    }
}
