//! Experiment commands.
//!
//! Run one variant end to end against the platform, then print its report.
//! The secret is reset when the lease goes out of scope, before the report
//! is printed and on every error path.

use std::fs;
use tracing::warn;

use crate::cli::{output, report, RunArgs, Settings};
use crate::core::experiment::Experiment;
use crate::core::lease::SecretLease;
use crate::core::log::PrefixPartitioner;
use crate::core::markers::Markers;
use crate::core::orchestrator::{Event, Orchestrator, Outcome};
use crate::core::platform::{GhCli, Platform};
use crate::error::Result;

/// Execute one experiment variant.
pub fn execute(kind: Experiment, args: &RunArgs, settings: &Settings) -> Result<()> {
    let platform = GhCli::locate(settings.repo.clone())?;
    let markers = match settings.stamp {
        Some(stamp) => kind.markers(stamp),
        None => Markers::now(kind.name()),
    };

    output::section(&format!("Experiment: {}", kind));
    output::kv("platform", platform.name());
    output::kv("workflow", kind.workflow());
    output::kv("branch", &settings.branch);
    if let Some(repo) = &settings.repo {
        output::kv("repo", repo);
    }
    output::kv("secret", &settings.secret);
    output::kv("stamp", markers.stamp());
    output::kv("V1", markers.v1());
    println!();

    let outcome = run(&platform, kind, &markers, settings)?;
    output::dimmed(&format!(
        "secret reset to {:?} (best effort)",
        settings.config.secret.placeholder
    ));

    let report = kind.analyze(&outcome.log, &markers, &settings.params, &PrefixPartitioner);
    report::print(&report);

    // A failed save is reported, never fatal.
    if let Some(path) = &args.save_log {
        match fs::write(path, &outcome.log) {
            Ok(()) => output::dimmed(&format!("log saved to {}", path.display())),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "saving log failed");
                output::warn(&format!("could not save log to {}: {}", path.display(), e));
            }
        }
    }
    Ok(())
}

/// Drive the platform while holding the secret lease.
pub fn run<P: Platform + ?Sized>(
    platform: &P,
    kind: Experiment,
    markers: &Markers,
    settings: &Settings,
) -> Result<Outcome> {
    let recipe = kind.recipe(markers, &settings.params)?;
    let observer = |event: &Event| progress(event);
    let orchestrator = Orchestrator::new(platform, &settings.branch, settings.params.timing.clone())
        .with_observer(&observer);

    let mut lease = SecretLease::new(
        platform,
        &settings.secret,
        &settings.config.secret.placeholder,
    );
    orchestrator.execute(&mut lease, &recipe)
}

fn progress(event: &Event) {
    match event {
        Event::Triggered => output::success("workflow triggered"),
        Event::Discovered(run) => output::success(&format!("run {} discovered", run)),
        Event::Synchronized => output::success("synchronization point reached"),
        Event::Rotated { version } => output::success(&format!("secret rotated to V{}", version)),
        Event::Finished(Some(true)) => output::success("run completed"),
        Event::Finished(Some(false)) => output::warn("run failed or was cancelled, analyzing anyway"),
        Event::Finished(None) => output::warn("could not watch run, analyzing anyway"),
        Event::LogFetched { bytes: 0 } => output::warn("run log is empty or unavailable"),
        Event::LogFetched { bytes } => output::success(&format!("fetched {} bytes of log", bytes)),
    }
}
