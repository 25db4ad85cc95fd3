//! Offline analysis command.
//!
//! Re-classify a log saved with `--save-log`. Needs the stamp the
//! experiment ran with, since the marker values are derived from it.

use std::path::Path;

use crate::cli::{output, report, Settings};
use crate::core::experiment::Experiment;
use crate::core::log::PrefixPartitioner;
use crate::error::{ConfigError, Result};

/// Classify the log at `path` for `kind`.
pub fn execute(kind: Experiment, path: &Path, settings: &Settings) -> Result<()> {
    let stamp = settings.stamp.ok_or(ConfigError::Invalid {
        field: "stamp",
        reason: "analyze needs the --stamp (or STAMP) the experiment ran with".to_string(),
    })?;

    if !path.exists() {
        return Err(ConfigError::LogNotFound(path.display().to_string()).into());
    }
    let log = std::fs::read_to_string(path)?;

    let markers = kind.markers(stamp);
    output::section(&format!("Analysis: {}", kind));
    output::kv("log", path.display());
    output::kv("V1", markers.v1());

    let report = kind.analyze(&log, &markers, &settings.params, &PrefixPartitioner);
    report::print(&report);
    Ok(())
}
