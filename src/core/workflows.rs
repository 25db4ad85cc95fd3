//! Bundled workflow definitions.
//!
//! The YAML under `workflows/` is compiled into the binary and written into
//! the target repository by `maskrace workflows`. Every definition refers
//! to the secret as `MASKRACE_SECRET`; installing substitutes the name in
//! use.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::constants::DEFAULT_SECRET;
use crate::error::{ConfigError, Result};

/// Vulnerable two-stage workflow: capture → gate → print.
pub const CROSS_JOB: &str = "maskrace-cross-job.yml";

/// Same graph, with the print job referencing the secret.
pub const MITIGATED: &str = "maskrace-mitigated.yml";

/// Single job printing encodings of the secret.
pub const BYPASS: &str = "maskrace-bypass.yml";

/// Every bundled definition as `(file name, contents)`.
pub const BUNDLED: &[(&str, &str)] = &[
    (CROSS_JOB, include_str!("../../workflows/maskrace-cross-job.yml")),
    (MITIGATED, include_str!("../../workflows/maskrace-mitigated.yml")),
    (BYPASS, include_str!("../../workflows/maskrace-bypass.yml")),
];

/// Contents of `template` with the secret renamed to `secret`.
pub fn render(template: &str, secret: &str) -> String {
    template.replace(
        &format!("secrets.{}", DEFAULT_SECRET),
        &format!("secrets.{}", secret),
    )
}

/// Write every bundled workflow into `dir`.
///
/// # Errors
///
/// Returns `ConfigError::WorkflowExists` if a file is already present and
/// `force` is false. Nothing is written in that case.
pub fn install(dir: &Path, secret: &str, force: bool) -> Result<Vec<PathBuf>> {
    let targets: Vec<PathBuf> = BUNDLED.iter().map(|(name, _)| dir.join(name)).collect();

    if !force {
        if let Some(existing) = targets.iter().find(|p| p.exists()) {
            return Err(ConfigError::WorkflowExists(existing.display().to_string()).into());
        }
    }

    fs::create_dir_all(dir)?;
    for ((_, template), path) in BUNDLED.iter().zip(&targets) {
        debug!(path = %path.display(), "writing workflow");
        fs::write(path, render(template, secret))?;
    }
    Ok(targets)
}
