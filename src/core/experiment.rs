//! Experiment variants.
//!
//! Each variant fixes a workflow, a marker prefix, a synchronization signal
//! and the checks its report is built from. Running against the platform
//! and re-analyzing a saved log share [`Experiment::analyze`].

use std::fmt;

use super::classify::{classify, transform_checks, Absence, Check, Finding, Tally, Verdict};
use super::config::Timing;
use super::constants::{CAPTURE_JOB, ENCODE_JOB, PRINT_JOB, WAIT_INPUT};
use super::log::Partitioner;
use super::markers::Markers;
use super::matrix::{Interpretation, Layout, Matrix};
use super::orchestrator::{Recipe, SyncSignal};
use super::workflows;
use crate::error::Result;

/// The experiment variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Experiment {
    /// Rotate once the capture job completes, plus a grace delay.
    CrossJob,
    /// Same recipe against a downstream job that references the secret.
    Mitigated,
    /// Rotate after a fixed fraction of the wait window.
    Late,
    /// Fire a burst of rotations after the capture job completes.
    Rapid,
    /// Look for encoded forms of the secret in a single job.
    Bypass,
}

/// Inputs shared by every variant.
#[derive(Debug, Clone)]
pub struct Params {
    /// Wait window handed to the workflow, in seconds.
    pub wait_secs: u64,
    /// Number of rotations in the rapid variant.
    pub rapid: u32,
    pub timing: Timing,
}

impl Experiment {
    pub fn name(self) -> &'static str {
        match self {
            Experiment::CrossJob => "cross-job",
            Experiment::Mitigated => "mitigated",
            Experiment::Late => "late",
            Experiment::Rapid => "rapid",
            Experiment::Bypass => "bypass",
        }
    }

    /// Workflow file dispatched by this variant.
    pub fn workflow(self) -> &'static str {
        match self {
            Experiment::CrossJob | Experiment::Late | Experiment::Rapid => workflows::CROSS_JOB,
            Experiment::Mitigated => workflows::MITIGATED,
            Experiment::Bypass => workflows::BYPASS,
        }
    }

    pub fn markers(self, stamp: i64) -> Markers {
        Markers::new(self.name(), stamp)
    }

    /// Build the platform recipe.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` when the late delay is out of range.
    pub fn recipe(self, markers: &Markers, params: &Params) -> Result<Recipe> {
        let timing = &params.timing;
        let (signal, rotations) = match self {
            Experiment::CrossJob | Experiment::Mitigated => (
                Some(SyncSignal::JobCompletedThenGrace {
                    job: CAPTURE_JOB.to_string(),
                    grace: timing.grace(),
                }),
                vec![markers.v2()],
            ),
            Experiment::Late => (
                Some(SyncSignal::Delay(timing.late_delay(params.wait_secs)?)),
                vec![markers.v2()],
            ),
            Experiment::Rapid => (
                Some(SyncSignal::JobCompleted(CAPTURE_JOB.to_string())),
                markers.rotations(params.rapid),
            ),
            Experiment::Bypass => (None, Vec::new()),
        };

        Ok(Recipe {
            workflow: self.workflow().to_string(),
            inputs: vec![(WAIT_INPUT, params.wait_secs.to_string())],
            initial: markers.v1(),
            signal,
            rotations,
            rotation_interval: timing.rapid_interval(),
        })
    }

    /// Classify a fetched log.
    pub fn analyze(
        self,
        log: &str,
        markers: &Markers,
        params: &Params,
        partitioner: &impl Partitioner,
    ) -> Report {
        let (v1, v2) = (markers.v1(), markers.v2());
        let layout = Layout {
            origin: CAPTURE_JOB,
            downstream: PRINT_JOB,
            v1: &v1,
            v2: &v2,
        };

        match self {
            Experiment::CrossJob | Experiment::Mitigated => Report::Matrix {
                v1: v1.clone(),
                v2: v2.clone(),
                matrix: Matrix::classify(log, &layout, partitioner),
            },
            Experiment::Late => {
                let matrix = Matrix::classify(log, &layout, partitioner);
                Report::Statement {
                    job: PRINT_JOB,
                    v1: matrix.downstream_v1,
                    v2: matrix.downstream_v2,
                }
            }
            Experiment::Rapid => {
                let checks: Vec<Check> = (1..=params.rapid.saturating_add(1))
                    .map(|version| {
                        let absence = if version == 1 {
                            Absence::Masked
                        } else {
                            Absence::NotFound
                        };
                        Check::new(
                            format!("V{}", version),
                            markers.version(version),
                            PRINT_JOB,
                            absence,
                        )
                    })
                    .collect();
                Report::Versions {
                    job: PRINT_JOB,
                    findings: classify(log, &checks, partitioner),
                }
            }
            Experiment::Bypass => {
                let literal = Check::new("literal", v1.as_str(), ENCODE_JOB, Absence::Masked);
                let mut findings = classify(log, &[literal], partitioner);
                let literal = findings.remove(0);
                Report::Transforms {
                    job: ENCODE_JOB,
                    literal,
                    findings: classify(log, &transform_checks(&v1, ENCODE_JOB), partitioner),
                }
            }
        }
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classified result of one experiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// 2×2 job × version matrix.
    Matrix {
        v1: String,
        v2: String,
        matrix: Matrix,
    },
    /// Pass/fail statement over the downstream job.
    Statement {
        job: &'static str,
        v1: Verdict,
        v2: Verdict,
    },
    /// One verdict per rotated version.
    Versions {
        job: &'static str,
        findings: Vec<Finding>,
    },
    /// One verdict per transform of V1.
    Transforms {
        job: &'static str,
        literal: Finding,
        findings: Vec<Finding>,
    },
}

impl Report {
    /// Whether the report shows a value leaking.
    pub fn leaked(&self) -> bool {
        match self {
            Report::Matrix { matrix, .. } => matrix.interpret() == Interpretation::Reproduced,
            Report::Statement { v1, .. } => v1.is_leaked(),
            Report::Versions { findings, .. } => findings.iter().any(|f| f.verdict.is_leaked()),
            Report::Transforms {
                literal, findings, ..
            } => literal.verdict.is_leaked() || Tally::of(findings).leaked > 0,
        }
    }

    /// One-line closing summary.
    pub fn summary(&self) -> String {
        match self {
            Report::Matrix { matrix, .. } => matrix.interpret().message().to_string(),
            Report::Statement { job, v1, v2 } => match (v1, v2) {
                (Verdict::Skipped(_), _) => format!("Inconclusive: no {} job log.", job),
                (Verdict::Leaked, _) => format!("Leak reproduced: V1 printed in cleartext by {}.", job),
                (_, Verdict::Leaked) => format!("No V1 leak; {} printed V2 instead.", job),
                _ => format!("No leak: {} did not print V1.", job),
            },
            Report::Versions { job, findings } => {
                let leaked: Vec<&str> = findings
                    .iter()
                    .filter(|f| f.verdict.is_leaked())
                    .map(|f| f.check.label.as_str())
                    .collect();
                if findings.iter().all(|f| f.verdict.is_skipped()) {
                    format!("Inconclusive: no {} job log.", job)
                } else if leaked.is_empty() {
                    format!("No leak: {} printed none of {} values.", job, findings.len())
                } else {
                    format!("Leaked in {}: {}.", job, leaked.join(", "))
                }
            }
            Report::Transforms {
                literal, findings, ..
            } => {
                let tally = Tally::of(findings);
                format!(
                    "{} of {} transforms leaked ({} skipped); literal value {}.",
                    tally.leaked,
                    findings.len(),
                    tally.skipped,
                    literal.verdict.as_str().to_lowercase()
                )
            }
        }
    }
}
