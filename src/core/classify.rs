//! Leak classification.
//!
//! A closed set of expected strings checked by exact substring membership
//! inside one job's lines. No inference on unknown content.

use std::fmt;
use tracing::debug;

use super::log::Partitioner;
use super::transform;

/// Why a check produced no verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The expected string is empty, so every log would "contain" it.
    EmptyTarget,
    /// The job left no lines in the log.
    MissingPartition,
}

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Target printed in cleartext.
    Leaked,
    /// Target absent where the job had it in hand.
    Masked,
    /// Target absent where the job never had it.
    NotFound,
    Skipped(SkipReason),
}

impl Verdict {
    pub fn is_leaked(self) -> bool {
        self == Verdict::Leaked
    }

    pub fn is_skipped(self) -> bool {
        matches!(self, Verdict::Skipped(_))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Leaked => "LEAKED",
            Verdict::Masked => "MASKED",
            Verdict::NotFound => "NOT FOUND",
            Verdict::Skipped(SkipReason::EmptyTarget) => "SKIPPED (empty)",
            Verdict::Skipped(SkipReason::MissingPartition) => "SKIPPED (no log)",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an absent target is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Absence {
    Masked,
    NotFound,
}

impl From<Absence> for Verdict {
    fn from(absence: Absence) -> Self {
        match absence {
            Absence::Masked => Verdict::Masked,
            Absence::NotFound => Verdict::NotFound,
        }
    }
}

/// One (label, target, partition) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub label: String,
    pub target: String,
    pub job: String,
    pub absence: Absence,
}

impl Check {
    pub fn new(
        label: impl Into<String>,
        target: impl Into<String>,
        job: impl Into<String>,
        absence: Absence,
    ) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
            job: job.into(),
            absence,
        }
    }
}

/// A check together with its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub check: Check,
    pub verdict: Verdict,
}

/// Checks for every transform of `plaintext` inside `job`.
pub fn transform_checks(plaintext: &str, job: &str) -> Vec<Check> {
    transform::expected(plaintext)
        .into_iter()
        .map(|(label, target)| Check::new(label, target, job, Absence::Masked))
        .collect()
}

/// Classify every check against one fetched log.
pub fn classify(log: &str, checks: &[Check], partitioner: &impl Partitioner) -> Vec<Finding> {
    checks
        .iter()
        .map(|check| {
            let verdict = if check.target.is_empty() {
                Verdict::Skipped(SkipReason::EmptyTarget)
            } else {
                match partitioner.partition(log, &check.job) {
                    None => Verdict::Skipped(SkipReason::MissingPartition),
                    Some(lines) if lines.contains(&check.target) => Verdict::Leaked,
                    Some(_) => check.absence.into(),
                }
            };
            debug!(label = %check.label, job = %check.job, %verdict, "classified");
            Finding {
                check: check.clone(),
                verdict,
            }
        })
        .collect()
}

/// Tally of a set of findings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub leaked: usize,
    pub hidden: usize,
    pub skipped: usize,
}

impl Tally {
    pub fn of(findings: &[Finding]) -> Self {
        findings.iter().fold(Self::default(), |mut tally, f| {
            match f.verdict {
                Verdict::Leaked => tally.leaked += 1,
                Verdict::Masked | Verdict::NotFound => tally.hidden += 1,
                Verdict::Skipped(_) => tally.skipped += 1,
            }
            tally
        })
    }
}
