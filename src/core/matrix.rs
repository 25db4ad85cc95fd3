//! Job × secret-version matrix.
//!
//! The cross-job experiments reduce to four cells: the originating job and
//! the downstream job, each checked for the pre- and post-rotation value.

use std::fmt;

use super::classify::{classify, Absence, Check, Finding, Verdict};
use super::log::Partitioner;

/// Four independent verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matrix {
    pub origin_v1: Verdict,
    pub origin_v2: Verdict,
    pub downstream_v1: Verdict,
    pub downstream_v2: Verdict,
}

/// Which reading of the matrix applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpretation {
    /// V1 hidden upstream, leaked downstream, V2 hidden everywhere.
    Reproduced,
    /// Nothing leaked.
    NotReproduced,
    /// At least one cell had no log to look at.
    Inconclusive,
    /// Any other combination.
    Partial,
}

impl Interpretation {
    pub fn message(self) -> &'static str {
        match self {
            Interpretation::Reproduced => "Bug reproduced.",
            Interpretation::NotReproduced => "Not reproduced: no marker value leaked.",
            Interpretation::Inconclusive => "Inconclusive: a job log was missing.",
            Interpretation::Partial => {
                "Unexpected partial result: leak pattern does not match the masking race."
            }
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Names of the two jobs and the two marker values.
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    pub origin: &'a str,
    pub downstream: &'a str,
    pub v1: &'a str,
    pub v2: &'a str,
}

impl<'a> Layout<'a> {
    /// The four checks, in `origin_v1, origin_v2, downstream_v1, downstream_v2` order.
    ///
    /// The downstream job never held V2, so its absence reads NOT FOUND.
    pub fn checks(&self) -> [Check; 4] {
        [
            Check::new("V1", self.v1, self.origin, Absence::Masked),
            Check::new("V2", self.v2, self.origin, Absence::Masked),
            Check::new("V1", self.v1, self.downstream, Absence::Masked),
            Check::new("V2", self.v2, self.downstream, Absence::NotFound),
        ]
    }
}

impl Matrix {
    /// Classify the four cells against `log`.
    pub fn classify(log: &str, layout: &Layout<'_>, partitioner: &impl Partitioner) -> Self {
        let findings = classify(log, &layout.checks(), partitioner);
        Self::from_findings(&findings)
    }

    fn from_findings(findings: &[Finding]) -> Self {
        let verdict = |i: usize| findings[i].verdict;
        Self {
            origin_v1: verdict(0),
            origin_v2: verdict(1),
            downstream_v1: verdict(2),
            downstream_v2: verdict(3),
        }
    }

    fn cells(&self) -> [Verdict; 4] {
        [
            self.origin_v1,
            self.origin_v2,
            self.downstream_v1,
            self.downstream_v2,
        ]
    }

    pub fn interpret(&self) -> Interpretation {
        let cells = self.cells();
        if cells.iter().any(|v| v.is_skipped()) {
            return Interpretation::Inconclusive;
        }
        if !cells.iter().any(|v| v.is_leaked()) {
            return Interpretation::NotReproduced;
        }
        if self.downstream_v1.is_leaked()
            && !self.origin_v1.is_leaked()
            && !self.origin_v2.is_leaked()
            && !self.downstream_v2.is_leaked()
        {
            return Interpretation::Reproduced;
        }
        Interpretation::Partial
    }
}
