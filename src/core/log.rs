//! Run log partitioning.
//!
//! `gh run view --log` prints every line as `{job}\t{step}\t{time} {text}`.
//! The classifier only needs "the lines of job X", so that format knowledge
//! stays behind [`Partitioner`].

/// Lines of a run log that belong to one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<'a> {
    lines: Vec<&'a str>,
}

impl<'a> Partition<'a> {
    pub fn new(lines: Vec<&'a str>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    /// Whether `needle` occurs verbatim inside any line.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

/// Splits a run log into per-job partitions.
pub trait Partitioner {
    /// The lines of `job`, or `None` when the job left no lines at all.
    fn partition<'a>(&self, log: &'a str, job: &str) -> Option<Partition<'a>>;
}

/// Selects lines that start with the job name.
///
/// Order is preserved and the result only depends on the matching lines,
/// not on how they interleave with other jobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixPartitioner;

impl Partitioner for PrefixPartitioner {
    fn partition<'a>(&self, log: &'a str, job: &str) -> Option<Partition<'a>> {
        let lines: Vec<&str> = log.lines().filter(|line| line.starts_with(job)).collect();
        if lines.is_empty() {
            return None;
        }
        Some(Partition::new(lines))
    }
}
