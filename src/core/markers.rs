//! Marker values written to the secret.
//!
//! Each experiment writes `"{experiment}-v{N}-{stamp}"`. The stamp keeps
//! residue from earlier runs from being mistaken for this run's signal.

/// Generator for the versioned values of one experiment invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    prefix: String,
    stamp: i64,
}

impl Markers {
    pub fn new(prefix: impl Into<String>, stamp: i64) -> Self {
        Self {
            prefix: prefix.into(),
            stamp,
        }
    }

    /// Markers stamped with the current UNIX time.
    pub fn now(prefix: impl Into<String>) -> Self {
        Self::new(prefix, chrono::Utc::now().timestamp())
    }

    pub fn stamp(&self) -> i64 {
        self.stamp
    }

    /// Value for 1-based `version`.
    pub fn version(&self, version: u32) -> String {
        format!("{}-v{}-{}", self.prefix, version, self.stamp)
    }

    /// Pre-rotation value.
    pub fn v1(&self) -> String {
        self.version(1)
    }

    /// First post-rotation value.
    pub fn v2(&self) -> String {
        self.version(2)
    }

    /// `count` post-rotation values, V2 onwards.
    pub fn rotations(&self, count: u32) -> Vec<String> {
        (2..count.saturating_add(2)).map(|v| self.version(v)).collect()
    }
}
