//! Test support utilities for maskrace integration tests.
//!
//! Provides isolated test environments, a fake `gh` binary and a scripted
//! in-process platform.

#![allow(dead_code)]

pub mod fixtures;
pub mod platform;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use tempfile::TempDir;

/// Test environment with an isolated working directory.
///
/// No process-global state is mutated: child processes use `.current_dir()`
/// so tests can safely run in parallel.
pub struct Test {
    /// Working directory of the maskrace process
    pub dir: TempDir,
    /// State directory of the fake `gh`
    pub state: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let state = TempDir::new().expect("failed to create state dir");
        Self { dir, state }
    }

    /// Create a test environment with a zero-delay experiment profile.
    pub fn fast() -> Self {
        let t = Self::new();
        t.write_profile(FAST_PROFILE);
        t
    }

    /// Write `.maskrace.toml` into the working directory.
    pub fn write_profile(&self, contents: &str) {
        std::fs::write(self.dir.path().join(".maskrace.toml"), contents)
            .expect("failed to write profile");
    }

    /// Write a file into the working directory and return its path.
    pub fn write_file(&self, name: &str, contents: &str) -> std::path::PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("failed to write file");
        path
    }
}
