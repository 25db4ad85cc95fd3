//! Constants used throughout maskrace.
//!
//! Centralizes workflow names, job names and default experiment timing.

/// Optional experiment profile in the current directory.
pub const CONFIG_FILE: &str = ".maskrace.toml";

/// Environment variable overriding the `gh` binary location.
pub const GH_ENV: &str = "MASKRACE_GH";

/// Default name of the rotated repository secret.
pub const DEFAULT_SECRET: &str = "MASKRACE_SECRET";

/// Value the secret is reset to when an experiment ends.
pub const DEFAULT_PLACEHOLDER: &str = "placeholder";

/// Directory the bundled workflows are installed into.
pub const WORKFLOW_DIR: &str = ".github/workflows";

/// Workflow input carrying the wait window in seconds.
pub const WAIT_INPUT: &str = "wait_seconds";

/// Job that reads the secret in the two-stage workflows.
pub const CAPTURE_JOB: &str = "capture";

/// Job that prints the value captured upstream.
pub const PRINT_JOB: &str = "print";

/// Job that prints transforms of the secret in the bypass workflow.
pub const ENCODE_JOB: &str = "encode";

/// Seconds between polls of the platform.
pub const POLL_INTERVAL_SECS: u64 = 5;

/// Listing attempts before a triggered run is declared missing.
pub const DISCOVERY_ATTEMPTS: u32 = 12;

/// Extra delay after the capture barrier before rotating.
pub const GRACE_SECS: u64 = 3;

/// Fraction of the wait window after which the late variant rotates.
pub const LATE_FRACTION: f64 = 1.0 / 3.0;

/// Pause between consecutive rotations in the rapid variant.
pub const RAPID_INTERVAL_MS: u64 = 1000;
