//! Test fixtures and constants.

/// Stamp used by every fixture marker.
pub const STAMP: &str = "1700000000";

/// Cross-job pre-rotation value for [`STAMP`].
pub const CROSS_V1: &str = "cross-job-v1-1700000000";

/// Cross-job post-rotation value for [`STAMP`].
pub const CROSS_V2: &str = "cross-job-v2-1700000000";

/// Profile with no delays and a small discovery budget.
pub const FAST_PROFILE: &str = "\
[timing]
poll_interval_secs = 0
discovery_attempts = 3
barrier_attempts = 5
grace_secs = 0
rapid_interval_ms = 0
";

/// A log line in `gh run view --log` format.
pub fn log_line(job: &str, step: &str, text: &str) -> String {
    format!("{}\t{}\t2024-01-01T00:00:00.0000000Z {}\n", job, step, text)
}

/// Log of the cross-job workflow where print showed `printed`.
pub fn cross_job_log(printed: &str) -> String {
    [
        log_line("capture", "Read secret", "captured ***"),
        log_line("capture", "Complete job", "Cleaning up orphan processes"),
        log_line("gate", "Sleep", "sleeping 30"),
        log_line("print", "Show value", &format!("value: {}", printed)),
        log_line("print", "Complete job", "Cleaning up orphan processes"),
    ]
    .concat()
}
