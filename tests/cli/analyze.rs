//! Tests for offline analysis of saved logs.

use crate::support::*;

#[test]
fn test_cross_job_leak_is_reproduced() {
    let t = Test::new();

    let output = t.analyze("cross-job", &cross_job_log(CROSS_V1));
    assert_success(&output);
    assert_stdout_contains(&output, "Bug reproduced.");
    assert_stdout_contains(&output, CROSS_V2);
}

#[test]
fn test_cross_job_masked_log_is_not_reproduced() {
    let t = Test::new();

    let output = t.analyze("cross-job", &cross_job_log("***"));
    assert_success(&output);
    assert_stdout_contains(&output, "Not reproduced");
    assert_stdout_excludes(&output, "LEAKED");
}

#[test]
fn test_missing_print_job_is_inconclusive() {
    let t = Test::new();
    let log = log_line("capture", "Read secret", "captured ***");

    let output = t.analyze("cross-job", &log);
    assert_success(&output);
    assert_stdout_contains(&output, "Inconclusive");
    assert_stdout_contains(&output, "SKIPPED (no log)");
}

#[test]
fn test_empty_log_is_inconclusive() {
    let t = Test::new();

    let output = t.analyze("cross-job", "");
    assert_success(&output);
    assert_stdout_contains(&output, "Inconclusive");
}

#[test]
fn test_late_statement() {
    let t = Test::new();
    let log = log_line("print", "Show value", "value: late-v1-1700000000");

    let output = t.analyze("late", &log);
    assert_success(&output);
    assert_stdout_contains(&output, "Leak reproduced: V1 printed in cleartext by print.");
}

#[test]
fn test_rapid_lists_leaked_versions() {
    let t = Test::new();
    let log = log_line("print", "Show value", "value: rapid-v3-1700000000");

    let output = t
        .cmd()
        .args(["--rapid", "4", "analyze", "rapid", "--stamp", STAMP, "--log"])
        .arg(t.write_file("rapid.log", &log))
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "Leaked in print: V3.");
}

#[test]
fn test_bypass_reports_encoded_leak() {
    let t = Test::new();
    let hex = maskrace::core::transform::find("hex")
        .unwrap()
        .apply("bypass-v1-1700000000");
    let log = [
        log_line("encode", "literal", "***"),
        log_line("encode", "hex", &hex),
    ]
    .concat();

    let output = t.analyze("bypass", &log);
    assert_success(&output);
    assert_stdout_contains(&output, "literal value masked.");
    assert_stdout_excludes(&output, " 0 of ");
}

#[test]
fn test_stamp_from_environment() {
    let t = Test::new();
    let path = t.write_file("run.log", &cross_job_log(CROSS_V1));

    let output = t
        .cmd()
        .env("STAMP", STAMP)
        .args(["analyze", "cross-job", "--log"])
        .arg(path)
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "Bug reproduced.");
}

#[test]
fn test_analyze_requires_stamp() {
    let t = Test::new();
    let path = t.write_file("run.log", &cross_job_log(CROSS_V1));

    let output = t
        .cmd()
        .args(["analyze", "cross-job", "--log"])
        .arg(path)
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "stamp");
}

#[test]
fn test_analyze_missing_log() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["analyze", "cross-job", "--stamp", STAMP, "--log", "nope.log"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "log file not found");
}
