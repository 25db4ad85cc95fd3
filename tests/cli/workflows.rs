//! Tests for workflow installation.

use crate::support::*;

#[test]
fn test_installs_bundled_workflows() {
    let t = Test::new();

    let output = t.workflows(&[]);
    assert_success(&output);

    let dir = t.dir.path().join(".github/workflows");
    for name in [
        "maskrace-cross-job.yml",
        "maskrace-mitigated.yml",
        "maskrace-bypass.yml",
    ] {
        assert!(dir.join(name).exists(), "{} not written", name);
    }
    assert_stdout_contains(&output, "wrote");
    assert_stderr_contains(&output, "gh secret set MASKRACE_SECRET");
}

#[test]
fn test_refuses_to_overwrite() {
    let t = Test::new();
    assert_success(&t.workflows(&[]));

    let output = t.workflows(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
    assert_stderr_contains(&output, "--force");
}

#[test]
fn test_force_overwrites() {
    let t = Test::new();
    assert_success(&t.workflows(&[]));
    let path = t.dir.path().join(".github/workflows/maskrace-cross-job.yml");
    std::fs::write(&path, "stale").unwrap();

    assert_success(&t.workflows(&["--force"]));
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("wait_seconds"));
}

#[test]
fn test_custom_secret_name_is_rendered() {
    let t = Test::new();

    let output = t.workflows(&["--secret", "OTHER_SECRET", "--dir", "wf"]);
    assert_success(&output);

    let contents =
        std::fs::read_to_string(t.dir.path().join("wf/maskrace-mitigated.yml")).unwrap();
    assert!(contents.contains("secrets.OTHER_SECRET"));
    assert!(!contents.contains("secrets.MASKRACE_SECRET"));
}
