//! End-to-end experiment tests against a fake `gh`.

use crate::support::*;

#[cfg(unix)]
mod with_fake_gh {
    use super::*;

    #[test]
    fn test_cross_job_reproduces_bug() {
        let t = Test::fast();
        t.serve_log(&cross_job_log(CROSS_V1));

        let output = t
            .gh_cmd()
            .args(["--stamp", STAMP, "cross-job"])
            .output()
            .unwrap();
        assert_success(&output);
        assert_stdout_contains(&output, "run 101 discovered");
        assert_stdout_contains(&output, "Bug reproduced.");

        assert_eq!(t.secret_history(), [CROSS_V1, CROSS_V2, "placeholder"]);
        let trigger = t.trigger_args().unwrap();
        assert!(trigger.contains("maskrace-cross-job.yml --ref main -f wait_seconds=30"));
    }

    #[test]
    fn test_flags_reach_the_platform() {
        let t = Test::fast();
        t.serve_log(&cross_job_log("***"));

        let output = t
            .gh_cmd()
            .env("WAIT", "45")
            .args(["--stamp", STAMP, "--repo", "octo/demo", "--branch", "dev"])
            .args(["--secret", "OTHER", "mitigated"])
            .output()
            .unwrap();
        assert_success(&output);

        let trigger = t.trigger_args().unwrap();
        assert!(trigger.contains("maskrace-mitigated.yml --ref dev -f wait_seconds=45"));
        assert!(trigger.contains("--repo octo/demo"));
        assert_stdout_contains(&output, "Not reproduced");
    }

    #[test]
    fn test_run_not_found_still_resets_secret() {
        let t = Test::fast();
        t.switch("no_runs");

        let output = t
            .gh_cmd()
            .args(["--stamp", STAMP, "cross-job"])
            .output()
            .unwrap();
        assert_failure(&output);
        assert_stderr_contains(&output, "no active run of maskrace-cross-job.yml on main");
        assert_stderr_contains(&output, "gh run list");
        assert_eq!(t.secret_history(), [CROSS_V1, "placeholder"]);
    }

    #[test]
    fn test_trigger_failure_still_resets_secret() {
        let t = Test::fast();
        t.switch("fail_trigger");

        let output = t
            .gh_cmd()
            .args(["--stamp", STAMP, "cross-job"])
            .output()
            .unwrap();
        assert_failure(&output);
        assert_stderr_contains(&output, "failed to trigger workflow");
        assert_eq!(t.secret_history(), [CROSS_V1, "placeholder"]);
    }

    #[test]
    fn test_secret_failure_is_fatal() {
        let t = Test::fast();
        t.switch("fail_secret");

        let output = t
            .gh_cmd()
            .args(["--stamp", STAMP, "cross-job"])
            .output()
            .unwrap();
        assert_failure(&output);
        assert_stderr_contains(&output, "failed to set secret MASKRACE_SECRET");
        assert!(t.trigger_args().is_none());
    }

    #[test]
    fn test_failed_run_is_still_analyzed() {
        let t = Test::fast();
        t.switch("fail_watch");
        t.serve_log(&cross_job_log(CROSS_V1));

        let output = t
            .gh_cmd()
            .args(["--stamp", STAMP, "cross-job"])
            .output()
            .unwrap();
        assert_success(&output);
        assert_stdout_contains(&output, "analyzing anyway");
        assert_stdout_contains(&output, "Bug reproduced.");
    }

    #[test]
    fn test_save_log() {
        let t = Test::fast();
        let log = cross_job_log(CROSS_V1);
        t.serve_log(&log);

        let output = t
            .gh_cmd()
            .args(["--stamp", STAMP, "cross-job", "--save-log", "saved.log"])
            .output()
            .unwrap();
        assert_success(&output);

        let saved = std::fs::read_to_string(t.dir.path().join("saved.log")).unwrap();
        assert_eq!(saved, log);
    }

    #[test]
    fn test_unwritable_save_path_keeps_report() {
        let t = Test::fast();
        t.serve_log(&cross_job_log(CROSS_V1));

        let output = t
            .gh_cmd()
            .args(["--stamp", STAMP, "cross-job", "--save-log", "no/such/dir/run.log"])
            .output()
            .unwrap();
        assert_success(&output);
        assert_stdout_contains(&output, "Bug reproduced.");
        assert_stdout_contains(&output, "could not save log");
    }

    #[test]
    fn test_late_rotates_after_delay() {
        let t = Test::fast();
        t.serve_log(&log_line("print", "Show value", "value: late-v1-1700000000"));

        let output = t
            .gh_cmd()
            .args(["--stamp", STAMP, "--wait", "0", "late"])
            .output()
            .unwrap();
        assert_success(&output);
        assert_stdout_contains(&output, "Leak reproduced: V1 printed in cleartext by print.");
        assert_eq!(
            t.secret_history(),
            ["late-v1-1700000000", "late-v2-1700000000", "placeholder"]
        );
        let trigger = t.trigger_args().unwrap();
        assert!(trigger.contains("-f wait_seconds=0"));
    }

    #[test]
    fn test_out_of_range_wait_is_rejected() {
        let t = Test::new();
        t.write_profile(&format!("{}late_fraction = 1.0\n", FAST_PROFILE));

        let output = t
            .gh_cmd()
            .env("WAIT", u64::MAX.to_string())
            .args(["--stamp", STAMP, "late"])
            .output()
            .unwrap();
        assert_failure(&output);
        assert_stderr_contains(&output, "invalid config value wait");
        assert!(t.secret_history().is_empty());
        assert!(t.trigger_args().is_none());
    }

    #[test]
    fn test_bypass_does_not_rotate() {
        let t = Test::fast();
        t.serve_log(&log_line("encode", "literal", "***"));

        let output = t
            .gh_cmd()
            .args(["--stamp", STAMP, "bypass"])
            .output()
            .unwrap();
        assert_success(&output);
        assert_stdout_contains(&output, "literal value masked.");
        assert_eq!(t.secret_history(), ["bypass-v1-1700000000", "placeholder"]);
    }

    #[test]
    fn test_rapid_rotates_every_version() {
        let t = Test::fast();
        t.serve_log(&log_line("print", "Show value", "value: ***"));

        let output = t
            .gh_cmd()
            .args(["--stamp", STAMP, "--rapid", "2", "rapid"])
            .output()
            .unwrap();
        assert_success(&output);
        assert_eq!(
            t.secret_history(),
            [
                "rapid-v1-1700000000",
                "rapid-v2-1700000000",
                "rapid-v3-1700000000",
                "placeholder",
            ]
        );
        assert_stdout_contains(&output, "No leak: print printed none of 3 values.");
    }

    #[test]
    fn test_missing_gh() {
        let t = Test::fast();
        let empty = tempfile::TempDir::new().unwrap();

        let output = t
            .cmd()
            .env("PATH", empty.path())
            .args(["--stamp", STAMP, "cross-job"])
            .output()
            .unwrap();
        assert_failure(&output);
        assert_stderr_contains(&output, "gh CLI not found");
    }
}
