//! End-to-end CLI integration tests.

use assert_cmd::Command;
use predicates::prelude::*;

const PI_50: &str = "3.14159265358979323846264338327950288419716939937510";

fn picalc() -> Command {
    Command::cargo_bin("picalc").expect("binary not found")
}

#[test]
fn help_flag() {
    picalc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pi"));
}

#[test]
fn version_flag() {
    picalc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("picalc"));
}

#[test]
fn quiet_prints_only_digits() {
    picalc()
        .args(["-n", "50", "-q"])
        .assert()
        .success()
        .stdout(format!("{PI_50}\n"));
}

#[test]
fn single_digit() {
    picalc()
        .args(["-n", "1", "-q"])
        .assert()
        .success()
        .stdout("3.1\n");
}

#[test]
fn pooled_run_matches() {
    picalc()
        .args(["-n", "500", "-q", "--workers", "4", "--pool-threshold", "2"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(PI_50));
}

#[test]
fn negative_workers_accepted() {
    picalc()
        .args(["-n", "50", "-q", "--workers", "-1", "--pool-threshold", "1"])
        .assert()
        .success()
        .stdout(format!("{PI_50}\n"));
}

#[test]
fn normal_mode_shows_details() {
    picalc()
        .args(["-n", "50", "-d", "--no-progress", "-w", "3"])
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("Chudnovsky"))
        .stdout(predicate::str::contains("Series terms: 4"))
        .stdout(predicate::str::contains("Workers: 3"))
        .stdout(predicate::str::contains(PI_50));
}

#[test]
fn env_var_digits() {
    picalc()
        .env("PICALC_DIGITS", "5")
        .arg("-q")
        .assert()
        .success()
        .stdout("3.14159\n");
}

#[test]
fn json_report() {
    let output = picalc().args(["-n", "20", "--json"]).output().unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["value"], "3.14159265358979323846");
    assert_eq!(report["digits"], 20);
    assert_eq!(report["terms"], 2);
    assert_eq!(report["algorithm"], "Chudnovsky");
}

#[test]
fn output_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("pi.txt");
    picalc()
        .args(["-n", "50", "-q", "-o", path.to_str().unwrap()])
        .assert()
        .success();
    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.trim_end(), PI_50);
}

#[test]
fn zero_digits_is_config_error() {
    picalc()
        .args(["-n", "0", "-q"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn digits_above_ceiling_is_config_error() {
    picalc()
        .args(["-n", "101", "--max-digits", "100", "-q"])
        .assert()
        .code(4);
}

#[test]
fn invalid_timeout_fails() {
    picalc()
        .args(["-n", "10", "--timeout", "whenever", "-q"])
        .assert()
        .code(1);
}

#[test]
fn generous_timeout_succeeds() {
    picalc()
        .args(["-n", "50", "--timeout", "5m", "-q"])
        .assert()
        .success()
        .stdout(format!("{PI_50}\n"));
}

#[test]
fn shell_completion_bash() {
    picalc()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("picalc"));
}

#[test]
fn shell_completion_zsh() {
    picalc()
        .args(["--completion", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("picalc"));
}

#[test]
fn verbose_logs_to_stderr_only() {
    picalc()
        .args(["-n", "50", "-v", "--no-progress"])
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout(predicate::str::contains(PI_50))
        .stdout(predicate::str::contains("Computing pi").not())
        .stderr(predicate::str::contains("Computing pi"));
}
