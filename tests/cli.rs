use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn config(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs").join(name)
}

fn reentry() -> Command {
    Command::cargo_bin("reentry-sim").expect("reentry-sim bin")
}

#[test]
fn run_without_record_flies_the_capsule() {
    reentry()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("REENTRY SIMULATION"))
        .stdout(predicate::str::contains("ground impact"));
}

#[test]
fn run_writes_csv_and_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("capsule.csv");
    let json_path = dir.path().join("capsule.json");

    reentry()
        .arg("run")
        .arg(config("ballistic_capsule.json"))
        .arg("--csv")
        .arg(&csv_path)
        .arg("--json")
        .arg(&json_path)
        .assert()
        .success();

    let csv = fs::read_to_string(&csv_path).expect("csv output");
    assert!(csv.starts_with("time_s,velocity_m_s,gamma_deg,altitude_m"));
    assert!(csv.lines().count() > 100);

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("json output")).expect("valid json");
    assert_eq!(report[0]["name"], "ballistic capsule");
    assert_eq!(report[0]["summary"]["status"], 1);
}

#[test]
fn short_horizon_reports_no_impact() {
    reentry()
        .args(["run", "--t-max", "20", "--no-thermal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no ground impact"));
}

#[test]
fn sweep_over_initial_angle() {
    reentry()
        .arg("sweep")
        .arg(config("ballistic_capsule.json"))
        .args(["--parameter", "initial_angle", "--values", "-3,-6"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PARAMETER SWEEP"))
        .stdout(predicate::str::contains("initial_angle"))
        .stdout(predicate::str::contains("-3.000"))
        .stdout(predicate::str::contains("-6.000"));
}

#[test]
fn single_negative_sweep_value_is_not_a_flag() {
    reentry()
        .arg("sweep")
        .arg(config("ballistic_capsule.json"))
        .args(["--values", "-4", "--parameter", "initial_angle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-4.000"));
}

#[test]
fn sweep_range_in_parallel_to_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("beta.csv");

    reentry()
        .arg("sweep")
        .arg(config("ballistic_capsule.json"))
        .args(["--parameter", "ballistic_coefficient", "--from", "200", "--to", "800", "--steps", "3", "--parallel"])
        .arg("--csv")
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out).expect("sweep csv");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("ballistic_coefficient,"));
    assert!(lines[2].starts_with("500,"));
}

#[test]
fn unknown_sweep_parameter_fails() {
    reentry()
        .arg("sweep")
        .arg(config("ballistic_capsule.json"))
        .args(["--parameter", "nose_radius", "--values", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown sweep parameter"));
}

#[test]
fn compare_tabulates_both_presets() {
    reentry()
        .arg("compare")
        .arg(config("ballistic_capsule.json"))
        .arg(config("lifting_body.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("ENTRY COMPARISON"))
        .stdout(predicate::str::contains("lifting body"));
}

#[test]
fn malformed_record_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{ "mass": 1000 }"#).expect("write record");

    reentry()
        .arg("run")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing field"));
}
