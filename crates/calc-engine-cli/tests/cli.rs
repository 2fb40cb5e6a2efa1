use assert_cmd::Command;
use predicates::prelude::*;

/// Wednesday, 18 February 2026, 14:30 UTC.
const NOW: &str = "2026-02-18T14:30:00Z";

fn calc() -> Command {
    Command::cargo_bin("calc").unwrap()
}

#[test]
fn test_calculation_from_args() {
    calc()
        .args(["3", "+", "4", "*", "2"])
        .assert()
        .success()
        .stdout("11\nCalculation\n");
}

#[test]
fn test_query_from_stdin() {
    calc()
        .write_stdin("25 c to f\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("77.00 °F"))
        .stdout(predicate::str::contains("Temperature conversion"));
}

#[test]
fn test_negative_leading_number() {
    calc()
        .args(["-2", "*", "3"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("-6\n"));
}

#[test]
fn test_date_with_pinned_now() {
    calc()
        .args(["--now", NOW, "next", "friday"])
        .assert()
        .success()
        .stdout("Friday, 20 February 2026, 14:30\nDetected date\n");
}

#[test]
fn test_time_zone_shifts_local_now() {
    // 20:00 UTC is already the next morning in Tokyo
    calc()
        .args(["--now", "2026-02-18T20:00:00Z", "--tz", "Asia/Tokyo", "today"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Thursday, 19 February 2026, 05:00"));
}

#[test]
fn test_json_output() {
    let output = calc()
        .args(["--json", "5 kg a pound"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["title"], "11.02 lbs");
    assert_eq!(json["subtitle"], "Unit conversion");
    assert_eq!(json["kind"], "unit_conversion");
}

#[test]
fn test_no_interpretation_exits_one() {
    calc()
        .arg("hello world")
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("no interpretation"));
}

#[test]
fn test_unknown_time_zone_exits_two() {
    calc()
        .args(["--tz", "Mars/Olympus", "1 + 1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown time zone"));
}

#[test]
fn test_invalid_now_exits_two() {
    calc()
        .args(["--now", "yesterday-ish", "today"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid --now timestamp"));
}

#[test]
fn test_empty_stdin_exits_two() {
    calc()
        .write_stdin("   \n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("empty query"));
}

#[test]
fn test_config_disables_resolver() {
    let dir = std::env::temp_dir().join(format!("calc-cli-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let config = dir.join("options.json");
    std::fs::write(&config, r#"{"arithmetic": false}"#).unwrap();

    calc()
        .arg("--config")
        .arg(&config)
        .arg("2 + 2")
        .assert()
        .code(1);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_config_exits_two() {
    calc()
        .args(["--config", "/nonexistent/calc-options.json", "1 + 1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read config file"));
}
