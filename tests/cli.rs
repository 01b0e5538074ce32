//! CLI integration tests.
//! Each test writes its input into a fresh temp directory.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const EXPORT: &str = "Region\t1\n\
    1\tfalse  7\t2\n\
    Binding Energy\tCounts\nh\nh\nh\n\
    1000.00\t10.0\n\
    999.00\t12.0\n\
    Region\t2\n\
    2\tfalse C 7\t3\n\
    Binding Energy\tCounts\nh\nh\nh\n\
    287.00\t2.0\n\
    285.80\t9.0\n\
    284.00\t9.0\n\
    Region\t3\n\
    3\tfalse O 7\t2\n\
    Binding Energy\tCounts\nh\nh\nh\n\
    531.00\t4.0\n\
    530.00\t8.0\n";

fn xps_cmd() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("rusty-xps").unwrap()
}

fn write_input(dir: &TempDir, text: &str) -> PathBuf {
    let input = dir.path().join("run.txt");
    fs::write(&input, text).unwrap();
    input
}

#[test]
fn writes_results_for_every_category() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, EXPORT);

    xps_cmd()
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("max position is 285.8"))
        .stdout(predicate::str::contains("run_C_Result.txt"));

    for name in ["whole spectrum", "C", "O"] {
        assert!(dir.path().join(format!("run_{name}_Result.txt")).exists(), "{name}");
    }
    assert!(dir.path().join("run_calibration.json").exists());
    assert!(dir.path().join("run_summary.csv").exists());

    let c = fs::read_to_string(dir.path().join("run_C_Result.txt")).unwrap();
    let lines: Vec<&str> = c.lines().collect();
    assert_eq!(lines[0], "C generated by rusty-xps");
    assert_eq!(lines[4], "285.80  2.0  287.00");
    assert_eq!(lines[5], "284.60  9.0  285.80");
}

#[test]
fn positional_standard_energy_overrides_default() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, EXPORT);

    xps_cmd().arg(&input).arg("285.8").assert().success();

    let o = fs::read_to_string(dir.path().join("run_O_Result.txt")).unwrap();
    assert!(o.lines().any(|l| l == "531.00  4.0  531.00"));
}

#[test]
fn non_numeric_standard_energy_fails_before_reading_input() {
    xps_cmd()
        .args(["/nonexistent/run.txt", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a number"));
}

#[test]
fn ambiguous_reference_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let doubled = format!("{EXPORT}{}", EXPORT.replace("false O 7", "false C 7"));
    let input = write_input(&dir, &doubled);

    xps_cmd()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ambiguous"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn malformed_row_is_reported_with_line() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, &EXPORT.replace("285.80\t9.0", "285.80"));

    xps_cmd()
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 16"));
}

#[test]
fn config_file_and_out_dir() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, EXPORT);
    let config = dir.path().join("xps.toml");
    fs::write(&config, "reference_label = \"O\"\nstandard_energy = 530.0\n").unwrap();
    let out = dir.path().join("results");

    xps_cmd()
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("delta is 0"));

    let c = fs::read_to_string(out.join("run_C_Result.txt")).unwrap();
    assert!(c.lines().any(|l| l == "285.80  9.0  285.80"));
}
