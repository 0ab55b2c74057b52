//! End-to-end tests for the sheetcalc binary

use pretty_assertions::assert_eq;
use std::io::Write;
use std::process::{Command, Output};

fn sheetcalc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sheetcalc"))
        .args(args)
        .output()
        .expect("failed to run sheetcalc")
}

fn script(source: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file
}

#[test]
fn test_run_prints_values() {
    let file = script("# totals\nset A1 10\nset B1 =A1/4\nset A2 'note\n");
    let path = file.path().to_str().unwrap();

    let output = sheetcalc(&["run", path]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "10\t2.5\nnote\t\n");
}

#[test]
fn test_run_prints_texts() {
    let file = script("set A1 10\nset B1 = A1 / ( 4 )\n");
    let path = file.path().to_str().unwrap();

    let output = sheetcalc(&["run", "--texts", path]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "10\t=A1/4\n");
}

#[test]
fn test_run_reports_failures_continues_and_exits_nonzero() {
    let file = script("set A1 =B1\nset B1 =A1\nset B1 3\nget A1\n");
    let path = file.path().to_str().unwrap();

    let output = sheetcalc(&["run", "--quiet", path]);
    assert!(!output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "A1\t3\n");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "stderr: {stderr}");
    assert!(stderr.contains("1 command(s) failed"), "stderr: {stderr}");
}

#[test]
fn test_strict_run_fails() {
    let file = script("set A1 =A1\nset A2 1\n");
    let path = file.path().to_str().unwrap();

    let output = sheetcalc(&["run", "--strict", path]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_check() {
    let good = script("set A1 1\n\n# comment\nvalues\n");
    let output = sheetcalc(&["check", good.path().to_str().unwrap()]);
    assert!(output.status.success());

    let bad = script("set A1 1\nexplode\nset 1A 2\n");
    let output = sheetcalc(&["check", bad.path().to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"));
    assert!(stderr.contains("line 3"));
}

#[test]
fn test_missing_script() {
    let output = sheetcalc(&["run", "/nonexistent/script.txt"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}
