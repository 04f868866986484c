//! Integration tests for the `mince-yaml` binary (src/main.rs).
//!
//! Disabled under Miri and on WASI, where spawning processes is not supported.
#![cfg(all(not(miri), not(target_os = "wasi")))]

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;

/// Run the binary with the given args and return (stdout, stderr, exit_code).
fn run_binary(args: &[&str]) -> (String, String, i32) {
    let bin = env!("CARGO_BIN_EXE_mince-yaml");
    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute binary");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

fn yaml_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

fn path_of(file: &NamedTempFile) -> &str {
    file.path().to_str().expect("utf-8 temp path")
}

#[test]
fn help_flag_prints_usage_and_exits_zero() {
    let (stdout, _stderr, code) = run_binary(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Usage:"), "stdout: {stdout}");
}

#[test]
fn no_args_prints_usage_to_stderr_and_exits_one() {
    let (_stdout, stderr, code) = run_binary(&[]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Usage:"), "stderr: {stderr}");
}

#[test]
fn unknown_option_exits_one() {
    let (_stdout, stderr, code) = run_binary(&["--bogus", "x.yml"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown option --bogus"), "stderr: {stderr}");
}

#[test]
fn missing_file_exits_two() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.yml");
    let (_stdout, stderr, code) = run_binary(&[path.to_str().expect("utf-8 path")]);
    assert_eq!(code, 2);
    assert!(stderr.contains("file not found"), "stderr: {stderr}");
}

#[test]
fn valid_file_is_printed_normalized() {
    let file = yaml_file("minify: [a.js, b.js]\nlevel: 2\n");
    let (stdout, _stderr, code) = run_binary(&[path_of(&file)]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "---\nminify:\n  - a.js\n  - b.js\nlevel: 2\n");
}

#[test]
fn dump_flags_are_applied() {
    let file = yaml_file("minify: [a.js]\n");
    let (stdout, _stderr, code) =
        run_binary(&["--indent", "4", "--force-quotes", path_of(&file)]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "---\nminify:\n    - 'a.js'\n");
}

#[test]
fn budget_flag_appends_report() {
    let file = yaml_file("a: 1\nb: 2\n");
    let (stdout, _stderr, code) = run_binary(&["--budget", path_of(&file)]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("---\na: 1\nb: 2\n---\nbreached:\nlines: 2\n"), "stdout: {stdout}");
}

#[test]
fn invalid_document_exits_three_with_excerpt() {
    let file = yaml_file("a: 1\nb: *missing\n");
    let (_stdout, stderr, code) = run_binary(&[path_of(&file)]);
    assert_eq!(code, 3);
    assert!(stderr.contains("invalid"), "stderr: {stderr}");
    assert!(stderr.contains("line 2 column 4"), "stderr: {stderr}");
    assert!(stderr.contains("b: *missing"), "stderr: {stderr}");
}
