//! Exit status and output of the `memlat` binary.
use std::path::Path;
use std::process::{Command, Output};

fn memlat(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_memlat"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

/// A tiny sweep that finishes in milliseconds
fn small_sweep(output: &Path) -> Output {
    memlat(&[
        output.to_str().unwrap(),
        "--iterations",
        "1000",
        "--working-set-sizes",
        "4096",
        "--strides",
        "8",
        "--no-priority",
    ])
}

#[test]
fn missing_output_path_exits_1() {
    let out = memlat(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!out.stderr.is_empty());
    assert!(out.stdout.is_empty());
}

#[test]
fn extra_argument_exits_1() {
    let out = memlat(&["a.csv", "b.csv"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
}

#[test]
fn help_exits_0() {
    let out = memlat(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
}

#[test]
fn successful_sweep_exits_0() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("latency.csv");
    let out = small_sweep(&path);
    assert_eq!(out.status.code(), Some(0));

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Working set size of 4096 bytes, stride size of 8 bytes, average latency: "));
    assert!(stdout.contains("Written to "));

    let csv = std::fs::read_to_string(&path).unwrap();
    assert!(csv.starts_with("WorkingSetSize,8\n4096,"));
}

#[test]
fn unwritable_output_exits_1_after_measuring() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("latency.csv");
    let out = small_sweep(&path);
    assert_eq!(out.status.code(), Some(1));

    // Cell lines were already printed before the write failed
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("Working set size of 4096 bytes"));
    assert!(!stdout.contains("Written to "));

    let stderr = String::from_utf8(out.stderr).unwrap();
    assert!(stderr.contains("failed to write results"));
    assert!(!path.exists());
}
