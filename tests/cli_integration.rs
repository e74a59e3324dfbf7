//! Integration tests for the CLI
//!
//! Drives the binary end to end against tempdir fixtures: default patch run,
//! no-match run, repeat run, dry run, and custom rule parameters.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const FIXTURE: &str = concat!(
    "fn make_op() -> BitOperation {\n",
    "    BitOperation::InterleaveBits {\n",
    "        rows: 4,\n",
    "        convolutional_config: config,\n",
    "    }\n",
    "}\n",
    "\n",
    "fn make_other() -> BitOperation {\n",
    "    BitOperation::InterleaveBits {\n",
    "        rows: 8,\n",
    "        convolutional_config: unrelated_value,\n",
    "    }\n",
    "}\n",
);

/// Helper to create a target file inside a fresh tempdir.
fn setup_target(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("operations_tests.rs");
    fs::write(&file, content).unwrap();
    (dir, file)
}

fn run_patcher(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn patches_target_and_prints_confirmation() {
    let (_dir, file) = setup_target(FIXTURE);

    let output = run_patcher(&[file.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Updated"));
    assert!(stdout.contains("operations_tests.rs"));
    assert!(stdout.contains("symbol_config"));

    let content = fs::read_to_string(&file).unwrap();
    // Only the block with a permitted value token gains the field.
    assert_eq!(content.matches("symbol_config: None,").count(), 1);
    assert!(content.contains(concat!(
        "        convolutional_config: config,\n",
        "            symbol_config: None,\n",
        "    }\n",
    )));
    assert!(content.contains(concat!(
        "        convolutional_config: unrelated_value,\n",
        "    }\n",
    )));
}

#[test]
fn no_match_still_prints_confirmation() {
    let (_dir, file) = setup_target("fn main() {}\n");

    let output = run_patcher(&[file.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Updated"));

    assert_eq!(fs::read_to_string(&file).unwrap(), "fn main() {}\n");
}

#[test]
fn repeat_run_inserts_nothing_further() {
    let (_dir, file) = setup_target(FIXTURE);

    let first = run_patcher(&[file.to_str().unwrap()]);
    assert!(first.status.success());
    let after_first = fs::read_to_string(&file).unwrap();

    let second = run_patcher(&[file.to_str().unwrap()]);
    assert!(second.status.success());

    let after_second = fs::read_to_string(&file).unwrap();
    assert_eq!(after_second, after_first);
    assert_eq!(after_second.matches("symbol_config: None,").count(), 1);
}

#[test]
fn dry_run_does_not_modify_the_file() {
    let (_dir, file) = setup_target(FIXTURE);

    let output = run_patcher(&["--dry-run", "--diff", file.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[dry run] 1 insertion(s)"));
    assert!(stdout.contains("symbol_config: None,"));

    assert_eq!(fs::read_to_string(&file).unwrap(), FIXTURE);
}

#[test]
fn missing_target_fails_with_nonzero_status() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does_not_exist.rs");

    let output = run_patcher(&[missing.to_str().unwrap()]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"));
}

#[test]
fn custom_rule_parameters_override_the_defaults() {
    let (_dir, file) = setup_target(concat!(
        "    Settings {\n",
        "        block_config: None,\n",
        "    }\n",
    ));

    let output = run_patcher(&[
        "--field",
        "block_config",
        "--values",
        "None",
        "--insert",
        "depth: 0,",
        "--indent",
        "8",
        file.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Updated"));
    assert!(stdout.contains("depth"));

    let content = fs::read_to_string(&file).unwrap();
    assert!(content.contains("        block_config: None,\n        depth: 0,\n    }\n"));
}
