// CLI integration tests for ghost-edit

use std::fs;
use std::process::Command;

use serde_json::Value;

const MARKER: &str = "<|user_cursor_is_here|>";

/// Test that --help lists both subcommands
#[test]
fn test_help_lists_subcommands() {
    let output = Command::new(env!("CARGO_BIN_EXE_ghost-edit"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "Help should exit with success");
    assert!(stdout.contains("diff"), "Help should list diff. Got: {}", stdout);
    assert!(
        stdout.contains("predict"),
        "Help should list predict. Got: {}",
        stdout
    );
}

/// Test that diff prints the operation and, with --apply, the new text
#[test]
fn test_diff_prints_operation_and_applied_text() {
    let dir = tempfile::tempdir().unwrap();
    let old = dir.path().join("old.txt");
    let new = dir.path().join("new.txt");
    fs::write(&old, format!("def hello{MARKER}():")).unwrap();
    fs::write(&new, format!("def hello_world{MARKER}():")).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_ghost-edit"))
        .arg("diff")
        .arg(&old)
        .arg(&new)
        .arg("--apply")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    // JSON object first, applied text after it
    let json_end = stdout.find("\n}").expect("operation JSON") + 2;
    let operation: Value = serde_json::from_str(&stdout[..json_end]).unwrap();
    assert_eq!(operation["type"], "add");
    assert_eq!(operation["position"], 9);
    assert_eq!(operation["text"], "_world");
    assert!(stdout[json_end..].contains("def hello_world():"));
}

/// Test that a missing input file fails with an error message
#[test]
fn test_diff_missing_file_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_ghost-edit"))
        .args(["diff", "/nonexistent/old", "/nonexistent/new"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"), "Got: {}", stderr);
}
