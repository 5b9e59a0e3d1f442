//! Common utilities for CLI E2E tests.

use std::path::Path;
use std::process::Command;

/// Invoke the CLI against an isolated data directory.
pub fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_fitpulse-cli"))
        .args(args)
        .env("FITPULSE_DATA_DIR", data_dir)
        .env("FITPULSE_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Invoke a CLI command and expect success.
pub fn run_cli_success(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "CLI command {args:?} failed: {stderr}");
    stdout
}

/// Invoke a CLI command and expect failure; returns stderr.
pub fn run_cli_failure(data_dir: &Path, args: &[&str]) -> String {
    let (_, stderr, code) = run_cli(data_dir, args);
    assert_ne!(code, 0, "CLI command unexpectedly succeeded: {args:?}");
    stderr
}

/// Run a command whose stdout is a single JSON document.
pub fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let stdout = run_cli_success(data_dir, args);
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

/// Plan Push-ups (5 s) then Running (3 s).
pub fn plan_example(data_dir: &Path) {
    run_cli_success(
        data_dir,
        &["sequence", "add", "Push-ups", "-s", "5", "-c", "Strength"],
    );
    run_cli_success(data_dir, &["sequence", "add", "Running", "-s", "3"]);
}
