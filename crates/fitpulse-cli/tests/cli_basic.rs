//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

mod common;

use common::{plan_example, run_cli_failure, run_cli_success, run_json};

#[test]
fn test_sequence_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    plan_example(dir.path());

    let list = run_json(dir.path(), &["sequence", "list"]);
    let exercises = list["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0]["name"], "Push-ups");
    assert_eq!(exercises[0]["category"], "Strength");
    assert_eq!(exercises[1]["index"], 1);
    assert_eq!(list["total_seconds"], 8);
}

#[test]
fn test_sequence_add_rejects_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let stderr = run_cli_failure(dir.path(), &["sequence", "add", "Plank", "-s", "0"]);
    assert!(stderr.contains("error:"), "unexpected stderr: {stderr}");
    run_cli_failure(dir.path(), &["sequence", "add", "   "]);

    let list = run_json(dir.path(), &["sequence", "list"]);
    assert!(list["exercises"].as_array().unwrap().is_empty());
}

#[test]
fn test_catalog_lists_quick_picks() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = run_json(dir.path(), &["sequence", "catalog", "-c", "cardio"]);
    let names = catalog["Cardio"].as_array().unwrap();
    assert!(names.iter().any(|n| n == "Running"));
    assert!(catalog.get("Strength").is_none());
}

#[test]
fn test_workout_ticks_to_completion_and_is_stored() {
    let dir = tempfile::tempdir().unwrap();
    plan_example(dir.path());

    let started = run_json(
        dir.path(),
        &["workout", "start", "--rest", "2", "--note", "very intense"],
    );
    assert_eq!(started["type"], "workout_started");

    let partial = run_json(dir.path(), &["workout", "tick", "--count", "9"]);
    assert_eq!(partial["snapshot"]["phase"], "exercising");
    assert!(partial["save"].is_null());

    let last = run_json(dir.path(), &["workout", "tick"]);
    assert_eq!(last["snapshot"]["phase"], "complete");
    assert_eq!(last["save"]["status"], "saved");
    assert_eq!(last["save"]["session_id"], 1);

    let rows = run_json(dir.path(), &["history", "list", "--session", "1"]);
    assert_eq!(rows.as_array().unwrap().len(), 2);

    let stats = run_json(dir.path(), &["history", "stats"]);
    assert_eq!(stats["total_workouts"], 1);
    assert_eq!(stats["total_seconds"], 8);
}

#[test]
fn test_pause_freezes_ticks() {
    let dir = tempfile::tempdir().unwrap();
    plan_example(dir.path());
    run_cli_success(dir.path(), &["workout", "start"]);
    run_cli_success(dir.path(), &["workout", "tick", "--count", "2"]);

    let paused = run_json(dir.path(), &["workout", "pause"]);
    assert_eq!(paused["type"], "workout_paused");
    assert_eq!(paused["remaining_seconds"], 3);

    let ticked = run_json(dir.path(), &["workout", "tick", "--count", "5"]);
    assert!(ticked["events"].as_array().unwrap().is_empty());
    assert_eq!(ticked["snapshot"]["remaining_seconds"], 3);

    run_cli_success(dir.path(), &["workout", "toggle"]);
    let status = run_json(dir.path(), &["workout", "status"]);
    assert_eq!(status["paused"], false);
}

#[test]
fn test_remove_while_running_fails() {
    let dir = tempfile::tempdir().unwrap();
    plan_example(dir.path());
    run_cli_success(dir.path(), &["workout", "start"]);
    run_cli_failure(dir.path(), &["sequence", "remove", "0"]);

    run_cli_success(dir.path(), &["workout", "reset"]);
    let removed = run_json(dir.path(), &["sequence", "remove", "0"]);
    assert_eq!(removed["removed"]["name"], "Push-ups");
}

#[test]
fn test_start_with_empty_sequence_fails() {
    let dir = tempfile::tempdir().unwrap();
    let stderr = run_cli_failure(dir.path(), &["workout", "start"]);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_history_clear_requires_token() {
    let dir = tempfile::tempdir().unwrap();
    plan_example(dir.path());
    run_cli_success(dir.path(), &["workout", "start", "--rest", "0"]);
    run_cli_success(dir.path(), &["workout", "tick", "--count", "8"]);

    let bogus = "00000000-0000-0000-0000-000000000000";
    run_cli_failure(dir.path(), &["history", "clear", "--confirm", bogus]);

    let armed = run_json(dir.path(), &["history", "clear"]);
    let token = armed["token"].as_str().unwrap().to_string();
    let cleared = run_json(dir.path(), &["history", "clear", "--confirm", &token]);
    assert_eq!(cleared["deleted"], 2);

    let rows = run_json(dir.path(), &["history", "list"]);
    assert!(rows.as_array().unwrap().is_empty());
    run_cli_failure(dir.path(), &["history", "clear", "--confirm", &token]);
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "profile.weight_kg"]).trim(),
        "70.0"
    );
    run_cli_success(dir.path(), &["config", "set", "timer.rest_seconds", "15"]);
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "timer.rest_seconds"]).trim(),
        "15"
    );

    run_cli_failure(dir.path(), &["config", "set", "profile.weight_kg", "5"]);
    run_cli_failure(dir.path(), &["config", "get", "no.such.key"]);

    run_cli_success(dir.path(), &["config", "reset"]);
    let config = run_json(dir.path(), &["config", "list"]);
    assert_eq!(config["timer"]["rest_seconds"], 0);
}

#[test]
fn test_workout_run_drives_to_completion() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["config", "set", "timer.tick_interval_ms", "1"]);
    plan_example(dir.path());

    let stdout = run_cli_success(dir.path(), &["workout", "run"]);
    assert!(stdout.contains("\"workout_completed\""));
    assert!(stdout.contains("\"completed\""));

    let status = run_json(dir.path(), &["workout", "status"]);
    assert_eq!(status["phase"], "complete");
    let rows = run_json(dir.path(), &["history", "list"]);
    assert_eq!(rows.as_array().unwrap().len(), 2);
}

#[test]
fn test_workout_run_stops_at_tick_limit() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["config", "set", "timer.tick_interval_ms", "1"]);
    run_cli_success(dir.path(), &["config", "set", "timer.tick_limit", "3"]);
    plan_example(dir.path());

    let stdout = run_cli_success(dir.path(), &["workout", "run"]);
    assert!(stdout.contains("\"limit_reached\""));

    let status = run_json(dir.path(), &["workout", "status"]);
    assert_eq!(status["phase"], "exercising");
    assert_eq!(status["remaining_seconds"], 2);
}

#[test]
fn test_workout_run_resumes_paused_session() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["config", "set", "timer.tick_interval_ms", "1"]);
    plan_example(dir.path());
    run_cli_success(dir.path(), &["workout", "start"]);
    run_cli_success(dir.path(), &["workout", "tick", "--count", "2"]);
    run_cli_success(dir.path(), &["workout", "pause"]);

    let stdout = run_cli_success(dir.path(), &["workout", "run"]);
    assert!(stdout.contains("\"workout_resumed\""));
    assert!(stdout.contains("\"completed\""));

    let status = run_json(dir.path(), &["workout", "status"]);
    assert_eq!(status["phase"], "complete");
}

#[test]
fn test_config_changes_apply_to_saved_session() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["sequence", "add", "Running"]);
    run_cli_success(dir.path(), &["config", "set", "profile.weight_kg", "100"]);
    run_cli_success(dir.path(), &["config", "set", "timer.rest_seconds", "30"]);

    let started = run_json(dir.path(), &["workout", "start"]);
    assert_eq!(started["rest_seconds"], 30);
    let status = run_json(dir.path(), &["workout", "status"]);
    assert_eq!(status["estimated_calories"], 17.15);

    // A run in flight keeps the settings it started with.
    run_cli_success(dir.path(), &["config", "set", "profile.weight_kg", "70"]);
    let status = run_json(dir.path(), &["workout", "status"]);
    assert_eq!(status["estimated_calories"], 17.15);
}

#[test]
fn test_note_during_run_reports_current_run_note() {
    let dir = tempfile::tempdir().unwrap();
    plan_example(dir.path());

    let idle = run_json(dir.path(), &["workout", "note", "easy day"]);
    assert_eq!(idle["note"], "easy day");
    assert!(idle.get("current_run_note").is_none());

    run_cli_success(dir.path(), &["workout", "start"]);
    let running = run_json(dir.path(), &["workout", "note", "very intense"]);
    assert_eq!(running["note"], "very intense");
    assert_eq!(running["current_run_note"], "easy day");
}

#[test]
fn test_completions_are_generated() {
    let dir = tempfile::tempdir().unwrap();
    let script = run_cli_success(dir.path(), &["completions", "bash"]);
    assert!(script.contains("fitpulse-cli"));
}
