use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_ping_command() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("gsage")?;

    cmd.arg("--ping");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pong"));

    Ok(())
}

#[test]
fn test_no_args_runs_normally() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("gsage")?;

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Initializing application..."))
        .stdout(predicate::str::contains("Shutting down application..."))
        .stdout(predicate::str::contains("pong").not());

    Ok(())
}

#[test]
fn test_event_types_lists_builtin_types() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("gsage")?;

    cmd.arg("event-types");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("forceUnsubscribe"))
        .stdout(predicate::str::contains("MouseEvent::MOUSE_DOWN"))
        .stdout(predicate::str::contains("UIContextEvent::CREATE"))
        .stdout(predicate::str::contains("Initializing application...").not());

    Ok(())
}

#[test]
fn test_demo_shows_mouse_capture() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("gsage")?;

    cmd.arg("demo");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("UI contexts: main"))
        .stdout(predicate::str::contains("UI renderer active: true"))
        .stdout(predicate::str::contains("Click without capture handled by 2 listener(s)"))
        .stdout(predicate::str::contains("Click with capture handled by 1 listener(s)"))
        .stdout(predicate::str::contains("Frames rendered: 1"));

    Ok(())
}

#[test]
fn test_config_file_and_overrides() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("gsage.json");
    fs::write(&path, r#"{ "app_name": "Sandbox", "ui_input_priority": -100 }"#)?;

    // A UI after the game listener cannot hide the click from it
    let mut cmd = Command::cargo_bin("gsage")?;
    cmd.arg("--config").arg(&path).arg("--set").arg("ui_input_priority=10").arg("demo");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Click with capture handled by 2 listener(s)"));

    Ok(())
}

#[test]
fn test_bad_override_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("gsage")?;

    cmd.arg("--set").arg("not-an-assignment");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config override 'not-an-assignment'"));

    Ok(())
}

#[test]
fn test_missing_config_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut cmd = Command::cargo_bin("gsage")?;

    cmd.arg("--config").arg(dir.path().join("absent.yaml"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load settings"));

    Ok(())
}
