use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn momentera(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("momentera").unwrap();
    cmd.arg("--data-dir").arg(dir.path()).arg("--no-speech");
    cmd
}

#[test]
fn test_first_run_creates_account_and_event() {
    let dir = TempDir::new().unwrap();

    momentera(&dir)
        .write_stdin("2\nalice\npw\n1\n1\nParty\n2030-01-01\n\n\n\n\n0\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No users found. You need to create an account first.",
        ))
        .stdout(predicate::str::contains("Account created and logged in as alice."))
        .stdout(predicate::str::contains("Event created successfully."))
        .stdout(predicate::str::contains("Exiting Momentera. Goodbye!"));

    let users = fs::read_to_string(dir.path().join("users.txt")).unwrap();
    assert_eq!(users, "alice:pw\n");
    let events = fs::read_to_string(dir.path().join("events").join("alice.jsonl")).unwrap();
    assert_eq!(events.lines().count(), 1);
    assert!(events.contains("\"Party\""));
}

#[test]
fn test_events_survive_restart() {
    let dir = TempDir::new().unwrap();
    momentera(&dir)
        .write_stdin("2\nalice\npw\n1\n1\nParty\n2030-01-01\n\n\n\n\n0\n0\n")
        .assert()
        .success();

    momentera(&dir)
        .write_stdin("1\nalice\npw\n1\n2\n0\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Login successful. Welcome back, alice!"))
        .stdout(predicate::str::contains("Party"))
        .stdout(predicate::str::contains("1 event(s)"));
}

#[test]
fn test_wrong_password_is_refused() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("users.txt"), "alice:pw\n").unwrap();

    momentera(&dir)
        .write_stdin("1\nalice\nnope\n1\nbob\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid password."))
        .stdout(predicate::str::contains("Invalid username."))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn test_end_of_input_still_saves() {
    let dir = TempDir::new().unwrap();

    momentera(&dir)
        .write_stdin("2\nbob\npw\n1\n1\nMeeting\n2030-02-02\n\n\n\n\n")
        .assert()
        .success();

    let events = fs::read_to_string(dir.path().join("events").join("bob.jsonl")).unwrap();
    assert!(events.contains("\"Meeting\""));
}

#[test]
fn test_invalid_menu_choice() {
    let dir = TempDir::new().unwrap();

    momentera(&dir)
        .write_stdin("9\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid choice."));
}

#[test]
fn test_writes_default_config() {
    let dir = TempDir::new().unwrap();

    momentera(&dir).write_stdin("0\n").assert().success();

    let config = fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(config.contains("currency_symbol"));
}
