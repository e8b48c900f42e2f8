//! End-to-end tests driving the compiled binary against a temp data dir.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("habitsync").unwrap();
    cmd.args(["--data-dir", dir.path().to_str().unwrap(), "--user", "alice"]);
    cmd
}

fn cmd_for(dir: &TempDir, user: &str) -> Command {
    let mut cmd = Command::cargo_bin("habitsync").unwrap();
    cmd.args(["--data-dir", dir.path().to_str().unwrap(), "--user", user]);
    cmd
}

#[test]
fn add_then_list_shows_the_task() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["add", "Water the plants", "--priority", "high"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task #1"));

    cmd(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Water the plants"))
        .stdout(predicate::str::contains("High"));
}

#[test]
fn move_reclassifies_one_axis_only() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["add", "Ship the release", "--priority", "low", "--status", "in-progress"])
        .assert()
        .success();

    cmd(&dir)
        .args(["move", "1", "high"])
        .assert()
        .success()
        .stdout(predicate::str::contains("moved to High"));

    // Priority changed, status untouched.
    cmd(&dir)
        .args(["view", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Priority:  High"))
        .stdout(predicate::str::contains("Status:    Work In Progress"));
}

#[test]
fn move_rejects_unknown_column() {
    let dir = TempDir::new().unwrap();
    cmd(&dir).args(["add", "t"]).assert().success();

    cmd(&dir)
        .args(["move", "1", "attic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown column"));
}

#[test]
fn move_missing_task_fails() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["move", "42", "done"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn update_missing_task_fails() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["update", "7", "--title", "renamed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn delete_unknown_task_is_a_noop() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["delete", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to delete"));
}

#[test]
fn clear_only_touches_the_current_user() {
    let dir = TempDir::new().unwrap();
    cmd_for(&dir, "alice").args(["add", "mine"]).assert().success();
    cmd_for(&dir, "bob").args(["add", "theirs"]).assert().success();

    cmd_for(&dir, "alice")
        .args(["clear", "--yes"])
        .assert()
        .success();

    cmd_for(&dir, "alice")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks."));
    cmd_for(&dir, "bob")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("theirs"));
}

#[test]
fn logged_expense_shows_up_on_the_dashboard() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["log", "expense", "add", "4.50", "--category", "coffee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged expense #1"));

    cmd(&dir)
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("Spent today:    4.50"));
}

#[test]
fn log_rejects_out_of_range_mood() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["log", "mood", "add", "11", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 10"));
}

#[test]
fn completions_are_generated() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("habitsync"));
}
