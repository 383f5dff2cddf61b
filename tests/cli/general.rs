//! Help, completions, status, auth edge cases and error rendering.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();
    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("secrets"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("auth"));
}

#[test]
fn test_version() {
    let t = Test::new();
    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    let t = Test::new();
    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("envv"));
}

#[test]
fn test_status_offline() {
    let t = Test::new();
    let output = t.run(&["status"]);
    assert_success(&output);
    assert_stdout_contains(&output, "not initialized");
    assert_stdout_contains(&output, "not logged in");
    assert_stdout_contains(&output, "age");
}

#[test]
fn test_status_shows_binding_and_expired_session() {
    let t = Test::new();
    t.login_expired("alice@example.com");
    t.bind("org-1", "proj-1");

    let output = t.run(&["status"]);
    assert_success(&output);
    assert_stdout_contains(&output, "proj-1");
    assert_stdout_contains(&output, "alice@example.com (expired)");
}

#[test]
fn test_logout_when_not_logged_in() {
    let t = Test::new();
    let output = t.run(&["auth", "logout"]);
    assert_success(&output);
    assert_stdout_contains(&output, "not logged in");
}

#[test]
fn test_logout_clears_credentials_when_server_unreachable() {
    let t = Test::new();
    t.login("alice@example.com");
    assert!(t.credentials_path().exists());

    let output = t.run(&["auth", "logout"]);
    assert_success(&output);
    assert!(!t.credentials_path().exists());
}

#[test]
fn test_expired_session_hints_login() {
    let t = Test::new();
    t.login_expired("alice@example.com");
    t.bind("org-1", "proj-1");

    let output = t.run(&["secrets", "list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "session expired");
    assert_stderr_contains(&output, "envv auth login");
}

#[test]
fn test_unknown_engine_setting() {
    let t = Test::bound("proj-1");
    let output = t
        .cmd()
        .env("ENVV_ENGINE", "bogus")
        .args(["secrets", "list"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "ENVV_ENGINE");
}

#[test]
fn test_unreachable_service_reports_request_failure() {
    let t = Test::bound("proj-1");
    let output = t.run(&["secrets", "list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "request failed");
}

#[test]
fn test_verbose_logs_to_stderr() {
    let t = Test::bound("proj-1");
    let output = t.run(&["--verbose", "secrets", "list"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "api request");
    assert!(stdout(&output).is_empty());
}
