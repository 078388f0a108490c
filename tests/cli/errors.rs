//! Tests for error handling and CLI flags.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_missing_path_writes_nothing() {
    let t = Test::with_file("config.json", SAMPLE_JSON);

    let output = t.encrypt("config.json", "out.json", &["db.missing"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "unable to locate secure path `db.missing`");
    assert!(!t.exists("out.json"));
}

#[test]
fn test_all_missing_paths_reported() {
    let t = Test::with_file("config.json", SAMPLE_JSON);

    let output = t.encrypt("config.json", "out.json", &["db.missing", "db.password", "other"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "`db.missing`");
    assert_stderr_contains(&output, "`other`");
}

#[test]
fn test_container_target_rejected() {
    let t = Test::with_file("config.json", SAMPLE_JSON);

    let output = t.encrypt("config.json", "out.json", &["db"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "resolves to a mapping");
}

#[test]
fn test_no_keys_fails() {
    let t = Test::with_file("config.json", SAMPLE_JSON);

    t.cmd_with_passphrase()
        .args(["encrypt", "-i", "config.json", "-o", "out.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "you must specify either --key or --key-file",
        ));
}

#[test]
fn test_invalid_secure_path_syntax() {
    let t = Test::with_file("config.json", SAMPLE_JSON);

    let output = t.encrypt("config.json", "out.json", &["db..password"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid secure path `db..password`");
}

#[test]
fn test_unsupported_format() {
    let t = Test::with_file("config.toml", "a = 1\n");

    let output = t.encrypt("config.toml", "out.toml", &["a"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "unsupported format: toml");
}

#[test]
fn test_unsupported_strategy() {
    let t = Test::with_file("config.json", SAMPLE_JSON);

    t.cmd_with_passphrase()
        .args(["encrypt", "-i", "config.json", "-o", "out.json", "-k", "db.password"])
        .args(["-s", "keyring"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported strategy: keyring"));
}

#[test]
fn test_no_passphrase_without_terminal() {
    let t = Test::with_file("config.json", SAMPLE_JSON);

    t.cmd()
        .args(["encrypt", "-i", "config.json", "-o", "out.json", "-k", "db.password"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no passphrase given"))
        .stderr(predicate::str::contains("PASSPHRASE"));
    assert!(!t.exists("out.json"));
}

#[test]
fn test_empty_passphrase_rejected() {
    let t = Test::with_file("config.json", SAMPLE_JSON);

    let output = t
        .cmd()
        .args(["encrypt", "-i", "config.json", "-o", "out.json", "-k", "db.password"])
        .env("PASSPHRASE", "")
        .output()
        .unwrap();
    assert_failure(&output);
}

#[test]
fn test_malformed_json() {
    let t = Test::with_file("config.json", "{\"db\":");

    let output = t.encrypt("config.json", "out.json", &["db"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "json error");
    assert!(!t.exists("out.json"));
}

#[test]
fn test_malformed_dotenv_reports_line() {
    let t = Test::with_file(".env", "A=1\nthis is not an assignment\n");

    let output = t.encrypt(".env", ".env.enc", &["A"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "line 2");
}

#[test]
fn test_missing_input_file() {
    let t = Test::new();

    let output = t.encrypt("absent.json", "out.json", &["a"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "io error");
}

#[test]
fn test_help() {
    let t = Test::new();

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("encrypt-file"))
        .stdout(predicate::str::contains("edit"));
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("confseal"));
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();
    t.cmd().arg("unknown-command").assert().failure();
}

#[test]
fn test_completions_bash() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    assert!(stdout(&output).contains("confseal"));
}

#[test]
fn test_completions_zsh() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "zsh"]).output().unwrap();
    assert_success(&output);
    assert!(stdout(&output).contains("#compdef confseal"));
}
