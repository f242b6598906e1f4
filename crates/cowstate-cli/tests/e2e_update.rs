//! E2E CLI tests for `assign`, `set` and `equals`.
//!
//! Each test runs the `cowstate` binary as a subprocess in an isolated temp
//! directory, with user config pointed into that directory as well.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the cowstate binary, rooted in `dir`.
fn cs_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cowstate"));
    cmd.current_dir(dir);
    cmd.env("XDG_CONFIG_HOME", dir.join("xdg"));
    cmd.env_remove("FORMAT");
    // Suppress tracing output that goes to stderr
    cmd.env("COWSTATE_LOG", "error");
    cmd
}

fn write_doc(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(value).expect("serialize")).expect("write doc");
    path
}

fn read_doc(path: &Path) -> Value {
    let content = std::fs::read_to_string(path).expect("read doc");
    serde_json::from_str(&content).expect("valid JSON")
}

/// Run a command with `--format json` and parse stdout.
fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = cs_cmd(dir)
        .args(args)
        .args(["--format", "json"])
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "command {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--format json should produce valid JSON")
}

// ---------------------------------------------------------------------------
// assign
// ---------------------------------------------------------------------------

#[test]
fn assign_reports_changes() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "state.json", &json!({"a": 1, "b": 2, "c": 3}));
    write_doc(dir.path(), "changes.json", &json!({"a": 1, "b": 99, "c": null}));

    let out = run_json(dir.path(), &["assign", "state.json", "changes.json"]);

    assert_eq!(out["state"], json!({"a": 1, "b": 99}));
    assert_eq!(out["changed"], json!(["b"]));
    assert_eq!(out["removed"], json!(["c"]));
    assert_eq!(out["noop"], json!(false));
}

#[test]
fn assign_noop_leaves_file_untouched() {
    let dir = TempDir::new().expect("tempdir");
    let state = dir.path().join("state.json");
    // Compact, so a rewrite (pretty-printed) would be detectable.
    std::fs::write(&state, r#"{"a":1,"b":[1,2]}"#).expect("write");
    write_doc(dir.path(), "changes.json", &json!({"a": 1.0, "b": [1, 2], "gone": null}));

    let out = run_json(
        dir.path(),
        &["assign", "state.json", "changes.json", "--in-place"],
    );

    assert_eq!(out["noop"], json!(true));
    assert_eq!(
        std::fs::read_to_string(&state).expect("read"),
        r#"{"a":1,"b":[1,2]}"#
    );
}

#[test]
fn assign_in_place_writes_result() {
    let dir = TempDir::new().expect("tempdir");
    let state = write_doc(dir.path(), "state.json", &json!({"count": 1}));
    write_doc(dir.path(), "changes.json", &json!({"count": 2, "label": "x"}));

    cs_cmd(dir.path())
        .args(["assign", "state.json", "changes.json", "--in-place"])
        .assert()
        .success();

    assert_eq!(read_doc(&state), json!({"count": 2, "label": "x"}));
}

#[test]
fn assign_keep_null_stores_null() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "state.json", &json!({"a": 1}));
    write_doc(dir.path(), "changes.json", &json!({"a": null}));

    let out = run_json(
        dir.path(),
        &["assign", "state.json", "changes.json", "--keep-null"],
    );

    assert_eq!(out["state"], json!({"a": null}));
    assert_eq!(out["changed"], json!(["a"]));
}

#[test]
fn assign_respects_project_config_null_deletes() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(dir.path().join(".cowstate")).expect("mkdir");
    std::fs::write(
        dir.path().join(".cowstate/config.toml"),
        "[update]\nnull_deletes = false\n",
    )
    .expect("write config");
    write_doc(dir.path(), "state.json", &json!({"a": 1}));
    write_doc(dir.path(), "changes.json", &json!({"a": null}));

    let out = run_json(dir.path(), &["assign", "state.json", "changes.json"]);
    assert_eq!(out["state"], json!({"a": null}));
}

#[test]
fn assign_reads_changes_from_stdin() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "state.json", &json!({"a": 1}));

    cs_cmd(dir.path())
        .args(["assign", "state.json", "-", "--format", "text"])
        .write_stdin(r#"{"a": 2}"#)
        .assert()
        .success()
        .stdout("{\"a\":2}\nchanged=a removed=\n");
}

#[test]
fn assign_rejects_non_object_state() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "state.json", &json!([1, 2, 3]));
    write_doc(dir.path(), "changes.json", &json!({"a": 1}));

    cs_cmd(dir.path())
        .args(["assign", "state.json", "changes.json", "--format", "text"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error[E2001]"))
        .stderr(predicate::str::contains("found array"));
}

#[test]
fn assign_rejects_non_object_changes_as_json_error() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "state.json", &json!({}));
    write_doc(dir.path(), "changes.json", &json!("nope"));

    let output = cs_cmd(dir.path())
        .args(["assign", "state.json", "changes.json", "--format", "json"])
        .output()
        .expect("command should not crash");

    assert_eq!(output.status.code(), Some(2));
    let err: Value = serde_json::from_slice(&output.stderr).expect("JSON error on stderr");
    assert_eq!(err["error"]["error_code"], json!("E2002"));
}

#[test]
fn assign_missing_file_fails() {
    let dir = TempDir::new().expect("tempdir");
    cs_cmd(dir.path())
        .args(["assign", "nope.json", "also-nope.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nope.json"));
}

// ---------------------------------------------------------------------------
// set
// ---------------------------------------------------------------------------

#[test]
fn set_deletes_when_value_omitted() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "state.json", &json!({"a": 1, "b": 2}));

    let out = run_json(dir.path(), &["set", "state.json", "a"]);
    assert_eq!(out["state"], json!({"b": 2}));
    assert_eq!(out["removed"], json!(["a"]));
}

#[test]
fn set_delete_flag_removes_property() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "state.json", &json!({"a": 1, "b": 2}));

    let out = run_json(dir.path(), &["set", "state.json", "a", "--delete"]);
    assert_eq!(out["state"], json!({"b": 2}));
    assert_eq!(out["removed"], json!(["a"]));
}

#[test]
fn set_null_deletes_like_assign() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "state.json", &json!({"a": 1, "b": 2}));

    let out = run_json(dir.path(), &["set", "state.json", "a", "null"]);
    assert_eq!(out["state"], json!({"b": 2}));
    assert_eq!(out["removed"], json!(["a"]));

    let out = run_json(dir.path(), &["set", "state.json", "a", "null", "--keep-null"]);
    assert_eq!(out["state"], json!({"a": null, "b": 2}));
    assert_eq!(out["changed"], json!(["a"]));
}

#[test]
fn set_absent_to_absent_is_noop() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "state.json", &json!({"b": 2}));

    let out = run_json(dir.path(), &["set", "state.json", "a"]);
    assert_eq!(out["state"], json!({"b": 2}));
    assert_eq!(out["noop"], json!(true));
}

#[test]
fn set_parses_json_values() {
    let dir = TempDir::new().expect("tempdir");
    let state = write_doc(dir.path(), "state.json", &json!({}));

    cs_cmd(dir.path())
        .args(["set", "state.json", "n", "-5", "--in-place"])
        .assert()
        .success();
    cs_cmd(dir.path())
        .args(["set", "state.json", "obj", r#"{"x": [true]}"#, "--in-place"])
        .assert()
        .success();

    assert_eq!(read_doc(&state), json!({"n": -5, "obj": {"x": [true]}}));
}

#[test]
fn set_rejects_bare_words() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "state.json", &json!({}));

    cs_cmd(dir.path())
        .args(["set", "state.json", "name", "ada"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("quote strings"));
}

// ---------------------------------------------------------------------------
// equals
// ---------------------------------------------------------------------------

#[test]
fn equals_exit_codes() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "a.json", &json!({"a": [1, {"b": 2}]}));
    write_doc(dir.path(), "b.json", &json!({"a": [1, {"b": 2}]}));
    write_doc(dir.path(), "c.json", &json!({"a": "1"}));

    cs_cmd(dir.path())
        .args(["equals", "a.json", "b.json", "--format", "text"])
        .assert()
        .success()
        .stdout("true\n");

    cs_cmd(dir.path())
        .args(["equals", "a.json", "c.json", "--format", "text"])
        .assert()
        .code(1)
        .stdout("false\n");
}

#[test]
fn equals_quiet_prints_nothing() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "a.json", &json!(1));
    write_doc(dir.path(), "b.json", &json!(1.0));

    cs_cmd(dir.path())
        .args(["equals", "a.json", "b.json", "--quiet"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn equals_json_output() {
    let dir = TempDir::new().expect("tempdir");
    write_doc(dir.path(), "a.json", &json!({"x": 1}));
    write_doc(dir.path(), "b.json", &json!({"x": 2}));

    let output = cs_cmd(dir.path())
        .args(["equals", "a.json", "b.json", "--json"])
        .output()
        .expect("command should not crash");
    assert_eq!(output.status.code(), Some(1));
    let out: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(out, json!({"equal": false}));
}

#[test]
fn malformed_config_is_an_error_not_a_mismatch() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(dir.path().join(".cowstate")).expect("mkdir");
    std::fs::write(dir.path().join(".cowstate/config.toml"), "[output\n").expect("write config");
    write_doc(dir.path(), "a.json", &json!({"x": 1}));
    write_doc(dir.path(), "b.json", &json!({"x": 1}));

    cs_cmd(dir.path())
        .args(["equals", "a.json", "b.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error: Failed to parse"))
        .stderr(predicate::str::contains("config.toml"));
}

#[test]
fn malformed_config_renders_json_error_when_requested() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(dir.path().join(".cowstate")).expect("mkdir");
    std::fs::write(dir.path().join(".cowstate/config.toml"), "[output\n").expect("write config");
    write_doc(dir.path(), "state.json", &json!({}));

    let output = cs_cmd(dir.path())
        .args(["set", "state.json", "a", "1", "--json"])
        .output()
        .expect("command should not crash");
    assert_eq!(output.status.code(), Some(2));
    let err: Value = serde_json::from_slice(&output.stderr).expect("JSON error on stderr");
    assert!(
        err["error"]["message"]
            .as_str()
            .is_some_and(|message| message.contains("config.toml"))
    );
}

#[test]
fn completions_generate_script() {
    let dir = TempDir::new().expect("tempdir");
    cs_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cowstate"));
}
