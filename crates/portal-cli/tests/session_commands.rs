use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;

fn write_session(dir: &std::path::Path, value: &serde_json::Value) {
    fs::write(dir.join("session.json"), value.to_string()).unwrap();
}

#[test]
fn test_status_without_session() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("portal")
        .env("PORTAL_HOME", dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Screen: Login"))
        .stdout(predicate::str::contains("Token: (none)"));
}

#[test]
fn test_status_with_stored_token_masks_it() {
    let dir = tempdir().unwrap();
    let profile = json!({"name": "Asha", "userid": "S1"}).to_string();
    write_session(
        dir.path(),
        &json!({
            "token": "abcdef1234567890",
            "userId": "S1",
            "userData": profile,
        }),
    );

    cargo_bin_cmd!("portal")
        .env("PORTAL_HOME", dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Screen: Dashboard"))
        .stdout(predicate::str::contains("User ID: S1"))
        .stdout(predicate::str::contains("Token: abcdef..."))
        .stdout(predicate::str::contains("abcdef1234567890").not())
        .stdout(predicate::str::contains("Name: Asha"));
}

#[test]
fn test_status_with_unreadable_store_falls_back_to_login() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("session.json"), "{not json").unwrap();

    cargo_bin_cmd!("portal")
        .env("PORTAL_HOME", dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Screen: Login"));
}

#[test]
fn test_status_reports_unreadable_profile_cache() {
    let dir = tempdir().unwrap();
    write_session(
        dir.path(),
        &json!({
            "token": "abcdef1234567890",
            "userId": "S1",
            "userData": "{not json",
        }),
    );

    cargo_bin_cmd!("portal")
        .env("PORTAL_HOME", dir.path())
        .env_remove("PORTAL_LOG")
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Screen: Dashboard"))
        .stderr(predicate::str::contains("cached profile unreadable"));

    let log = fs::read_to_string(dir.path().join("logs").join("portal.log")).unwrap();
    assert!(log.contains("cached profile unreadable"));
}

#[test]
fn test_logout_removes_session_keys() {
    let dir = tempdir().unwrap();
    write_session(
        dir.path(),
        &json!({
            "token": "abcdef1234567890",
            "userId": "S1",
            "userData": "{}",
            "unrelated": "kept",
        }),
    );

    cargo_bin_cmd!("portal")
        .env("PORTAL_HOME", dir.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    let contents = fs::read_to_string(dir.path().join("session.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value, json!({"unrelated": "kept"}));
}

#[test]
fn test_ui_requires_terminal() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("portal")
        .env("PORTAL_HOME", dir.path())
        .env("PORTAL_BASE_URL", "http://127.0.0.1:9")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires a terminal"));
}

#[test]
fn test_invalid_base_url_is_rejected() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("portal")
        .env("PORTAL_HOME", dir.path())
        .env_remove("PORTAL_BASE_URL")
        .args(["--base-url", "not a url"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid API base URL"));
}
