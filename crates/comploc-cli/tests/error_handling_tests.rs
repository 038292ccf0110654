//! Tests for error handling, exit codes and suggestions.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DOCUMENT: &str = r#"{
    "containers": [ { "id": 1, "name": "Main", "references": [ { "leaf": 10 } ] } ],
    "leaves": [ { "id": 10, "name": "Title", "text": "x" } ]
}"#;

fn comploc(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("comploc").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join(".config"))
        .env_remove("COMPLOC_CONFIG");
    cmd
}

fn workspace(manifest: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("promo.json"), DOCUMENT).unwrap();
    fs::write(dir.path().join("strings.csv"), manifest).unwrap();
    dir
}

#[test]
fn test_missing_manifest_exits_not_found() {
    let dir = workspace("rootName,leafName,en\n");
    comploc(&dir)
        .args(["run", "-d", "promo.json", "-m", "nope.csv", "--yes"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("nope.csv"));
}

#[test]
fn test_missing_root_exits_not_found() {
    let dir = workspace("rootName,leafName,en\nGhost,Title,Hi\n");
    comploc(&dir)
        .args(["run", "-d", "promo.json", "-m", "strings.csv", "--yes"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Ghost"));

    assert_eq!(fs::read_to_string(dir.path().join("promo.json")).unwrap(), DOCUMENT);
}

#[test]
fn test_manifest_without_locales_is_user_error() {
    let dir = workspace("rootName,leafName,kind\nMain,Title,text\n");
    comploc(&dir)
        .args(["run", "-d", "promo.json", "-m", "strings.csv", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("locale"));
}

#[test]
fn test_unknown_locale_filter_exits_not_found() {
    let dir = workspace("rootName,leafName,en\nMain,Title,Hi\n");
    comploc(&dir)
        .args(["run", "-d", "promo.json", "-m", "strings.csv", "-l", "de", "--yes"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("de"));
}

#[test]
fn test_overwrite_without_yes_needs_confirmation() {
    let dir = workspace("rootName,leafName,en\nMain,Title,Hi\n");
    comploc(&dir)
        .args(["run", "-d", "promo.json", "-m", "strings.csv"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));

    assert_eq!(fs::read_to_string(dir.path().join("promo.json")).unwrap(), DOCUMENT);
}

#[test]
fn test_failed_substitutions_still_succeed() {
    let dir = workspace("rootName,leafName,en\nMain,Missing,Hi\n");
    comploc(&dir)
        .args(["run", "-d", "promo.json", "-m", "strings.csv", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("failed: 1"))
        .stdout(predicate::str::contains("Missing"));
}

#[test]
fn test_malformed_document_is_reported() {
    let dir = workspace("rootName,leafName,en\nMain,Title,Hi\n");
    fs::write(dir.path().join("promo.json"), "{ not json").unwrap();
    comploc(&dir)
        .args(["run", "-d", "promo.json", "-m", "strings.csv", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_unknown_config_key_exits_config_error() {
    let dir = workspace("rootName,leafName,en\n");
    comploc(&dir)
        .args(["config", "get", "does.not.exist"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_missing_explicit_config_exits_config_error() {
    let dir = workspace("rootName,leafName,en\n");
    comploc(&dir)
        .args(["--config", "absent.toml", "locales", "strings.csv"])
        .assert()
        .code(4);
}

#[test]
fn test_bad_delimiter_is_usage_error() {
    let dir = workspace("rootName,leafName,en\n");
    comploc(&dir)
        .args(["locales", "strings.csv", "--delimiter", ";;"])
        .assert()
        .code(2);
}
