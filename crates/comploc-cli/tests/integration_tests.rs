//! End-to-end tests for the `comploc` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DOCUMENT: &str = r#"{
    "containers": [
        { "id": 1, "name": "Main", "references": [ { "name": "Sub", "container": 2 } ] },
        { "id": 2, "name": "Sub", "references": [ { "leaf": 10 } ] }
    ],
    "leaves": [ { "id": 10, "name": "Headline", "text": "Placeholder" } ]
}"#;

const MANIFEST: &str = "rootName,leafName,kind,en,fr\nMain,Headline,text,Hello,Bonjour\n";

/// A scratch directory holding `promo.json` and `strings.csv`.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("promo.json"), DOCUMENT).unwrap();
        fs::write(dir.path().join("strings.csv"), MANIFEST).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// The binary, isolated from the user's config and `.env`.
    fn comploc(&self) -> Command {
        let mut cmd = Command::cargo_bin("comploc").unwrap();
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join(".config"))
            .env_remove("COMPLOC_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }
}

fn container_names(path: &Path) -> Vec<String> {
    let raw = fs::read_to_string(path).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
    doc["containers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_help_flag() {
    Command::cargo_bin("comploc")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("manifest"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("comploc")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_run_in_place_with_yes() {
    let ws = Workspace::new();
    ws.comploc()
        .args(["run", "-d", "promo.json", "-m", "strings.csv", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Localized 2 locale(s)"))
        .stdout(predicate::str::contains("failed: 0"));

    let names = container_names(&ws.path("promo.json"));
    for expected in ["Main", "Sub", "Main_en", "Main_fr", "Sub_en", "Sub_fr"] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}: {names:?}");
    }

    let raw = fs::read_to_string(ws.path("promo.json")).unwrap();
    assert!(raw.contains("Bonjour"));
    assert!(raw.contains("Placeholder"));
}

#[test]
fn test_run_with_output_keeps_original() {
    let ws = Workspace::new();
    ws.comploc()
        .args(["run", "-d", "promo.json", "-m", "strings.csv", "-o", "out/promo_loc.json"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(ws.path("promo.json")).unwrap(), DOCUMENT);
    let names = container_names(&ws.path("out/promo_loc.json"));
    assert!(names.iter().any(|n| n == "Main_fr"));
}

#[test]
fn test_locale_filter_limits_duplicates() {
    let ws = Workspace::new();
    ws.comploc()
        .args(["run", "-d", "promo.json", "-m", "strings.csv", "-l", "fr", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Localized 1 locale(s)"));

    let names = container_names(&ws.path("promo.json"));
    assert!(names.iter().any(|n| n == "Main_fr"));
    assert!(!names.iter().any(|n| n == "Main_en"));
}

#[test]
fn test_dry_run_leaves_document_untouched() {
    let ws = Workspace::new();
    ws.comploc()
        .args(["run", "-d", "promo.json", "-m", "strings.csv", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("2 duplicate(s) per locale"));

    assert_eq!(fs::read_to_string(ws.path("promo.json")).unwrap(), DOCUMENT);
}

#[test]
fn test_run_json_output() {
    let ws = Workspace::new();
    let out = ws
        .comploc()
        .args(["--format", "json", "run", "-d", "promo.json", "-m", "strings.csv", "--yes"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(summary["locales"], 2);
    assert_eq!(summary["applied"], 2);
    assert_eq!(summary["failed"], 0);
    assert!(summary["generated_at"].is_string());
}

#[test]
fn test_second_run_gets_unique_names() {
    let ws = Workspace::new();
    for _ in 0..2 {
        ws.comploc()
            .args(["run", "-d", "promo.json", "-m", "strings.csv", "-l", "en", "--yes"])
            .assert()
            .success();
    }

    let names = container_names(&ws.path("promo.json"));
    assert!(names.iter().any(|n| n == "Main_en"));
    assert!(names.iter().any(|n| n == "Main_en_2"));
}

#[test]
fn test_locales_lists_columns_in_order() {
    let ws = Workspace::new();
    ws.comploc()
        .args(["locales", "strings.csv"])
        .assert()
        .success()
        .stdout(predicate::eq("en\nfr\n"));
}

#[test]
fn test_locales_json() {
    let ws = Workspace::new();
    ws.comploc()
        .args(["locales", "strings.csv", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"fr\""));
}

#[test]
fn test_tree_shows_root_last() {
    let ws = Workspace::new();
    ws.comploc()
        .args(["tree", "-d", "promo.json", "-r", "Main"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Sub"))
        .stdout(predicate::str::contains("2. Main"));
}

#[test]
fn test_init_then_config_get() {
    let ws = Workspace::new();
    ws.comploc()
        .args(["--config", "comploc.toml", "init"])
        .assert()
        .success();
    assert!(ws.path("comploc.toml").exists());

    ws.comploc()
        .args(["--config", "comploc.toml", "config", "get", "replication.separator"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"_\""));
}

#[test]
fn test_init_creates_missing_config_in_new_directory() {
    let ws = Workspace::new();
    ws.comploc()
        .args(["--config", "conf/comploc.toml", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration created"));

    let written = fs::read_to_string(ws.path("conf/comploc.toml")).unwrap();
    assert!(written.contains("[replication]"));
    assert!(written.contains("shared_folder"));
}

#[test]
fn test_help_and_version_write_to_stdout() {
    let ws = Workspace::new();
    ws.comploc()
        .arg("--help")
        .assert()
        .code(0)
        .stderr(predicate::str::is_empty());
    ws.comploc()
        .arg("--version")
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("comploc"));
}

#[test]
fn test_config_file_changes_separator() {
    let ws = Workspace::new();
    fs::write(ws.path("comploc.toml"), "[replication]\nseparator = \"-\"\n").unwrap();

    ws.comploc()
        .args(["--config", "comploc.toml", "run", "-d", "promo.json", "-m", "strings.csv", "--yes"])
        .assert()
        .success();

    let names = container_names(&ws.path("promo.json"));
    assert!(names.iter().any(|n| n == "Main-fr"));
}

#[test]
fn test_config_path_prints_explicit_file() {
    let ws = Workspace::new();
    ws.comploc()
        .args(["--config", "custom.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}
