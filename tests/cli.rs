// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wordvecs::{Record, VectorStore};

fn wordvecs(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wordvecs"));
    cmd.current_dir(root)
        .env("EMBEDDINGS_ROOT", root.join("cache"))
        .env("HOME", root)
        .env("NO_COLOR", "1")
        .env_remove("WORDVECS_LOG");
    cmd
}

/// Writes a complete English fastText store holding `hello`.
fn seed_fasttext(root: &Path) -> Vec<f32> {
    let vector: Vec<f32> = (0..300).map(|i| i as f32 / 100.0).collect();
    let mut store = VectorStore::open(root.join("cache/fasttext/en.db"), 300).expect("open store");
    store
        .insert_batch(&[Record::new("hello", vector.clone())])
        .expect("seed store");
    vector
}

#[test]
fn corpora_lists_every_family() {
    let dir = TempDir::new().expect("tempdir");
    wordvecs(dir.path())
        .arg("corpora")
        .assert()
        .success()
        .stdout(predicate::str::contains("glove"))
        .stdout(predicate::str::contains("common_crawl_840"))
        .stdout(predicate::str::contains("numberbatch"))
        .stdout(predicate::str::contains("kazuma"));
}

#[test]
fn corpora_json_is_an_array() {
    let dir = TempDir::new().expect("tempdir");
    let output = wordvecs(dir.path())
        .args(["--format", "json", "corpora"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let entries: Value = serde_json::from_slice(&output.stdout).expect("json");
    let entries = entries.as_array().expect("array");
    assert!(entries
        .iter()
        .any(|e| e["corpus"] == "glove" && e["name"] == "twitter"));
}

#[test]
fn status_of_empty_root_reports_not_ingested() {
    let dir = TempDir::new().expect("tempdir");
    wordvecs(dir.path())
        .args(["status", "glove"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not ingested"))
        .stdout(predicate::str::contains("0 / 2195895"));

    assert!(!dir.path().join("cache/glove").exists());
}

#[test]
fn status_json_reports_complete_store() {
    let dir = TempDir::new().expect("tempdir");
    seed_fasttext(dir.path());

    let output = wordvecs(dir.path())
        .args(["--format", "json", "status", "fasttext"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let status: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(status["words"], 1);
    assert_eq!(status["dimension"], 300);
    assert_eq!(status["complete"], true);
}

#[test]
fn lookup_prints_known_and_missing_words() {
    let dir = TempDir::new().expect("tempdir");
    seed_fasttext(dir.path());

    wordvecs(dir.path())
        .args(["lookup", "fasttext", "hello", "nowhere"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello\t0 0.01 0.02"))
        .stdout(predicate::str::contains("nowhere\t(missing)"));
}

#[test]
fn lookup_json_with_zero_default() {
    let dir = TempDir::new().expect("tempdir");
    let hello = seed_fasttext(dir.path());

    let output = wordvecs(dir.path())
        .args([
            "--format", "json", "lookup", "fasttext", "hello", "nowhere", "--default", "zero",
        ])
        .output()
        .expect("run");
    assert!(output.status.success());

    let results: Value = serde_json::from_slice(&output.stdout).expect("json");
    let results = results.as_array().expect("array");
    assert_eq!(results.len(), 2);

    let first: Vec<f32> = serde_json::from_value(results[0]["vector"].clone()).expect("vector");
    assert_eq!(first, hello);

    let second = results[1]["vector"].as_array().expect("zero vector");
    assert_eq!(second.len(), 300);
    assert!(second.iter().all(|v| v.as_f64() == Some(0.0)));
}

#[test]
fn lookup_uses_configured_default() {
    let dir = TempDir::new().expect("tempdir");
    seed_fasttext(dir.path());
    fs::write(
        dir.path().join(".wordvecsrc.toml"),
        r#"
[lookup]
default = "zero"
"#,
    )
    .expect("write config");

    let output = wordvecs(dir.path())
        .args(["--format", "json", "lookup", "fasttext", "nowhere"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let results: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(results[0]["vector"].as_array().map(Vec::len), Some(300));
}

#[test]
fn invalid_glove_dimension_fails() {
    let dir = TempDir::new().expect("tempdir");
    wordvecs(dir.path())
        .args(["lookup", "glove", "--name", "twitter", "--dim", "300", "word"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid dimension"));
}

#[test]
fn unsupported_fasttext_language_fails() {
    let dir = TempDir::new().expect("tempdir");
    wordvecs(dir.path())
        .args(["status", "fasttext", "--lang", "xx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a supported fastText language"));
}

#[test]
fn completions_are_generated() {
    let dir = TempDir::new().expect("tempdir");
    wordvecs(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wordvecs"));
}
