//! CLI smoke tests
//!
//! Drives the `lexigram` binary against a definition file written to a temp
//! directory: check accepts/rejects, tokens emits JSON, render prints the
//! grammar listing.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const NUMBER_GRAMMAR: &str = r#"
tokens:
  - { name: DIGIT, pattern: "[0-9]" }
  - { name: WHITESPACE, pattern: "[ \\t\\n]+", ignored: true }
rules:
  - name: number
    node:
      concatenation:
        - DIGIT
        - repeat: [DIGIT]
initial: number
"#;

fn write_files(dir: &TempDir, input: &str) -> (PathBuf, PathBuf) {
    let grammar_path = dir.path().join("number.yaml");
    fs::write(&grammar_path, NUMBER_GRAMMAR).unwrap();
    let input_path = dir.path().join("input.txt");
    fs::write(&input_path, input).unwrap();
    (grammar_path, input_path)
}

#[test]
fn test_check_accepts_valid_input() {
    let dir = TempDir::new().unwrap();
    let (grammar, input) = write_files(&dir, "123");

    Command::cargo_bin("lexigram")
        .unwrap()
        .args(["check", input.to_str().unwrap(), "--grammar"])
        .arg(&grammar)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok (3 tokens)"));
}

#[test]
fn test_check_rejects_with_source_context() {
    let dir = TempDir::new().unwrap();
    let (grammar, input) = write_files(&dir, "12a");

    Command::cargo_bin("lexigram")
        .unwrap()
        .args(["check", input.to_str().unwrap(), "--grammar"])
        .arg(&grammar)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(">>"));
}

#[test]
fn test_tokens_emits_json_stream() {
    let dir = TempDir::new().unwrap();
    let (grammar, input) = write_files(&dir, "4 2");

    Command::cargo_bin("lexigram")
        .unwrap()
        .args(["tokens", input.to_str().unwrap(), "--grammar"])
        .arg(&grammar)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"value\": \"4\""));
}

#[test]
fn test_render_prints_rule_listing() {
    let dir = TempDir::new().unwrap();
    let (grammar, _input) = write_files(&dir, "");

    Command::cargo_bin("lexigram")
        .unwrap()
        .args(["render", "--grammar"])
        .arg(&grammar)
        .assert()
        .success()
        .stdout(predicate::str::contains("number = DIGIT, { DIGIT } ;"));
}

#[test]
fn test_bad_definition_fails_before_reading_input() {
    let dir = TempDir::new().unwrap();
    let grammar_path = dir.path().join("broken.yaml");
    fs::write(
        &grammar_path,
        "tokens:\n  - { name: A, pattern: \"a\" }\nrules:\n  - name: start\n    node:\n      permutation: [A]\n",
    )
    .unwrap();

    Command::cargo_bin("lexigram")
        .unwrap()
        .args(["render", "--grammar"])
        .arg(&grammar_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown grammar operator"));
}
