//! End-to-end tests for the `sketch-tokens` binary.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

/// Path to the binary (set by cargo at compile time)
fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_sketch-tokens")
}

fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(bin())
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

struct Workspace {
    temp: TempDir,
    config: std::path::PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = write_config(temp.path(), &temp.path().join("uploads"));
        Self { temp, config }
    }

    fn run(&self, args: &[&str]) -> Output {
        run(&self.config, args)
    }

    fn path(&self) -> &Path {
        self.temp.path()
    }
}

#[test]
fn test_full_flow() {
    let ws = Workspace::new();
    let sketch = write_sketch(ws.path(), "Brand Kit.sketch", &sample_document());

    let output = ws.run(&["project", "add", "--id", "5", "--member", "ada"]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(ws.path().join("uploads").join("tokens.json").is_file());

    let output = ws.run(&[
        "upload",
        "--project",
        "5",
        "--user",
        "ada",
        "--json",
        sketch.to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(0));
    let upload = stdout_json(&output);
    assert_eq!(upload["version"], 1);
    assert_eq!(upload["skipped"], 0);

    let output = ws.run(&["scan", "--project", "5", "--user", "ada", "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let scan = stdout_json(&output);
    assert_eq!(scan["sync"]["colors_created"], 2);
    assert_eq!(scan["sync"]["typography_created"], 2);

    let output = ws.run(&["tokens", "--project", "5", "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let tokens = stdout_json(&output);
    assert_eq!(tokens["colors"][0]["value"], "#ff0000");
    assert_eq!(tokens["colors"][0]["ogName"], "Red");
    assert_eq!(tokens["typography"][0]["key"], "h1");

    let output = ws.run(&["tokens", "--project", "5"]);
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("Brand Red"));
    assert!(text.contains("Roboto"));
}

#[test]
fn test_scan_not_ready_exit_code() {
    let ws = Workspace::new();
    ws.run(&["project", "add", "--id", "1", "--member", "ada"]);

    let output = ws.run(&["scan", "--project", "1", "--user", "ada", "--json"]);

    assert_eq!(output.status.code(), Some(2));
    let body = stdout_json(&output);
    assert_eq!(body["code"], 0);
}

#[test]
fn test_upload_forbidden_json_body() {
    let ws = Workspace::new();
    let sketch = write_sketch(ws.path(), "a.sketch", &sample_document());
    ws.run(&["project", "add", "--id", "1", "--member", "ada"]);

    let output = ws.run(&[
        "upload",
        "--project",
        "1",
        "--user",
        "eve",
        "--json",
        sketch.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    let body = stdout_json(&output);
    assert_eq!(body["code"], 2);
    assert!(body["message"].as_str().unwrap().contains("eve"));
}

#[test]
fn test_upload_rejects_other_files() {
    let ws = Workspace::new();
    let notes = ws.path().join("notes.txt");
    std::fs::write(&notes, "hello").unwrap();
    ws.run(&["project", "add", "--id", "1", "--member", "ada"]);

    let output = ws.run(&[
        "upload",
        "--project",
        "1",
        "--user",
        "ada",
        "--json",
        notes.to_str().unwrap(),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout_json(&output)["code"], 1);
    assert!(!ws.path().join("uploads").join("projects").exists());
}

#[test]
fn test_unknown_project_plain_error() {
    let ws = Workspace::new();

    let output = ws.run(&["scan", "--project", "42", "--user", "ada"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Project 42 not found"), "stderr: {stderr}");
}

#[test]
fn test_extract_command() {
    let ws = Workspace::new();
    let archive = ws.path().join("evil.zip");
    write_zip(
        &archive,
        &[("a/../../escape.txt", b"x"), ("a/document.json", b"{}")],
    );
    let dst = ws.path().join("out");

    let output = ws.run(&[
        "extract",
        archive.to_str().unwrap(),
        dst.to_str().unwrap(),
        "--json",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let report = stdout_json(&output);
    assert_eq!(report["written"], 1);
    assert_eq!(report["skipped"], 1);
    assert!(dst.join("a").join("document.json").is_file());
    assert!(!ws.path().join("escape.txt").exists());
}

#[test]
fn test_invalid_config_fails() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "[typography]\nformat_tokens = []\n").unwrap();

    let output = run(&config, &["tokens", "--project", "1"]);
    assert_eq!(output.status.code(), Some(1));

    let output = run(&config, &["tokens", "--project", "1", "--json"]);
    assert_eq!(output.status.code(), Some(1));
    let body = stdout_json(&output);
    assert_eq!(body["code"], 1);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Failed to load configuration"));
}
