//! Integration tests for the stagecraft binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn setup_project(config: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".stagecraft");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.yml"), config).unwrap();
    temp
}

const SIMPLE_CONFIG: &str = r#"
channels: [social, email]
platforms: [twitter, linkedin]
actions: [announce, promote]
export:
  format: markdown
  directory: exports
"#;

fn stagecraft(dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("stagecraft"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn exports(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir.join("exports"))
        .map(|entries| entries.map(|e| e.unwrap().path()).collect())
        .unwrap_or_default()
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("stagecraft"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Staged content generation"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("stagecraft"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_no_args_runs_session() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(SIMPLE_CONFIG);
    stagecraft(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported markdown"));

    let files = exports(temp.path());
    assert_eq!(files.len(), 1);
    let text = fs::read_to_string(&files[0])?;
    assert!(text.contains("## Platform Copy"));
    Ok(())
}

#[test]
fn cli_run_with_flags() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(SIMPLE_CONFIG);
    stagecraft(temp.path())
        .args([
            "run",
            "--non-interactive",
            "--channel",
            "email",
            "--platform",
            "twitter,linkedin",
            "--action",
            "promote",
            "--format",
            "json",
        ])
        .assert()
        .success();

    let files = exports(temp.path());
    assert!(files[0].to_string_lossy().contains("email-promote-"));
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&files[0])?)?;
    assert_eq!(json["metadata"]["channel"], "email");
    assert!(json["assets"]["platform-copy"]
        .as_str()
        .unwrap()
        .contains("[linkedin]"));
    Ok(())
}

#[test]
fn cli_run_reads_prompt_answers_from_env() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(SIMPLE_CONFIG);
    let output = temp.path().join("package.txt");
    stagecraft(temp.path())
        .env("STAGECRAFT_PROMPT_CHANNEL", "email")
        .env("STAGECRAFT_PROMPT_ACTION", "promote")
        .args(["run", "--non-interactive", "--format", "txt", "--output"])
        .arg(&output)
        .assert()
        .success();

    let text = fs::read_to_string(output)?;
    assert!(text.starts_with("CONTENT PACKAGE"));
    assert!(text.contains("email"));
    assert!(text.contains("promote"));
    Ok(())
}

#[test]
fn cli_run_rejects_unknown_channel() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(SIMPLE_CONFIG);
    stagecraft(temp.path())
        .args(["run", "--non-interactive", "--channel", "fax"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("fax"));
    assert!(exports(temp.path()).is_empty());
    Ok(())
}

#[test]
fn cli_run_rejects_invalid_config() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("gateway:\n  kind: http\n");
    stagecraft(temp.path())
        .args(["run", "--non-interactive"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("endpoint"));
    Ok(())
}

#[test]
fn cli_library_lists_saved_runs() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project(SIMPLE_CONFIG);
    stagecraft(temp.path())
        .args(["run", "--non-interactive"])
        .assert()
        .success();

    let output = stagecraft(temp.path())
        .args(["library", "list", "--json"])
        .output()?;
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let id = entries[0]["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("pkg_"));

    stagecraft(temp.path())
        .args(["library", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Content Package"));

    stagecraft(temp.path())
        .args(["library", "remove", &id])
        .assert()
        .success();

    stagecraft(temp.path())
        .args(["library", "show", &id])
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn cli_diff_prints_changes() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("old.txt"), "Hello world\nBye")?;
    fs::write(temp.path().join("new.txt"), "Hi there\nBye")?;

    stagecraft(temp.path())
        .args(["diff", "old.txt", "new.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Hello world"))
        .stdout(predicate::str::contains("+ Hi there"))
        .stdout(predicate::str::contains("+1 -1"));
    Ok(())
}

#[test]
fn cli_diff_missing_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    fs::write(temp.path().join("old.txt"), "x")?;
    stagecraft(temp.path())
        .args(["diff", "old.txt", "missing.txt"])
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn cli_completions_bash() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("stagecraft"));
    cmd.args(["completions", "bash"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("stagecraft"));
    Ok(())
}
