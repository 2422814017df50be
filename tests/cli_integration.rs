//! CLI Integration Tests
//!
//! These tests verify that the CLI commands work correctly end-to-end.
//! They test the actual binary behavior, not just the library.
//!
//! Run with:
//! ```bash
//! cargo test --test cli_integration
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::tempdir;

/// Get the path to the built binary
fn memfs_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_memfs"))
}

/// Run memfs with a config file that pins the defaults, returning
/// (stdout lines, stderr, success)
fn run_memfs(args: &[&str], config: &Path, stdin: Option<&str>) -> (Vec<String>, String, bool) {
    let mut child = Command::new(memfs_binary())
        .args(["-c", config.to_str().unwrap()])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute memfs");

    {
        let mut pipe = child.stdin.take().unwrap();
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).unwrap();
        }
    }

    let output = child.wait_with_output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect();

    (
        stdout,
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn default_config(dir: &Path) -> PathBuf {
    let path = dir.join("config.json");
    std::fs::write(&path, "{}").unwrap();
    path
}

fn parse(line: &str) -> serde_json::Value {
    serde_json::from_str(line).expect("each output line should be JSON")
}

// ============================================================================
// Script Execution Tests
// ============================================================================

#[test]
fn test_cli_run_script_file() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());
    let script = dir.path().join("script.memfs");
    std::fs::write(
        &script,
        "create f\nopen f\nwrite 0 hello world\nread 0 5\nread 0 6\nls\n",
    )
    .unwrap();

    let (stdout, _stderr, success) = run_memfs(&["run", script.to_str().unwrap()], &config, None);

    assert!(success, "run should succeed");
    assert_eq!(stdout.len(), 6, "one line per command");
    assert_eq!(parse(&stdout[1])["fd"], 0);
    assert_eq!(parse(&stdout[3])["data"], "hello");
    assert_eq!(parse(&stdout[4])["data"], " world");
    assert_eq!(parse(&stdout[5])["files"], serde_json::json!(["f"]));
}

#[test]
fn test_cli_run_from_stdin() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());

    let (stdout, _stderr, success) = run_memfs(
        &["run"],
        &config,
        Some("# comment\n\ncreate a\ntruncate a 3\nstat a\n"),
    );

    assert!(success, "run from stdin should succeed");
    assert_eq!(stdout.len(), 3);
    assert_eq!(parse(&stdout[2])["stat"]["size"], 3);
}

#[test]
fn test_cli_stops_on_error() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());

    let (stdout, _stderr, success) =
        run_memfs(&["run"], &config, Some("create a\nclose 4\ncreate b\n"));

    assert!(!success, "failing script should exit non-zero");
    assert_eq!(stdout.len(), 2, "nothing runs after the failure");
    let error = parse(&stdout[1]);
    assert_eq!(error["status"], "error");
    assert_eq!(error["kind"], "invalid_descriptor");
    assert_eq!(error["line"], 2);
}

#[test]
fn test_cli_keep_going() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());

    let (stdout, _stderr, success) = run_memfs(
        &["--keep-going", "run"],
        &config,
        Some("create a\ncreate a\ncreate b\nls\n"),
    );

    assert!(!success, "failures still reflect in exit status");
    assert_eq!(stdout.len(), 4, "every command runs");
    assert_eq!(parse(&stdout[1])["kind"], "already_exists");
    assert_eq!(parse(&stdout[3])["files"], serde_json::json!(["a", "b"]));
}

#[test]
fn test_cli_rejects_negative_truncate() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());

    let (stdout, _stderr, success) =
        run_memfs(&["run"], &config, Some("create a\ntruncate a -1\n"));

    assert!(!success);
    assert_eq!(parse(&stdout[1])["kind"], "invalid_argument");
}

// ============================================================================
// Demo, Format and Config Tests
// ============================================================================

#[test]
fn test_cli_demo() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());

    let (stdout, _stderr, success) = run_memfs(&["demo"], &config, None);

    assert!(success, "demo should succeed");
    let records: Vec<_> = stdout.iter().map(|l| parse(l)).collect();
    let ls = records.iter().find(|r| r["command"] == "ls").unwrap();
    assert_eq!(ls["files"], serde_json::json!(["file1.txt", "file2.txt"]));
    let reads: Vec<_> = records.iter().filter(|r| r["command"] == "read").collect();
    assert_eq!(reads[0]["data"], "This is co");
    assert_eq!(reads[1]["data"], "\nAppended contentor ");
}

#[test]
fn test_cli_text_format_from_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"format": "text"}"#).unwrap();

    let (stdout, _stderr, success) = run_memfs(&["run"], &config, Some("create a\n"));

    assert!(success);
    assert!(stdout.len() > 1, "pretty output spans several lines");
    let joined = stdout.join("\n");
    assert_eq!(parse(&joined)["name"], "a");
}

#[test]
fn test_cli_format_flag_overrides_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"format": "text"}"#).unwrap();

    let (stdout, _stderr, success) =
        run_memfs(&["-f", "json", "run"], &config, Some("create a\n"));

    assert!(success);
    assert_eq!(stdout.len(), 1);
    assert_eq!(parse(&stdout[0])["command"], "create");
}

#[test]
fn test_cli_missing_config_fails() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("absent.json");

    let (_stdout, stderr, success) = run_memfs(&["demo"], &config, None);

    assert!(!success);
    assert!(stderr.contains("Config error"), "got: {}", stderr);
}

#[test]
fn test_cli_missing_script_fails() {
    let dir = tempdir().unwrap();
    let config = default_config(dir.path());
    let script = dir.path().join("nope.memfs");

    let (_stdout, _stderr, success) = run_memfs(&["run", script.to_str().unwrap()], &config, None);

    assert!(!success);
}

#[test]
fn test_cli_init_writes_loadable_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("nested").join("config.json");

    let (stdout, _stderr, success) = run_memfs(&["init"], &config, None);

    assert!(success, "init should succeed");
    assert_eq!(parse(&stdout[0])["status"], "ok");
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config).unwrap()).unwrap();
    assert_eq!(written["format"], "json");
    assert_eq!(written["keep_going"], false);
    assert_eq!(written["log_level"], "warn");

    let (_stdout, _stderr, success) = run_memfs(&["run"], &config, Some("create a\n"));
    assert!(success, "written config should load");
}

#[test]
fn test_cli_init_refuses_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"format": "text"}"#).unwrap();

    let (_stdout, stderr, success) = run_memfs(&["init"], &config, None);
    assert!(!success);
    assert!(stderr.contains("--force"), "got: {}", stderr);
    assert!(std::fs::read_to_string(&config).unwrap().contains("text"));

    let (_stdout, _stderr, success) = run_memfs(&["init", "--force"], &config, None);
    assert!(success);
    assert!(std::fs::read_to_string(&config).unwrap().contains("\"json\""));
}
