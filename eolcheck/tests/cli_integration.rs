//! Integration tests for eolcheck CLI

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn run_eolcheck(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_eolcheck"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(output.status.success(), "git {:?} failed", args);
}

/// A fresh repository with the given files staged.
fn staged_repo(files: &[(&str, &[u8])]) -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "-q"]);
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    git(dir.path(), &["add", "."]);
    dir
}

#[test]
fn test_cli_help() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, success) = run_eolcheck(dir.path(), &["--help"]);

    assert!(success);
    assert!(stdout.contains("eolcheck"));
    assert!(stdout.contains("--crlf"));
    assert!(stdout.contains("--lf"));
    assert!(stdout.contains("--verbose"));
    assert!(stdout.contains("--commit"));
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, success) = run_eolcheck(dir.path(), &["--version"]);

    assert!(success);
    assert!(stdout.contains("eolcheck"));
}

#[test]
fn test_clean_staged_files() {
    let dir = staged_repo(&[("a.txt", b"one\ntwo\n"), ("b.txt", b"x\r\ny\r\n")]);
    let (stdout, stderr, success) = run_eolcheck(dir.path(), &[]);

    assert!(success, "stderr: {stderr}");
    assert!(stdout.is_empty());
    assert!(stderr.is_empty());
}

#[test]
fn test_mixed_file_fails() {
    let dir = staged_repo(&[("ok.txt", b"a\n"), ("mixed.txt", b"a\r\nb\n")]);
    let (_, stderr, success) = run_eolcheck(dir.path(), &[]);

    assert!(!success);
    assert!(stderr.contains("mixed.txt: CRLF LF"));
    assert!(!stderr.contains("ok.txt"));
    assert!(stderr.contains("1 error(s)"));
}

#[test]
fn test_verbose_lists_all_files() {
    let dir = staged_repo(&[("ok.txt", b"a\n"), ("img.bin", b"\x89PNG\0\r\n\n")]);
    let (_, stderr, success) = run_eolcheck(dir.path(), &["-v"]);

    assert!(success);
    assert!(stderr.contains("ok.txt: LF"));
    assert!(stderr.contains("img.bin: binary"));
}

#[test]
fn test_extension_policy() {
    let dir = staged_repo(&[
        ("build.bat", b"@echo off\n"),
        ("tools/run.sh", b"echo\r\n"),
        ("README", b"text\r\n"),
    ]);

    let (_, stderr, success) = run_eolcheck(dir.path(), &["--crlf", "bat,cmd", "--lf", ".sh"]);

    assert!(!success);
    assert!(stderr.contains("build.bat: LF"));
    assert!(stderr.contains("tools/run.sh: CRLF"));
    assert!(!stderr.contains("README"));
    assert!(stderr.contains("2 error(s)"));
}

#[test]
fn test_case_sensitive_extensions() {
    let dir = staged_repo(&[("BUILD.BAT", b"@echo off\n")]);

    let (_, _, success) = run_eolcheck(dir.path(), &["--crlf", "bat"]);
    assert!(!success);

    let (_, _, success) = run_eolcheck(dir.path(), &["--crlf", "bat", "-s"]);
    assert!(success);
}

#[test]
fn test_json_output() {
    let dir = staged_repo(&[("mixed.txt", b"a\rb\n")]);
    let (stdout, _, success) = run_eolcheck(dir.path(), &["--output", "json"]);

    assert!(!success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(parsed["error_count"], 1);
    assert_eq!(parsed["files"][0]["name"], "mixed.txt");
    assert_eq!(parsed["files"][0]["outcome"]["verdict"], "mixed");
    assert_eq!(parsed["files"][0]["outcome"]["stats"]["cr"], 1);
}

#[test]
fn test_commit_mode_checks_committed_tree() {
    let dir = staged_repo(&[("old.txt", b"a\r\nb\n")]);
    git(dir.path(), &["commit", "-q", "-m", "bad"]);

    // Nothing staged: the index check passes.
    let (_, _, success) = run_eolcheck(dir.path(), &[]);
    assert!(success);

    let (_, stderr, success) = run_eolcheck(dir.path(), &["--commit", "HEAD"]);
    assert!(!success);
    assert!(stderr.contains("old.txt: CRLF LF"));
}

#[test]
fn test_small_chunk_size() {
    let dir = staged_repo(&[("win.txt", b"a\r\nb\r\nc\r\n")]);
    let (_, stderr, success) = run_eolcheck(dir.path(), &["--chunk-size", "2", "-v"]);

    assert!(success);
    assert!(stderr.contains("win.txt: CRLF"));
}

#[test]
fn test_invalid_commit() {
    let dir = staged_repo(&[("a.txt", b"a\n")]);
    let (_, stderr, success) = run_eolcheck(dir.path(), &["--commit", "no-such-commit"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_invalid_path() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, success) = run_eolcheck(dir.path(), &["--path", "/nonexistent/path"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
}
