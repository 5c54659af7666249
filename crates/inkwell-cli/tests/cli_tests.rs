//! Integration tests for the `inkwell` CLI binary.
//!
//! These tests run the CLI as a subprocess against credential files in
//! temporary directories, checking exit codes, output, and the YAML left
//! on disk.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::process::Command;

/// Helper: locate the `inkwell` binary built by `cargo test`.
fn inkwell_bin() -> String {
    let path = env!("CARGO_BIN_EXE_inkwell");
    assert!(
        Path::new(path).exists(),
        "inkwell binary not found at {path}"
    );
    path.to_owned()
}

/// Helper: run inkwell with args and return (`exit_code`, stdout, stderr).
fn run(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(inkwell_bin())
        .args(args)
        .env_remove("INKWELL_CREDENTIALS")
        .env_remove("INKWELL_PASSWORD")
        .output()
        .expect("failed to execute inkwell");

    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

/// Helper: run a `user` subcommand against a specific credential file.
fn run_user(credentials: &Path, args: &[&str]) -> (i32, String, String) {
    let mut full = vec!["user", "--credentials", credentials.to_str().unwrap()];
    full.extend_from_slice(args);
    run(&full)
}

// ── Version & help ───────────────────────────────────────────────────

#[test]
fn test_version_flag() {
    let (code, stdout, _) = run(&["--version"]);
    assert_eq!(code, 0, "inkwell --version should exit 0");
    assert!(
        stdout.contains("inkwell"),
        "version output should contain 'inkwell': {stdout}"
    );
}

#[test]
fn test_help_flag() {
    let (code, stdout, _) = run(&["--help"]);
    assert_eq!(code, 0, "inkwell --help should exit 0");
    assert!(stdout.contains("hash-password"), "help should list 'hash-password'");
    assert!(stdout.contains("user"), "help should list 'user'");
}

#[test]
fn test_user_help_lists_actions() {
    let (code, stdout, _) = run(&["user", "--help"]);
    assert_eq!(code, 0);
    for action in ["add", "remove", "list"] {
        assert!(stdout.contains(action), "user --help should list '{action}'");
    }
}

// ── hash-password ────────────────────────────────────────────────────

#[test]
fn test_hash_password_prints_bcrypt_hash() {
    let (code, stdout, _) = run(&["hash-password", "secret", "--cost", "4"]);
    assert_eq!(code, 0);
    let hash = stdout.trim();
    assert!(hash.starts_with("$2b$04$"), "unexpected hash: {hash}");
    assert_eq!(hash.len(), 60);
}

#[test]
fn test_hash_password_rejects_bad_cost() {
    let (code, _, stderr) = run(&["hash-password", "secret", "--cost", "2"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Error"), "should report the failure: {stderr}");
}

// ── user add / list / remove ─────────────────────────────────────────

#[test]
fn test_user_add_creates_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let users = dir.path().join("test").join("users.yml");

    let (code, stdout, stderr) =
        run_user(&users, &["add", "admin", "--password", "secret", "--cost", "4"]);
    assert_eq!(code, 0, "stderr: {stderr}");
    assert!(stdout.contains("User 'admin' added"));

    let yaml = fs::read_to_string(&users).expect("credential file should exist");
    assert!(yaml.starts_with("admin: "), "unexpected yaml: {yaml}");
    assert!(!yaml.contains("secret"), "password must not be stored in clear");
}

#[test]
fn test_user_add_refuses_duplicate_without_force() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let users = dir.path().join("users.yml");

    run_user(&users, &["add", "admin", "--password", "one", "--cost", "4"]);
    let before = fs::read_to_string(&users).unwrap();

    let (code, _, stderr) =
        run_user(&users, &["add", "admin", "--password", "two", "--cost", "4"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("already exists"), "{stderr}");
    assert_eq!(fs::read_to_string(&users).unwrap(), before);

    let (code, stdout, _) = run_user(
        &users,
        &["add", "admin", "--password", "two", "--cost", "4", "--force"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Password updated"));
    assert_ne!(fs::read_to_string(&users).unwrap(), before);
}

#[test]
fn test_user_add_rejects_empty_name() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let users = dir.path().join("users.yml");

    let (code, _, stderr) = run_user(&users, &["add", "  ", "--password", "x"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("username must not be empty"), "{stderr}");
    assert!(!users.exists());
}

#[test]
fn test_user_list_sorted() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let users = dir.path().join("users.yml");

    for name in ["zoe", "admin", "mia"] {
        let (code, _, _) = run_user(&users, &["add", name, "--password", "pw", "--cost", "4"]);
        assert_eq!(code, 0);
    }

    let (code, stdout, _) = run_user(&users, &["list"]);
    assert_eq!(code, 0);
    let admin = stdout.find("  admin").unwrap();
    let mia = stdout.find("  mia").unwrap();
    let zoe = stdout.find("  zoe").unwrap();
    assert!(admin < mia && mia < zoe, "users should be sorted: {stdout}");
}

#[test]
fn test_user_list_missing_file_is_empty() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let (code, stdout, _) = run_user(&dir.path().join("absent.yml"), &["list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("(no users)"));
}

#[test]
fn test_user_remove() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let users = dir.path().join("users.yml");
    run_user(&users, &["add", "admin", "--password", "pw", "--cost", "4"]);
    run_user(&users, &["add", "editor", "--password", "pw", "--cost", "4"]);

    let (code, stdout, _) = run_user(&users, &["remove", "editor"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("User 'editor' removed"));

    let yaml = fs::read_to_string(&users).unwrap();
    assert!(yaml.contains("admin:"));
    assert!(!yaml.contains("editor"));

    let (code, _, stderr) = run_user(&users, &["remove", "editor"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("not found"), "{stderr}");
}

#[test]
fn test_credentials_path_from_env() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let users = dir.path().join("env-users.yml");

    let output = Command::new(inkwell_bin())
        .args(["user", "add", "admin", "--cost", "4"])
        .env("INKWELL_CREDENTIALS", &users)
        .env("INKWELL_PASSWORD", "secret")
        .output()
        .expect("failed to execute inkwell");

    assert!(output.status.success());
    assert!(fs::read_to_string(&users).unwrap().starts_with("admin: "));
}
