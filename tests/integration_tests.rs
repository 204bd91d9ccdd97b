//! Integration tests for the mingle CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a mingle command
fn mingle() -> Command {
    Command::cargo_bin("mingle").unwrap()
}

/// Helper to create an initialized membership directory in a temp dir
fn setup_directory() -> TempDir {
    let tmp = TempDir::new().unwrap();
    mingle().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to register a member non-interactively
fn register_member(tmp: &TempDir, name: &str, email: &str, password: &str) {
    mingle()
        .current_dir(tmp.path())
        .args([
            "register",
            "--name",
            name,
            "--email",
            email,
            "--password",
            password,
            "--about",
            "Hello there",
            "--interests",
            "Rust,Go,Chess",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created member USR-"));
}

/// Helper to find the single member record file
fn member_file(tmp: &TempDir) -> std::path::PathBuf {
    fs::read_dir(tmp.path().join("members"))
        .unwrap()
        .filter_map(|e| e.ok().map(|e| e.path()))
        .find(|p| p.extension().map_or(false, |e| e == "yaml"))
        .expect("no member record written")
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    mingle()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("membership directory"));
}

#[test]
fn test_version_displays() {
    mingle()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mingle"));
}

#[test]
fn test_unknown_command_fails() {
    mingle()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// ============================================================================
// Init Command Tests
// ============================================================================

#[test]
fn test_init_creates_structure() {
    let tmp = TempDir::new().unwrap();

    mingle()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized"));

    assert!(tmp.path().join(".mingle/config.yaml").is_file());
    assert!(tmp.path().join("members").is_dir());
    assert!(tmp.path().join("interests").is_dir());
}

#[test]
fn test_init_seeds_default_interests() {
    let tmp = setup_directory();

    mingle()
        .current_dir(tmp.path())
        .args(["interest", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("4"));
}

#[test]
fn test_init_twice_reports_existing() {
    let tmp = setup_directory();

    mingle()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_commands_fail_outside_directory() {
    let tmp = TempDir::new().unwrap();

    mingle()
        .current_dir(tmp.path())
        .args(["member", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mingle init"));
}

// ============================================================================
// Register Command Tests
// ============================================================================

#[test]
fn test_register_creates_member() {
    let tmp = setup_directory();
    register_member(&tmp, "Ada Lovelace", "ada@example.com", "secret1");

    mingle()
        .current_dir(tmp.path())
        .args(["member", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ada@example.com"));
}

#[test]
fn test_register_links_interests() {
    let tmp = setup_directory();
    register_member(&tmp, "Ada Lovelace", "ada@example.com", "secret1");

    mingle()
        .current_dir(tmp.path())
        .args(["interest", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chess"));
}

#[test]
fn test_register_rejects_duplicate_email() {
    let tmp = setup_directory();
    register_member(&tmp, "Ada Lovelace", "ada@example.com", "secret1");

    mingle()
        .current_dir(tmp.path())
        .args([
            "register",
            "--name",
            "Imposter",
            "--email",
            "ADA@example.com",
            "--password",
            "secret2",
            "--about",
            "Hello",
            "--interests",
            "Rust,Go,Chess",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Email already exists"));
}

#[test]
fn test_register_rejects_short_password() {
    let tmp = setup_directory();

    mingle()
        .current_dir(tmp.path())
        .args([
            "register",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--password",
            "12345",
            "--about",
            "Hello",
            "--interests",
            "Rust,Go,Chess",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 6 characters"));
}

#[test]
fn test_register_rejects_invalid_email() {
    let tmp = setup_directory();

    mingle()
        .current_dir(tmp.path())
        .args([
            "register",
            "--name",
            "Ada",
            "--email",
            "not-an-email",
            "--password",
            "secret1",
            "--about",
            "Hello",
            "--interests",
            "Rust,Go,Chess",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid email"));
}

#[test]
fn test_register_requires_three_interests() {
    let tmp = setup_directory();

    mingle()
        .current_dir(tmp.path())
        .args([
            "register",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--password",
            "secret1",
            "--about",
            "Hello",
            "--interests",
            "Rust",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 3"));
}

// ============================================================================
// Login / Session Tests
// ============================================================================

#[test]
fn test_login_succeeds_with_correct_credentials() {
    let tmp = setup_directory();
    register_member(&tmp, "Ada Lovelace", "ada@example.com", "secret1");

    mingle()
        .current_dir(tmp.path())
        .args(["login", "--email", "ada@example.com", "--password", "secret1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed in as"));
}

#[test]
fn test_login_failure_is_symmetric() {
    let tmp = setup_directory();
    register_member(&tmp, "Ada Lovelace", "ada@example.com", "secret1");

    // Wrong password and unknown email produce the same message
    mingle()
        .current_dir(tmp.path())
        .args(["login", "--email", "ada@example.com", "--password", "wrong-pass"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid email or password"));

    mingle()
        .current_dir(tmp.path())
        .args(["login", "--email", "nobody@example.com", "--password", "secret1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid email or password"));
}

#[test]
fn test_whoami_roundtrip() {
    let tmp = setup_directory();
    register_member(&tmp, "Ada Lovelace", "ada@example.com", "secret1");

    mingle()
        .current_dir(tmp.path())
        .args(["login", "--email", "ada@example.com", "--password", "secret1"])
        .assert()
        .success();

    mingle()
        .current_dir(tmp.path())
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("ada@example.com"));

    mingle()
        .current_dir(tmp.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Signed out"));

    mingle()
        .current_dir(tmp.path())
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not signed in"));
}

// ============================================================================
// Member Command Tests
// ============================================================================

#[test]
fn test_member_update_profile() {
    let tmp = setup_directory();
    register_member(&tmp, "Ada Lovelace", "ada@example.com", "secret1");

    mingle()
        .current_dir(tmp.path())
        .args([
            "member",
            "update",
            "ada@example.com",
            "--about",
            "Updated biography",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated member"));

    mingle()
        .current_dir(tmp.path())
        .args(["member", "show", "ada@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated biography"));
}

#[test]
fn test_member_show_json_hides_credentials() {
    let tmp = setup_directory();
    register_member(&tmp, "Ada Lovelace", "ada@example.com", "secret1");

    mingle()
        .current_dir(tmp.path())
        .args(["member", "show", "ada@example.com", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ada@example.com"))
        .stdout(predicate::str::contains("hashed_password").not())
        .stdout(predicate::str::contains("salt").not());
}

#[test]
fn test_member_passwd_changes_credential() {
    let tmp = setup_directory();
    register_member(&tmp, "Ada Lovelace", "ada@example.com", "secret1");

    mingle()
        .current_dir(tmp.path())
        .args([
            "member",
            "passwd",
            "ada@example.com",
            "--password",
            "new-secret",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Password updated"));

    // Old password no longer works, new one does
    mingle()
        .current_dir(tmp.path())
        .args(["login", "--email", "ada@example.com", "--password", "secret1"])
        .assert()
        .failure();

    mingle()
        .current_dir(tmp.path())
        .args(["login", "--email", "ada@example.com", "--password", "new-secret"])
        .assert()
        .success();
}

#[test]
fn test_member_passwd_rejects_short_password() {
    let tmp = setup_directory();
    register_member(&tmp, "Ada Lovelace", "ada@example.com", "secret1");

    mingle()
        .current_dir(tmp.path())
        .args(["member", "passwd", "ada@example.com", "--password", "12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 6 characters"));
}

#[test]
fn test_member_rm_removes_record() {
    let tmp = setup_directory();
    register_member(&tmp, "Ada Lovelace", "ada@example.com", "secret1");

    mingle()
        .current_dir(tmp.path())
        .args(["member", "rm", "ada@example.com", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed member"));

    mingle()
        .current_dir(tmp.path())
        .args(["member", "list", "--count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0"));
}

// ============================================================================
// Interest Command Tests
// ============================================================================

#[test]
fn test_interest_add_and_duplicate() {
    let tmp = setup_directory();

    mingle()
        .current_dir(tmp.path())
        .args(["interest", "add", "Rust"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added interest"));

    mingle()
        .current_dir(tmp.path())
        .args(["interest", "add", "rust"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ============================================================================
// Validate Command Tests
// ============================================================================

#[test]
fn test_validate_passes_on_clean_directory() {
    let tmp = setup_directory();
    register_member(&tmp, "Ada Lovelace", "ada@example.com", "secret1");

    mingle()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn test_validate_flags_malformed_record() {
    let tmp = setup_directory();
    register_member(&tmp, "Ada Lovelace", "ada@example.com", "secret1");

    let path = member_file(&tmp);
    let content = fs::read_to_string(&path).unwrap();
    fs::write(&path, content.replace("ada@example.com", "not-an-email")).unwrap();

    mingle()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("failed validation"));
}
