//! # cpuname CLI Configuration Integration Tests
//!
//! File: cli/tests/config.rs
//!
//! ## Overview
//!
//! Configuration is loaded before the platform check, so these tests run the
//! binary on any host. On hosts other than macOS, a valid configuration leads
//! to the "Incompatible System" refusal.
//!

mod common;
use common::*;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_missing_explicit_config_fails() {
    cpuname_cmd()
        .args(["--config", "/nonexistent/cpuname/config.toml", "show"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to read configuration file"));
}

#[test]
fn test_unknown_config_field_fails() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "[resources]\nlanguages = \"English\"\n");
    cpuname_cmd()
        .arg("--config")
        .arg(&config)
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse TOML"));
}

#[test]
fn test_invalid_config_fails_validation() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "[protection]\nstatus_command = []\n");
    cpuname_cmd()
        .arg("--config")
        .arg(&config)
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration validation failed"));
}

#[cfg(not(target_os = "macos"))]
#[test]
fn test_refuses_to_run_off_macos() {
    let dir = tempdir().unwrap();
    let config = write_config(dir.path(), "[menu]\npause_secs = 0\n");
    cpuname_cmd()
        .arg("--config")
        .arg(&config)
        .args(["set", "Test CPU"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("can only be run from macOS"));
}
