//! # cpuname CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test crates in `cli/tests/`. Each `.rs`
//! file there is compiled as its own test crate and runs the real `cpuname`
//! binary through `assert_cmd`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// An `assert_cmd::Command` for the `cpuname` binary built for this test run.
pub fn cpuname_cmd() -> Command {
    Command::cargo_bin("cpuname").expect("Failed to find cpuname binary for testing")
}

/// Writes `content` as `config.toml` inside `dir` and returns its path.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, content).expect("Failed to write test configuration");
    path
}
