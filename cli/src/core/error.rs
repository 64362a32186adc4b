//! # cpuname Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout cpuname.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `CpuNameError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! External command failures are not errors here. A command that
//! cannot be spawned or exits non-zero is reported through
//! `common::process::CommandResult`, so the interactive loop keeps running.
//! `Err` values are reserved for configuration problems, console I/O faults and
//! other conditions the current operation cannot recover from.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !path.exists() {
//!     return Err(CpuNameError::LanguageNotFound { language: lang.into() })?;
//! }
//!
//! // Add context to errors using anyhow
//! let dir = tempfile::tempdir().context("Failed to create a working directory")?;
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the cpuname application.
#[derive(Error, Debug)]
pub enum CpuNameError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("This tool can only be run from macOS/OS X. The current running system is \"{os}\".")]
    UnsupportedPlatform { os: String },

    #[error("Language lproj '{language}' doesn't exist!")]
    LanguageNotFound { language: String },

    #[error("Failed to read {}: {reason}", path.display())]
    UnreadableResource { path: PathBuf, reason: String },

    #[error("Failed to write resource: {0}")]
    ResourceWrite(String),

    #[error("Operator input closed.")]
    InputClosed,

    #[error("External command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ExternalCommand {
        cmd: String,
        status: i32,
        output: String,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = CpuNameError::Config("Missing setting 'foo'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Missing setting 'foo'"
        );

        let missing = CpuNameError::LanguageNotFound {
            language: "Klingon".into(),
        };
        assert_eq!(missing.to_string(), "Language lproj 'Klingon' doesn't exist!");

        let unreadable = CpuNameError::UnreadableResource {
            path: PathBuf::from("/tmp/AppleSystemInfo.strings"),
            reason: "not a property list".into(),
        };
        assert_eq!(
            unreadable.to_string(),
            "Failed to read /tmp/AppleSystemInfo.strings: not a property list"
        );

        let platform = CpuNameError::UnsupportedPlatform { os: "linux".into() };
        assert!(platform.to_string().contains("\"linux\""));
    }
}
