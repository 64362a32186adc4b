//! # cpuname Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by every command:
//! - `config`: configuration loading, merging, and validation
//! - `error`: error types and the crate-wide `Result` alias
//! - `session`: per-run state (config, language, executor, console, prompter)
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{CpuNameError, Result}; // For error handling
//! use crate::core::session::Session; // Shared state for operations
//! ```
//!
pub mod config;
pub mod error;
pub mod session;
