//! # cpuname Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utility modules used by the command handlers. Keeping them under
//! `common::` separates command logic (`commands::`) from core infrastructure
//! (`core::`).
//!
//! - **`process`**: running external commands, streamed or capture-only, singly or in batches.
//! - **`resource`**: locating `.lproj` directories and reading/writing the strings property list.
//! - **`system`**: host platform checks and the hardware CPU name.
//! - **`ui`**: header drawing and operator prompts.
//!
//! ```rust
//! use crate::common::process::CommandSpec;
//! use crate::common::resource::{backup_path, StringsFile};
//! ```
//!

/// Executing external commands and collecting their output.
pub mod process;
/// Strings resource location and property list access.
pub mod resource;
/// Platform checks and hardware queries.
pub mod system;
/// Terminal headers and prompts.
pub mod ui;
