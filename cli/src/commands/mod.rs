//! # cpuname Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the operations cpuname exposes, both as clap
//! subcommands and as entries in the interactive menu.
//!
//! ## Architecture
//!
//! - `protection`: the System Integrity Protection gate every operation passes first
//! - `show`: inspect the current patched value, hardware name and backup state
//! - `set`: back up the strings resource once, then patch the CPU name
//! - `backup`: delete or restore the backup
//! - `menu`: the interactive loop (default when no subcommand is given)
//!
//! Mutations are reported as an `Outcome`. Expected failures (missing language,
//! unreadable resource, a command exiting non-zero) are outcomes, not errors.
//!

/// The System Integrity Protection gate.
pub mod protection;
/// Delete and restore the `.bak` copy of the strings resource.
pub mod backup;
/// The interactive text menu.
pub mod menu;
/// Patch the CPU name.
pub mod set;
/// Inspect the current state.
pub mod show;

use crate::core::error::{CpuNameError, Result};
use crate::core::session::Session;
use std::path::PathBuf;

/// How a guarded operation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// The operator declined to continue at the protection gate.
    Declined,
    LanguageMissing,
    NoBackup,
    /// The strings resource could not be loaded; nothing was changed.
    Unreadable { path: PathBuf, reason: String },
    /// A command in the operation's batch exited non-zero.
    Failed { exit_code: i32 },
}

/// Final status for the one-shot subcommands.
///
/// A failed command, a missing language or an unreadable resource becomes an
/// error so the process exits non-zero. A missing backup or a declined gate
/// is reported and exits cleanly.
pub fn report_outcome(session: &mut Session, outcome: Outcome, operation: &str) -> Result<()> {
    match outcome {
        Outcome::Completed => session.say("Done."),
        Outcome::Declined => session.say("Aborted: System Integrity Protection check declined."),
        Outcome::NoBackup => Ok(()),
        Outcome::LanguageMissing => Err(CpuNameError::LanguageNotFound {
            language: session.language().to_string(),
        }
        .into()),
        Outcome::Unreadable { path, reason } => {
            Err(CpuNameError::UnreadableResource { path, reason }.into())
        }
        Outcome::Failed { exit_code } => Err(CpuNameError::ExternalCommand {
            cmd: operation.to_string(),
            status: exit_code,
            output: String::new(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::testing::fixture;
    use tempfile::tempdir;

    #[test]
    fn test_outcomes_that_exit_non_zero() -> Result<()> {
        let dir = tempdir()?;
        let mut fx = fixture(dir.path(), &[], &[]);

        report_outcome(&mut fx.session, Outcome::Completed, "set")?;
        report_outcome(&mut fx.session, Outcome::NoBackup, "restore")?;
        assert!(fx.console.contents().contains("Done."));

        let failed = report_outcome(&mut fx.session, Outcome::Failed { exit_code: 2 }, "restore")
            .unwrap_err();
        assert!(failed.to_string().contains("restore, Status: 2"));

        let unreadable = Outcome::Unreadable {
            path: PathBuf::from("/tmp/AppleSystemInfo.strings"),
            reason: "Permission denied (os error 13)".to_string(),
        };
        let err = report_outcome(&mut fx.session, unreadable, "set").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to read /tmp/AppleSystemInfo.strings: Permission denied (os error 13)"
        );
        Ok(())
    }
}
