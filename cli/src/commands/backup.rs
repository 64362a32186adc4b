//! # cpuname Backup Handlers
//!
//! File: cli/src/commands/backup.rs
//!
//! ## Overview
//!
//! Implements `cpuname delete-backup` and `cpuname restore`, the two operations
//! on the `<resource>.bak` copy that `set` creates the first time it runs.
//!
//! - **delete-backup** removes the backup and leaves the patched resource alone.
//! - **restore** removes the patched resource and renames the backup into its
//!   place, so the original bytes come back and the backup is gone afterwards.
//!   The rename is only attempted if the removal succeeded.
//!
//! Both are elevated, streamed commands and both pass the protection gate first.
//!
//! ## Usage
//!
//! ```bash
//! cpuname delete-backup
//! cpuname restore
//! ```
//!
use super::{protection, Outcome};
use crate::common::process::{BatchResult, CommandSpec, SPAWN_FAILURE_CODE};
use crate::common::resource::backup_path;
use crate::core::error::Result;
use crate::core::session::Session;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

/// Arguments for the `delete-backup` subcommand.
#[derive(Parser, Debug)]
#[command(about = "Delete the backup of the strings resource")]
pub struct DeleteBackupArgs {}

/// Arguments for the `restore` subcommand.
#[derive(Parser, Debug)]
#[command(about = "Restore the strings resource from its backup")]
pub struct RestoreArgs {}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn outcome_of(batch: &BatchResult) -> Outcome {
    if batch.succeeded() {
        return Outcome::Completed;
    }
    Outcome::Failed {
        exit_code: batch.first_failure().unwrap_or(SPAWN_FAILURE_CODE),
    }
}

/// Common prelude: gate, header, and the resource/backup pair if a backup exists.
async fn locate_backup(
    session: &mut Session,
    title: &str,
) -> Result<std::result::Result<(PathBuf, PathBuf), Outcome>> {
    if !protection::ensure_cleared(session).await? {
        return Ok(Err(Outcome::Declined));
    }
    let file_name = session.config().resources.file_name.clone();
    session.header(&format!("{} {}", title, file_name))?;
    session.say(" ")?;

    let Some(path) = session.strings_path() else {
        session.say("Language lproj doesn't exist!")?;
        return Ok(Err(Outcome::LanguageMissing));
    };
    let backup = backup_path(&path);
    if !backup.exists() {
        session.say("Backup doesn't exist...")?;
        return Ok(Err(Outcome::NoBackup));
    }
    Ok(Ok((path, backup)))
}

/// Removes the backup of the current language's strings resource.
pub async fn delete_backup(session: &mut Session) -> Result<Outcome> {
    let (_, backup) = match locate_backup(session, "Deleting Backup").await? {
        Ok(found) => found,
        Err(outcome) => return Ok(outcome),
    };
    session.say(format!("Removing {}...", backup.display()))?;
    let remove = CommandSpec::argv(["rm".to_string(), path_arg(&backup)])
        .elevated()
        .streamed();
    let batch = session.run(&[remove], true).await?;
    Ok(outcome_of(&batch))
}

/// Replaces the strings resource with its backup.
pub async fn restore_backup(session: &mut Session) -> Result<Outcome> {
    let (path, backup) = match locate_backup(session, "Restoring Backup").await? {
        Ok(found) => found,
        Err(outcome) => return Ok(outcome),
    };
    let file_name = session.config().resources.file_name.clone();
    let specs = [
        CommandSpec::argv(["rm".to_string(), path_arg(&path)])
            .elevated()
            .streamed()
            .announce(format!("Removing {}...\n", path.display())),
        CommandSpec::argv(["mv".to_string(), "-f".to_string(), path_arg(&backup), path_arg(&path)])
            .elevated()
            .streamed()
            .announce(format!("Renaming {}.bak to {}...\n", file_name, file_name)),
    ];
    let batch = session.run(&specs, true).await?;
    Ok(outcome_of(&batch))
}

/// Handler for `cpuname delete-backup`.
pub async fn handle_delete_backup(_args: DeleteBackupArgs, session: &mut Session) -> Result<()> {
    info!("Handling delete-backup command...");
    let outcome = delete_backup(session).await?;
    super::report_outcome(session, outcome, "delete-backup")
}

/// Handler for `cpuname restore`.
pub async fn handle_restore(_args: RestoreArgs, session: &mut Session) -> Result<()> {
    info!("Handling restore command...");
    let outcome = restore_backup(session).await?;
    super::report_outcome(session, outcome, "restore")
}
