//! # cpuname Show Handler
//!
//! File: cli/src/commands/show.rs
//!
//! ## Overview
//!
//! Implements `cpuname show`, which reports the current state without changing
//! anything:
//!
//! - the active language and the CPU name currently patched into its strings resource
//! - the CPU name the hardware reports
//! - whether a backup exists (and so whether delete/restore are available)
//!
//! The interactive menu builds its screen from the same `inspect` call.
//!
//! ## Usage
//!
//! ```bash
//! cpuname show
//! cpuname --lang German show
//! ```
//!
use super::protection;
use crate::common::resource::{backup_path, StringsFile};
use crate::common::system;
use crate::core::error::Result;
use crate::core::session::Session;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments for the `show` subcommand.
#[derive(Parser, Debug)]
#[command(about = "Show the current CPU name, hardware name and backup state")]
pub struct ShowArgs {}

/// Snapshot of the tool's view of the system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    pub language: String,
    /// Strings resource for the language, when the language exists.
    pub resource_path: Option<PathBuf>,
    /// Current value of the CPU name key, when readable.
    pub current_name: Option<String>,
    pub hardware_name: Option<String>,
    pub backup_exists: bool,
}

/// Gathers an `Inspection`, or `None` if the operator declined at the gate.
pub async fn inspect(session: &mut Session) -> Result<Option<Inspection>> {
    if !protection::ensure_cleared(session).await? {
        return Ok(None);
    }

    let hardware_name = match system::hardware_cpu_name(session).await {
        Ok(name) => Some(name),
        Err(e) => {
            debug!("Hardware name unavailable: {}", e);
            None
        }
    };

    let resource_path = session.strings_path();
    let key = session.config().resources.key.clone();
    let current_name = resource_path
        .as_deref()
        .and_then(|path| StringsFile::load(path).ok())
        .and_then(|strings| strings.get(&key).map(str::to_string));
    let backup_exists = resource_path
        .as_deref()
        .is_some_and(|path| backup_path(path).exists());

    Ok(Some(Inspection {
        language: session.language().to_string(),
        resource_path,
        current_name,
        hardware_name,
        backup_exists,
    }))
}

/// Writes the language, current name and hardware name lines.
pub fn report(session: &mut Session, inspection: &Inspection) -> Result<()> {
    session.say(format!("Current Language:    {}", inspection.language))?;
    match (&inspection.resource_path, &inspection.current_name) {
        (None, _) => session.say("Language lproj doesn't exist!")?,
        (Some(_), Some(name)) => session.say(format!("Current Unknown CPU: {}", name))?,
        (Some(_), None) => {
            let file_name = session.config().resources.file_name.clone();
            session.say(format!("Current Unknown CPU: (unreadable {})", file_name))?
        }
    }
    if let Some(name) = &inspection.hardware_name {
        session.say(format!("Hardware CPU:        {}", name))?;
    }
    Ok(())
}

/// Handler for `cpuname show`.
pub async fn handle_show(_args: ShowArgs, session: &mut Session) -> Result<()> {
    info!("Handling show command...");
    let Some(inspection) = inspect(session).await? else {
        session.say("Aborted: System Integrity Protection check declined.")?;
        return Ok(());
    };
    report(session, &inspection)?;
    let backup = if inspection.backup_exists { "present" } else { "none" };
    session.say(format!("Backup:              {}", backup))?;
    Ok(())
}
