//! # cpuname Set Handler
//!
//! File: cli/src/commands/set.rs
//!
//! ## Overview
//!
//! Implements `cpuname set`, which writes a new CPU name into the strings
//! resource of the current language.
//!
//! ## Architecture
//!
//! Each step runs only if the previous one succeeded:
//!
//! 1. Clear the protection gate.
//! 2. Resolve and read the strings resource. A missing language or an
//!    unreadable file stops here, before anything is touched.
//! 3. If `<resource>.bak` does not exist yet, copy the resource to it with an
//!    elevated, streamed `cp`. An existing backup is never overwritten.
//! 4. Patch the key in memory and write the result into a private temporary
//!    directory.
//! 5. Move the temporary file over the resource with an elevated, streamed
//!    `mv -f`.
//!
//! The temporary directory is removed when the operation returns, on every path.
//!
//! ## Usage
//!
//! ```bash
//! cpuname set "AMD Ryzen 9 5950X"
//! cpuname set --hardware
//! ```
//!
use super::{protection, Outcome};
use crate::common::process::CommandSpec;
use crate::common::resource::{backup_path, StringsFile};
use crate::common::system;
use crate::core::error::{CpuNameError, Result};
use crate::core::session::Session;
use anyhow::Context;
use clap::{ArgGroup, Parser};
use tracing::{info, warn};

/// Arguments for the `set` subcommand.
#[derive(Parser, Debug)]
#[command(about = "Set the CPU name shown for unrecognized processors")]
#[command(group(ArgGroup::new("source").required(true).args(["name", "hardware"])))]
pub struct SetArgs {
    /// The new CPU name.
    name: Option<String>,

    /// Use the name the hardware reports.
    #[arg(long)]
    hardware: bool,
}

/// Patches the CPU name of the current language to `name`.
pub async fn set_cpu_name(session: &mut Session, name: &str) -> Result<Outcome> {
    if !protection::ensure_cleared(session).await? {
        return Ok(Outcome::Declined);
    }
    session.header(&format!("Setting CPU to {}", name))?;
    session.say(" ")?;

    let Some(path) = session.strings_path() else {
        session.say("Language lproj doesn't exist!")?;
        return Ok(Outcome::LanguageMissing);
    };
    let file_name = session.config().resources.file_name.clone();
    let mut strings = match StringsFile::load(&path) {
        Ok(strings) => strings,
        Err(e) => {
            warn!("{}", e);
            session.say(format!("Failed to read {}...", file_name))?;
            let reason = match e.downcast_ref::<CpuNameError>() {
                Some(CpuNameError::UnreadableResource { reason, .. }) => reason.clone(),
                _ => e.to_string(),
            };
            return Ok(Outcome::Unreadable { path, reason });
        }
    };

    let backup = backup_path(&path);
    if !backup.exists() {
        let copy = CommandSpec::argv([
            "cp".to_string(),
            path.to_string_lossy().into_owned(),
            backup.to_string_lossy().into_owned(),
        ])
        .elevated()
        .streamed()
        .announce("Creating backup...\n");
        let batch = session.run(&[copy], true).await?;
        if let Some(exit_code) = batch.first_failure() {
            session.say(format!("Failed to create backup (exit code {}).", exit_code))?;
            return Ok(Outcome::Failed { exit_code });
        }
    } else {
        info!("Backup already exists at {}", backup.display());
    }

    session.say(format!("Patching strings for CPU \"{}\"...", name))?;
    let key = session.config().resources.key.clone();
    strings.set(&key, name);

    let workdir = tempfile::tempdir().context("Failed to create a temporary directory")?;
    let staged = workdir.path().join(&file_name);
    strings.save(&staged)?;

    let replace = CommandSpec::argv([
        "mv".to_string(),
        "-f".to_string(),
        staged.to_string_lossy().into_owned(),
        path.to_string_lossy().into_owned(),
    ])
    .elevated()
    .streamed();
    let batch = session.run(&[replace], true).await?;
    drop(workdir);

    Ok(match batch.first_failure() {
        Some(exit_code) => Outcome::Failed { exit_code },
        None => Outcome::Completed,
    })
}

/// Handler for `cpuname set`.
pub async fn handle_set(args: SetArgs, session: &mut Session) -> Result<()> {
    info!("Handling set command...");
    let name = match (args.name, args.hardware) {
        (_, true) => system::hardware_cpu_name(session).await?,
        (Some(name), false) if !name.trim().is_empty() => name,
        _ => return Err(CpuNameError::Config("The CPU name cannot be empty.".to_string()).into()),
    };
    let outcome = set_cpu_name(session, &name).await?;
    super::report_outcome(session, outcome, "set")
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::testing::fixture;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    const DISABLED: &str = "System Integrity Protection status: disabled.";

    fn seed_resource(root: &Path) -> Result<PathBuf> {
        let lproj = root.join("English.lproj");
        fs::create_dir_all(&lproj)?;
        let path = lproj.join("AppleSystemInfo.strings");
        let mut strings = StringsFile::default();
        strings.set("UnknownCPUKind", "Unknown");
        strings.set("UnknownComputerModel", "Mac");
        strings.save(&path)?;
        Ok(path)
    }

    #[test]
    fn test_set_args_require_a_source() {
        assert!(SetArgs::try_parse_from(["set"]).is_err());
        assert!(SetArgs::try_parse_from(["set", "Name", "--hardware"]).is_err());
        let args = SetArgs::try_parse_from(["set", "AMD Ryzen 7"]).unwrap();
        assert_eq!(args.name.as_deref(), Some("AMD Ryzen 7"));
        assert!(SetArgs::try_parse_from(["set", "--hardware"]).unwrap().hardware);
    }

    #[tokio::test]
    async fn test_set_creates_backup_once_and_patches() -> Result<()> {
        let dir = tempdir()?;
        let path = seed_resource(dir.path())?;
        let original = fs::read(&path)?;
        let mut fx = fixture(dir.path(), &[DISABLED], &[]);

        assert_eq!(set_cpu_name(&mut fx.session, "AMD Ryzen 7 3700X").await?, Outcome::Completed);
        let backup = backup_path(&path);
        assert_eq!(fs::read(&backup)?, original);
        let patched = StringsFile::load(&path)?;
        assert_eq!(patched.get("UnknownCPUKind"), Some("AMD Ryzen 7 3700X"));
        assert_eq!(patched.get("UnknownComputerModel"), Some("Mac"));

        assert_eq!(set_cpu_name(&mut fx.session, "Second Name").await?, Outcome::Completed);
        assert_eq!(fs::read(&backup)?, original);
        assert_eq!(StringsFile::load(&path)?.get("UnknownCPUKind"), Some("Second Name"));

        let console = fx.console.contents();
        assert_eq!(console.matches("Creating backup...").count(), 1);
        assert!(console.contains("Patching strings for CPU \"Second Name\"..."));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_unreadable_resource_touches_nothing() -> Result<()> {
        let dir = tempdir()?;
        let lproj = dir.path().join("English.lproj");
        fs::create_dir_all(&lproj)?;
        let path = lproj.join("AppleSystemInfo.strings");
        fs::write(&path, "garbage")?;
        let mut fx = fixture(dir.path(), &[DISABLED], &[]);

        let outcome = set_cpu_name(&mut fx.session, "X").await?;
        assert!(matches!(&outcome, Outcome::Unreadable { path: p, .. } if *p == path));
        assert_eq!(fs::read_to_string(&path)?, "garbage");
        assert!(!backup_path(&path).exists());
        assert!(fx.console.contents().contains("Failed to read AppleSystemInfo.strings..."));
        Ok(())
    }

    #[tokio::test]
    async fn test_set_unreadable_reason_names_the_cause() -> Result<()> {
        let dir = tempdir()?;
        // The language exists but the strings file does not.
        fs::create_dir_all(dir.path().join("English.lproj"))?;
        let mut fx = fixture(dir.path(), &[DISABLED], &[]);

        let Outcome::Unreadable { reason, .. } = set_cpu_name(&mut fx.session, "X").await? else {
            panic!("expected an unreadable resource");
        };
        assert!(reason.contains("os error 2"), "reason: {}", reason);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_missing_language() -> Result<()> {
        let dir = tempdir()?;
        let mut fx = fixture(dir.path(), &[DISABLED], &[]);
        assert_eq!(set_cpu_name(&mut fx.session, "X").await?, Outcome::LanguageMissing);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_declined_at_gate() -> Result<()> {
        let dir = tempdir()?;
        let path = seed_resource(dir.path())?;
        let original = fs::read(&path)?;
        let mut fx = fixture(dir.path(), &["System Integrity Protection status: enabled."], &["n"]);

        assert_eq!(set_cpu_name(&mut fx.session, "X").await?, Outcome::Declined);
        assert_eq!(fs::read(&path)?, original);
        assert!(!backup_path(&path).exists());
        Ok(())
    }
}
