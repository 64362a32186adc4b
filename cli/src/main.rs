//! # cpuname Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the cpuname CLI, a macOS tool
//! that changes the name "About This Mac" shows for an unrecognized CPU by
//! patching the `UnknownCPUKind` entry of `AppleSystemInfo.strings`.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading configuration and building the session
//! - Routing execution to the matching command handler, or the interactive menu
//!
//! ## Examples
//!
//! ```bash
//! # Interactive menu
//! cpuname
//!
//! # One-shot operations
//! cpuname show
//! cpuname -v set "AMD Ryzen 9 5950X"
//! cpuname --lang German restore
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Load configuration (`--config`, then the user config file, then defaults)
//! 4. Refuse to continue anywhere but macOS
//! 5. Route to the command handler and display any error that occurs
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Operations: show, set, backup, menu, protection gate
mod common; // Shared utilities (process execution, resources, ui, system)
mod core; // Core infrastructure (errors, config, session)

use crate::common::{system, ui::StdinPrompter};
use crate::core::{config, session::Session};

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "cpuname",
    about = "Change the CPU name macOS shows for unrecognized processors",
    long_about = "Patches the UnknownCPUKind entry of AppleSystemInfo.strings, keeping a one-time\n\
                  backup that can be restored or deleted. Runs an interactive menu when no\n\
                  command is given.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Configuration file to use instead of the user configuration.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Language to operate on (e.g. English, German).
    #[arg(long, global = true, value_name = "LANG")]
    lang: Option<String>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    Show(commands::show::ShowArgs),
    #[command(alias = "s")]
    Set(commands::set::SetArgs),
    #[command(alias = "d")]
    DeleteBackup(commands::backup::DeleteBackupArgs),
    #[command(alias = "r")]
    Restore(commands::backup::RestoreArgs),
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut cfg = config::load_config(cli.config.as_deref())?;
    if let Some(lang) = cli.lang {
        cfg.resources.language = lang;
    }
    system::ensure_supported_platform()?;

    let mut session = Session::new(cfg, Box::new(std::io::stdout()), Box::new(StdinPrompter));
    match cli.command {
        None => commands::menu::run_menu(&mut session).await,
        Some(Commands::Show(args)) => commands::show::handle_show(args, &mut session).await,
        Some(Commands::Set(args)) => commands::set::handle_set(args, &mut session).await,
        Some(Commands::DeleteBackup(args)) => {
            commands::backup::handle_delete_backup(args, &mut session).await
        }
        Some(Commands::Restore(args)) => commands::backup::handle_restore(args, &mut session).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

// --- Basic Integration Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use predicates::prelude::*;

    fn cpuname_cmd() -> Command {
        Command::cargo_bin("cpuname").expect("Failed to find cpuname binary for testing")
    }

    #[test]
    fn test_main_help_flag() {
        cpuname_cmd().arg("--help").assert().success();
    }

    #[test]
    fn test_main_version_flag() {
        cpuname_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["cpuname", "restore", "--lang", "German", "-vv"]).unwrap();
        assert_eq!(cli.lang.as_deref(), Some("German"));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Some(Commands::Restore(_))));
        assert!(Cli::try_parse_from(["cpuname"]).unwrap().command.is_none());
    }
}
