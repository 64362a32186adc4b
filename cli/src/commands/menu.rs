//! # cpuname Interactive Menu
//!
//! File: cli/src/commands/menu.rs
//!
//! ## Overview
//!
//! Running `cpuname` without a subcommand opens a text menu. Each pass clears
//! the screen, shows the current language and patched name, lists the options
//! that apply right now, and reads one line:
//!
//! | Input             | Action                                          |
//! |-------------------|-------------------------------------------------|
//! | *(empty)*         | redraw                                          |
//! | `q`               | farewell screen, leave the loop                 |
//! | `c`               | set the hardware-reported name (if one is known)|
//! | `d` / `r`         | delete / restore the backup (if one exists)     |
//! | `<name>.lproj`    | switch the session to another language          |
//! | anything else     | set it as the new CPU name                      |
//!
//! Letters are case-insensitive. A letter whose option is not offered is
//! treated as a CPU name like any other input.
//!
//! Every pass runs inside a recovery boundary: an error is printed, the menu
//! pauses, and the loop continues. Closed standard input ends the loop.
//!
use super::{backup, set, show, Outcome};
use crate::core::error::{CpuNameError, Result};
use crate::core::session::Session;
use tracing::{debug, error, info};

const PROMPT: &str = "Please enter a new CPU name - or a new language (must end in .lproj):  ";
const LPROJ_SUFFIX: &str = ".lproj";

/// What the operator asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Redraw,
    Quit,
    UseHardware,
    DeleteBackup,
    RestoreBackup,
    SwitchLanguage(String),
    SetName(String),
}

/// Interprets one line of menu input given which options are on offer.
pub fn parse_choice(input: &str, has_hardware: bool, has_backup: bool) -> MenuChoice {
    if input.is_empty() {
        return MenuChoice::Redraw;
    }
    match input.to_ascii_lowercase().as_str() {
        "q" => return MenuChoice::Quit,
        "d" if has_backup => return MenuChoice::DeleteBackup,
        "r" if has_backup => return MenuChoice::RestoreBackup,
        "c" if has_hardware => return MenuChoice::UseHardware,
        _ => {}
    }
    let split = input.len().saturating_sub(LPROJ_SUFFIX.len());
    if let (Some(stem), Some(suffix)) = (input.get(..split), input.get(split..)) {
        if suffix.eq_ignore_ascii_case(LPROJ_SUFFIX) {
            return MenuChoice::SwitchLanguage(stem.to_string());
        }
    }
    MenuChoice::SetName(input.to_string())
}

/// Whether the loop should keep going after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

async fn pass(session: &mut Session) -> Result<Flow> {
    let Some(inspection) = show::inspect(session).await? else {
        session.say("Aborted: System Integrity Protection check declined.")?;
        return Ok(Flow::Exit);
    };

    session.header("CPU Name")?;
    session.say(" ")?;
    show::report(session, &inspection)?;
    session.say(" ")?;
    if let Some(name) = &inspection.hardware_name {
        session.say(format!("C. Use: {}", name))?;
    }
    if inspection.backup_exists {
        session.say("D. Delete Backup")?;
        session.say("R. Restore Backup")?;
    }
    session.say("Q. Quit")?;
    session.say(" ")?;

    let input = session.prompt(PROMPT)?;
    let choice = parse_choice(
        &input,
        inspection.hardware_name.is_some(),
        inspection.backup_exists,
    );
    debug!("Menu choice: {:?}", choice);

    let outcome = match choice {
        MenuChoice::Redraw => return Ok(Flow::Continue),
        MenuChoice::Quit => {
            farewell(session)?;
            return Ok(Flow::Exit);
        }
        MenuChoice::SwitchLanguage(language) => {
            info!("Switching language to {}", language);
            session.set_language(language);
            return Ok(Flow::Continue);
        }
        MenuChoice::UseHardware => match inspection.hardware_name {
            Some(name) => set::set_cpu_name(session, &name).await?,
            None => return Ok(Flow::Continue),
        },
        MenuChoice::SetName(name) => set::set_cpu_name(session, &name).await?,
        MenuChoice::DeleteBackup => backup::delete_backup(session).await?,
        MenuChoice::RestoreBackup => backup::restore_backup(session).await?,
    };

    match outcome {
        Outcome::Completed => session.say("Done.")?,
        Outcome::Failed { exit_code } => {
            session.say(format!("Command failed with exit code {}.", exit_code))?
        }
        Outcome::Declined
        | Outcome::LanguageMissing
        | Outcome::NoBackup
        | Outcome::Unreadable { .. } => {}
    }
    pause(session).await;
    Ok(Flow::Continue)
}

fn farewell(session: &mut Session) -> Result<()> {
    session.header("CPU Name")?;
    session.say(" ")?;
    session.say("Thanks for using cpuname!")?;
    session.say("Have a nice day/night!\n")
}

async fn pause(session: &Session) {
    tokio::time::sleep(session.config().menu.pause()).await;
}

/// Runs the menu until the operator quits or input closes.
pub async fn run_menu(session: &mut Session) -> Result<()> {
    info!("Starting interactive menu...");
    session.set_clear_screen(true);
    loop {
        match pass(session).await {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(()),
            Err(e) if matches!(e.downcast_ref::<CpuNameError>(), Some(CpuNameError::InputClosed)) => {
                debug!("Standard input closed; leaving the menu.");
                return Ok(());
            }
            Err(e) => {
                error!("Menu pass failed: {:?}", e);
                session.say(e.to_string())?;
                pause(session).await;
            }
        }
    }
}
