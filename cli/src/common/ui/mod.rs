//! # cpuname UI Utilities (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Terminal helpers for the interactive parts of cpuname:
//!
//! - **Headers**: a boxed title drawn at the top of each screen, with the
//!   screen cleared through `crossterm` when the menu asks for it.
//! - **Prompts**: the `Prompter` trait reads single-line operator answers.
//!   `StdinPrompter` reads them from the terminal with `dialoguer`; tests
//!   script the answers.
//!
use crate::core::error::{CpuNameError, Result};
use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use dialoguer::Input;
use std::io::{self, Write};
use tracing::debug;

/// Builds the three lines of a boxed header.
///
/// The top bar is indented by two spaces, the title line is `width + 1`
/// characters wide, and the bottom bar starts at the margin. Titles too long
/// for the box are cut and end in `...#`.
pub fn header_lines(text: &str, width: usize) -> [String; 3] {
    let bar = "#".repeat(width);
    let text_len = text.chars().count();

    let centre = (width as f64 / 2.0 - text_len as f64 / 2.0).round_ties_even() - 2.0;
    let left = centre.max(0.0) as usize;
    let right = width.saturating_sub(left + text_len + 2);
    let mut middle = format!(" #{}{}{}#", " ".repeat(left), text, " ".repeat(right));

    let middle_len = middle.chars().count();
    if middle_len > width + 1 {
        let keep = (width + 1).saturating_sub(4);
        middle = middle.chars().take(keep).collect::<String>() + "...#";
    }
    [format!("  {}", bar), middle, bar]
}

/// Writes a header, optionally clearing the screen first.
pub fn draw_header<W>(console: &mut W, text: &str, width: usize, clear: bool) -> io::Result<()>
where
    W: Write + ?Sized,
{
    if clear {
        console.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
    }
    for line in header_lines(text, width) {
        writeln!(console, "{}", line)?;
    }
    console.flush()
}

/// Source of single-line operator input.
pub trait Prompter: Send {
    /// Shows `message` and returns the answer without its line ending.
    ///
    /// Returns `CpuNameError::InputClosed` when no more input can arrive.
    fn prompt(&mut self, console: &mut dyn Write, message: &str) -> Result<String>;
}

/// Reads answers from the terminal.
#[derive(Debug, Default)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn prompt(&mut self, console: &mut dyn Write, message: &str) -> Result<String> {
        console.flush()?;
        // dialoguer appends its own ": " after the prompt text.
        let text = message.trim_end().trim_end_matches(':');
        let answer = Input::<String>::new()
            .with_prompt(text)
            .allow_empty(true)
            .interact_text();
        match answer {
            Ok(line) => Ok(line),
            Err(dialoguer::Error::IO(e)) => Err(input_error(e)),
        }
    }
}

/// End of input and a missing terminal both mean no answer will ever come.
fn input_error(e: io::Error) -> anyhow::Error {
    match e.kind() {
        io::ErrorKind::UnexpectedEof | io::ErrorKind::NotConnected => {
            debug!("Operator input unavailable: {}", e);
            CpuNameError::InputClosed.into()
        }
        _ => e.into(),
    }
}
