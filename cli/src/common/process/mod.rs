//! # cpuname Process Execution (`common::process`)
//!
//! File: cli/src/common/process/mod.rs
//!
//! ## Overview
//!
//! This module runs external commands for the rest of the tool. It provides:
//!
//! - **Command specifications** (`CommandSpec`): what to run, whether through the
//!   shell, whether to stream output live, whether to elevate privileges, and an
//!   optional message printed before execution.
//! - **Results** (`CommandResult`): accumulated stdout, accumulated stderr and the
//!   exit code. Spawn failures are folded into a result with exit code `1` and
//!   the stderr text `Command not found!`; they never surface as `Err`.
//! - **Execution paths**: live streaming (`stream`), capture-only (`capture`),
//!   and ordered batches with optional fail-fast (`batch`).
//!
//! ## Architecture
//!
//! ```text
//! BatchExecutor ── per spec ──> StreamingRunner ──> 2 x OutputPump (stdout, stderr)
//!                         └──> run_captured
//! ```
//!
//! Each streamed command owns two pump tasks for its duration only. The runner
//! returns once the process has exited and both pumps have drained.
//!
//! ## Usage
//!
//! ```rust
//! let spec = CommandSpec::argv(["rm", "/tmp/file.bak"]).elevated().streamed();
//! let batch = executor.run(&[spec], true, &mut std::io::stdout()).await?;
//! if batch.succeeded() { println!("Done."); }
//! ```
//!
pub mod batch;
pub mod capture;
pub mod pump;
pub mod stream;

pub use batch::{BatchExecutor, BatchResult};
pub use stream::StreamingRunner;

use std::process::{ExitStatus, Output, Stdio};
use tokio::process::Command;

/// Exit code reported when a command could not be started at all.
pub const SPAWN_FAILURE_CODE: i32 = 1;
/// Stderr text reported when a command could not be started at all.
pub const SPAWN_FAILURE_MESSAGE: &str = "Command not found!";

/// The command to run, either as discrete tokens or as one text line.
///
/// Every caller in the tool builds token lists; text lines are only built by tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    Argv(Vec<String>),
    #[cfg(test)]
    Line(String),
}

impl Default for CommandLine {
    fn default() -> Self {
        CommandLine::Argv(Vec::new())
    }
}

impl CommandLine {
    /// True when there is nothing to execute.
    pub fn is_empty(&self) -> bool {
        match self {
            CommandLine::Argv(tokens) => tokens.is_empty(),
            #[cfg(test)]
            CommandLine::Line(line) => line.trim().is_empty(),
        }
    }

    /// Puts `program` in front of the command (used for privilege escalation).
    pub fn prepend(&mut self, program: &str) {
        match self {
            CommandLine::Argv(tokens) => tokens.insert(0, program.to_string()),
            #[cfg(test)]
            CommandLine::Line(line) => *line = format!("{} {}", program, line),
        }
    }

    /// Human-readable form for logs and error messages.
    pub fn display(&self) -> String {
        match self {
            CommandLine::Argv(tokens) => tokens.join(" "),
            #[cfg(test)]
            CommandLine::Line(line) => line.clone(),
        }
    }
}

/// One external command and how to run it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    pub command: CommandLine,
    /// Interpret the command as a shell line (`sh -c`).
    pub shell: bool,
    /// Echo output live while accumulating it.
    pub stream: bool,
    /// Prefix with the privilege-escalation helper if the host has one.
    pub elevate: bool,
    /// Printed before the command runs.
    pub announce: Option<String>,
    /// Print captured stdout after a capture-only run.
    pub print_stdout: bool,
    /// Print captured stderr after a capture-only run.
    pub print_stderr: bool,
}

impl CommandSpec {
    pub fn argv<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: CommandLine::Argv(tokens.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    #[cfg(test)]
    pub fn line(line: impl Into<String>) -> Self {
        Self {
            command: CommandLine::Line(line.into()),
            ..Default::default()
        }
    }

    #[cfg(test)]
    pub fn shell(mut self) -> Self {
        self.shell = true;
        self
    }

    pub fn streamed(mut self) -> Self {
        self.stream = true;
        self
    }

    pub fn elevated(mut self) -> Self {
        self.elevate = true;
        self
    }

    pub fn announce(mut self, message: impl Into<String>) -> Self {
        self.announce = Some(message.into());
        self
    }

    #[cfg(test)]
    pub fn print_stdout(mut self) -> Self {
        self.print_stdout = true;
        self
    }

    #[cfg(test)]
    pub fn print_stderr(mut self) -> Self {
        self.print_stderr = true;
        self
    }
}

/// Outcome of one executed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    /// The fixed result for a command that could not be started.
    pub fn spawn_failure() -> Self {
        Self {
            stdout: String::new(),
            stderr: SPAWN_FAILURE_MESSAGE.to_string(),
            exit_code: SPAWN_FAILURE_CODE,
        }
    }

    pub fn from_output(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: exit_code(output.status),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Maps an exit status to an integer code. Signal deaths become `128 + signal`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    SPAWN_FAILURE_CODE
}

/// A command normalized for spawning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Invocation {
    Shell(String),
    Direct { program: String, args: Vec<String> },
}

impl Invocation {
    /// Joins tokens into a line for shell mode, or splits a line on whitespace
    /// for direct mode. Returns `None` for an empty command.
    pub(crate) fn normalize(command: &CommandLine, shell: bool) -> Option<Self> {
        if command.is_empty() {
            return None;
        }
        if shell {
            let line = match command {
                CommandLine::Argv(tokens) => tokens.join(" "),
                #[cfg(test)]
                CommandLine::Line(line) => line.clone(),
            };
            return Some(Invocation::Shell(line));
        }
        let mut tokens: Vec<String> = match command {
            CommandLine::Argv(tokens) => tokens.clone(),
            #[cfg(test)]
            CommandLine::Line(line) => line.split_whitespace().map(str::to_string).collect(),
        };
        let program = tokens.remove(0);
        Some(Invocation::Direct {
            program,
            args: tokens,
        })
    }

    /// Builds a tokio command with both output streams piped.
    pub(crate) fn command(&self) -> Command {
        let mut command = match self {
            Invocation::Shell(line) => {
                let mut command = Command::new("sh");
                command.arg("-c").arg(line);
                command
            }
            Invocation::Direct { program, args } => {
                let mut command = Command::new(program);
                command.args(args);
                command
            }
        };
        command.stdout(Stdio::piped()).stderr(Stdio::piped());
        command
    }
}
