//! # Streaming Runner (`common::process::stream`)
//!
//! File: cli/src/common/process/stream.rs
//!
//! ## Overview
//!
//! Runs one command while echoing its stdout and stderr to a console writer as
//! the bytes arrive, and accumulates both streams for the caller.
//!
//! ## Architecture
//!
//! 1. Normalize the command (shell line vs. argument vector).
//! 2. Spawn with both streams piped.
//! 3. Start one `OutputPump` per pipe.
//! 4. Busy-poll: take at most one byte from each channel without blocking,
//!    append and echo it, then poll the child for exit. Leave the loop only on
//!    an iteration where neither channel produced a byte *and* the child has
//!    exited.
//! 5. Wait for both pumps to reach end-of-file and append whatever they still
//!    delivered.
//! 6. Return `(stdout, stderr, exit code)`.
//!
//! The relative order of stdout and stderr bytes on the console is best effort;
//! within each stream, order is preserved.
//!
use super::pump::PumpSet;
use super::{exit_code, CommandLine, CommandResult, Invocation, SPAWN_FAILURE_CODE};
use std::io::{self, Write};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

/// Executes commands with live output.
#[derive(Debug, Clone)]
pub struct StreamingRunner {
    poll_interval: Duration,
}

impl Default for StreamingRunner {
    fn default() -> Self {
        Self::new(Duration::from_millis(1))
    }
}

/// Bytes collected so far from one command.
#[derive(Default)]
struct Accumulated {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

fn pull(channel: &mut Option<UnboundedReceiver<u8>>) -> Option<u8> {
    channel.as_mut()?.try_recv().ok()
}

impl StreamingRunner {
    /// `poll_interval` is slept on idle iterations of the output loop.
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Runs `command`, echoing both streams to `echo`.
    ///
    /// Never returns an error: a command that cannot be started yields
    /// `CommandResult::spawn_failure()`, and a failure after spawning returns the
    /// output gathered so far with the last known exit code.
    pub async fn run<W>(&self, command: &CommandLine, shell: bool, echo: &mut W) -> CommandResult
    where
        W: Write + ?Sized,
    {
        let Some(invocation) = Invocation::normalize(command, shell) else {
            return CommandResult::spawn_failure();
        };
        debug!("Running (stream): {:?}", invocation);

        let mut child = match invocation.command().stdin(Stdio::inherit()).spawn() {
            Ok(child) => child,
            Err(e) => {
                debug!("Failed to start '{}': {}", command.display(), e);
                return CommandResult::spawn_failure();
            }
        };

        let mut pumps = PumpSet::default();
        let mut stdout_rx = child.stdout.take().map(|pipe| pumps.spawn(pipe, "stdout"));
        let mut stderr_rx = child.stderr.take().map(|pipe| pumps.spawn(pipe, "stderr"));

        let mut acc = Accumulated::default();
        let mut status: Option<ExitStatus> = None;

        let streamed: io::Result<()> = async {
            loop {
                let out = pull(&mut stdout_rx);
                let err = pull(&mut stderr_rx);
                if let Some(byte) = out {
                    acc.stdout.push(byte);
                    echo.write_all(&[byte])?;
                }
                if let Some(byte) = err {
                    acc.stderr.push(byte);
                    echo.write_all(&[byte])?;
                }
                echo.flush()?;

                if status.is_none() {
                    status = child.try_wait()?;
                }
                if out.is_none() && err.is_none() {
                    if status.is_some() {
                        break;
                    }
                    tokio::time::sleep(self.poll_interval).await;
                }
            }

            // Residual bytes the pumps had not delivered when the loop ended.
            pumps.finish().await;
            let mut residual = Vec::new();
            while let Some(byte) = pull(&mut stdout_rx) {
                acc.stdout.push(byte);
                residual.push(byte);
            }
            while let Some(byte) = pull(&mut stderr_rx) {
                acc.stderr.push(byte);
                residual.push(byte);
            }
            echo.write_all(&residual)?;
            echo.flush()
        }
        .await;

        if let Err(e) = streamed {
            warn!("Streaming '{}' failed: {}", command.display(), e);
        }
        // Dropping the set aborts any pump still running on the failure path.
        drop(pumps);

        CommandResult {
            stdout: String::from_utf8_lossy(&acc.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&acc.stderr).into_owned(),
            exit_code: status.map(exit_code).unwrap_or(SPAWN_FAILURE_CODE),
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::capture::run_captured;

    fn sh(line: &str) -> CommandLine {
        CommandLine::Line(line.to_string())
    }

    #[tokio::test]
    async fn test_streams_and_accumulates_both_pipes() {
        let runner = StreamingRunner::default();
        let mut console = Vec::new();
        let result = runner
            .run(&sh("printf out; printf err >&2; exit 3"), true, &mut console)
            .await;

        assert_eq!(result.stdout, "out");
        assert_eq!(result.stderr, "err");
        assert_eq!(result.exit_code, 3);
        // Both streams reach the console; their interleaving is not fixed.
        let echoed = String::from_utf8(console).unwrap();
        assert_eq!(echoed.len(), 6);
        assert!(echoed.contains('o') && echoed.contains('e'));
    }

    #[tokio::test]
    async fn test_no_output_lost_after_exit() {
        let runner = StreamingRunner::default();
        let mut console = Vec::new();
        let script = "i=0; while [ $i -lt 2000 ]; do echo line$i; i=$((i+1)); done";
        let result = runner.run(&sh(script), true, &mut console).await;

        assert!(result.success());
        assert_eq!(result.stdout.lines().count(), 2000);
        assert!(result.stdout.ends_with("line1999\n"));
        assert_eq!(console, result.stdout.as_bytes());
    }

    #[tokio::test]
    async fn test_matches_capture_only_output() {
        let runner = StreamingRunner::default();
        let command = sh("printf 'a\\nb'; printf 'warn\\n' >&2; exit 0");
        let streamed = runner.run(&command, true, &mut std::io::sink()).await;
        let captured = run_captured(&command, true).await;
        assert_eq!(streamed, captured);
    }

    #[tokio::test]
    async fn test_missing_executable_is_spawn_failure() {
        let runner = StreamingRunner::default();
        let command = CommandLine::Argv(vec!["cpuname-no-such-binary-xyz".into()]);
        let mut console = Vec::new();
        let result = runner.run(&command, false, &mut console).await;
        assert_eq!(result, CommandResult::spawn_failure());
        assert!(console.is_empty());
    }

    /// A console that rejects every write.
    struct BrokenConsole;

    impl Write for BrokenConsole {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "console closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_echo_failure_returns_partial_output_promptly() {
        let runner = StreamingRunner::default();
        let started = std::time::Instant::now();
        let result = runner
            .run(&sh("printf abc; sleep 2; exit 0"), true, &mut BrokenConsole)
            .await;

        // The first byte is kept, the child is not waited for, and the pumps
        // are stopped instead of reading until the child exits.
        assert_eq!(result.stdout, "a");
        assert_eq!(result.stderr, "");
        assert_eq!(result.exit_code, SPAWN_FAILURE_CODE);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_argv_tokens_run_without_shell() {
        let runner = StreamingRunner::default();
        let command = CommandLine::Argv(vec!["printf".into(), "%s|%s".into(), "a b".into(), "c".into()]);
        let result = runner.run(&command, false, &mut std::io::sink()).await;
        assert_eq!(result.stdout, "a b|c");
    }
}
