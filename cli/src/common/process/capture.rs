//! # Capture-Only Execution (`common::process::capture`)
//!
//! File: cli/src/common/process/capture.rs
//!
//! Runs a command to completion with both streams captured and nothing echoed.
//!
use super::{CommandLine, CommandResult, Invocation};
use tracing::debug;

/// Runs `command` and returns its full output.
///
/// A command that cannot be started yields `CommandResult::spawn_failure()`.
pub async fn run_captured(command: &CommandLine, shell: bool) -> CommandResult {
    let Some(invocation) = Invocation::normalize(command, shell) else {
        return CommandResult::spawn_failure();
    };
    debug!("Running (capture): {:?}", invocation);
    match invocation.command().output().await {
        Ok(output) => CommandResult::from_output(output),
        Err(e) => {
            debug!("Failed to start '{}': {}", command.display(), e);
            CommandResult::spawn_failure()
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_capture_stub_brand_string() -> crate::core::error::Result<()> {
        // Stand-in for `sysctl -n machdep.cpu.brand_string`.
        let dir = tempdir()?;
        let stub = dir.path().join("sysctl");
        fs::write(&stub, "printf 'Stub CPU Model\\n'\n")?;

        let command = CommandLine::Argv(vec![
            "sh".into(),
            stub.to_string_lossy().into_owned(),
            "-n".into(),
            "machdep.cpu.brand_string".into(),
        ]);
        let result = run_captured(&command, false).await;
        assert_eq!(
            result,
            CommandResult {
                stdout: "Stub CPU Model\n".into(),
                stderr: String::new(),
                exit_code: 0,
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_capture_missing_executable() {
        let command = CommandLine::Argv(vec!["cpuname-no-such-binary-xyz".into()]);
        assert_eq!(run_captured(&command, false).await, CommandResult::spawn_failure());
    }

    #[tokio::test]
    async fn test_capture_shell_line_with_exit_code() {
        let command = CommandLine::Line("printf oops >&2; exit 4".into());
        let result = run_captured(&command, true).await;
        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, "oops");
        assert_eq!(result.exit_code, 4);
    }
}
