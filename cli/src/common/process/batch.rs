//! # Batch Execution (`common::process::batch`)
//!
//! File: cli/src/common/process/batch.rs
//!
//! ## Overview
//!
//! `BatchExecutor` runs an ordered list of `CommandSpec`s and collects one
//! `CommandResult` per executed spec. For every spec it:
//!
//! 1. prints the announce message, if any;
//! 2. skips the spec when it has no command (no result is recorded);
//! 3. prepends the privilege-escalation helper when the spec asks for it and
//!    the host has one (probed once per executor);
//! 4. runs it streamed or capture-only, printing captured output afterwards
//!    when the spec's print flags are set;
//! 5. stops the batch on a non-zero exit code when fail-fast is on.
//!
use super::capture::run_captured;
use super::{CommandResult, CommandSpec, StreamingRunner};
use crate::core::config::EscalationConfig;
use crate::core::error::Result;
use std::io::Write;
use tracing::{debug, info};

/// Results of one batch, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    results: Vec<CommandResult>,
}

impl BatchResult {
    #[cfg(test)]
    pub fn results(&self) -> &[CommandResult] {
        &self.results
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The only result, when exactly one spec was executed.
    pub fn single(&self) -> Option<&CommandResult> {
        match self.results.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&CommandResult> {
        self.results.last()
    }

    /// True when every executed command exited with 0.
    pub fn succeeded(&self) -> bool {
        self.results.iter().all(CommandResult::success)
    }

    /// Exit code of the first failing command, if any.
    pub fn first_failure(&self) -> Option<i32> {
        self.results
            .iter()
            .find(|result| !result.success())
            .map(|result| result.exit_code)
    }
}

/// Runs command batches for one session.
#[derive(Debug, Clone)]
pub struct BatchExecutor {
    runner: StreamingRunner,
    escalation: EscalationConfig,
    /// Cached outcome of the escalation probe.
    helper_available: Option<bool>,
}

impl BatchExecutor {
    pub fn new(runner: StreamingRunner, escalation: EscalationConfig) -> Self {
        Self {
            runner,
            escalation,
            helper_available: None,
        }
    }

    /// Runs `specs` in order, writing announcements and live output to `console`.
    ///
    /// Only console write failures produce `Err`; command failures are recorded
    /// in the returned `BatchResult`.
    pub async fn run<W>(
        &mut self,
        specs: &[CommandSpec],
        fail_fast: bool,
        console: &mut W,
    ) -> Result<BatchResult>
    where
        W: Write + ?Sized,
    {
        let mut batch = BatchResult::default();
        for spec in specs {
            if let Some(message) = &spec.announce {
                writeln!(console, "{}", message)?;
                console.flush()?;
            }
            if spec.command.is_empty() {
                debug!("Skipping empty command spec.");
                continue;
            }

            let mut command = spec.command.clone();
            if spec.elevate {
                if let Some(helper) = self.escalation_helper().await {
                    command.prepend(&helper);
                }
            }

            let result = if spec.stream {
                self.runner.run(&command, spec.shell, &mut *console).await
            } else {
                let result = run_captured(&command, spec.shell).await;
                if spec.print_stdout && !result.stdout.is_empty() {
                    writeln!(console, "{}", result.stdout)?;
                }
                if spec.print_stderr && !result.stderr.is_empty() {
                    writeln!(console, "{}", result.stderr)?;
                }
                result
            };
            info!(
                "'{}' exited with status {}",
                command.display(),
                result.exit_code
            );

            let failed = !result.success();
            batch.results.push(result);
            if fail_fast && failed {
                debug!("Stopping batch after first failure.");
                break;
            }
        }
        Ok(batch)
    }

    /// The helper to prepend, if escalation is enabled and the probe finds it.
    async fn escalation_helper(&mut self) -> Option<String> {
        if !self.escalation.enabled {
            return None;
        }
        let available = match self.helper_available {
            Some(available) => available,
            None => {
                let probe = super::CommandLine::Argv(self.escalation.probe.clone());
                let result = run_captured(&probe, false).await;
                let available = result.stdout.contains(self.escalation.helper.as_str());
                debug!(
                    "Escalation helper '{}' available: {}",
                    self.escalation.helper, available
                );
                self.helper_available = Some(available);
                available
            }
        };
        available.then(|| self.escalation.helper.clone())
    }
}
