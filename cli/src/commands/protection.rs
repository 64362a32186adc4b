//! # cpuname Protection Gate
//!
//! File: cli/src/commands/protection.rs
//!
//! ## Overview
//!
//! Before any operation touches the strings resource, the System Integrity
//! Protection (SIP) posture is checked with `csrutil status` (configurable).
//! The first line of its output is classified:
//!
//! | Status line starts with                                             | State               |
//! |---------------------------------------------------------------------|---------------------|
//! | `System Integrity Protection status: disabled.`                     | `Disabled`          |
//! | `System Integrity Protection status: enabled (Custom Configuration).` | `PartiallyDisabled` |
//! | `System Integrity Protection status: enabled.`                      | `Enabled`           |
//! | anything else                                                       | `Unknown`           |
//!
//! `Disabled` proceeds silently. `PartiallyDisabled` proceeds silently only if
//! the output also reports both `Filesystem Protections: disabled` and
//! `Kext Signing: disabled`; otherwise, like `Enabled`, the operator is warned
//! and asked whether to continue. An empty or unrecognized answer re-runs the
//! status query and asks again. `Unknown` follows the configured
//! `protection.on_unknown` policy.
//!
//! Once the gate has said "proceed", the session remembers it and later
//! operations skip the check.
//!
use crate::common::process::CommandSpec;
use crate::core::config::UnknownProtectionPolicy;
use crate::core::error::Result;
use crate::core::session::Session;
use tracing::{debug, info};

const STATUS_PREFIX: &str = "System Integrity Protection status:";
const DISABLED: &str = "System Integrity Protection status: disabled.";
const CUSTOM: &str = "System Integrity Protection status: enabled (Custom Configuration).";
const ENABLED: &str = "System Integrity Protection status: enabled.";
const FS_DISABLED: &str = "Filesystem Protections: disabled";
const KEXT_DISABLED: &str = "Kext Signing: disabled";

/// SIP posture parsed from the status output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectionState {
    Disabled,
    PartiallyDisabled,
    Enabled,
    Unknown,
}

impl ProtectionState {
    /// Classifies the first line of `output`.
    pub fn classify(output: &str) -> Self {
        let line = output.lines().next().unwrap_or_default().trim_end();
        if !line.starts_with(STATUS_PREFIX) {
            ProtectionState::Unknown
        } else if line.starts_with(DISABLED) {
            ProtectionState::Disabled
        } else if line.starts_with(CUSTOM) {
            ProtectionState::PartiallyDisabled
        } else if line.starts_with(ENABLED) {
            ProtectionState::Enabled
        } else {
            ProtectionState::Unknown
        }
    }
}

/// Whether a custom configuration has the two protections this tool needs off.
fn required_protections_disabled(output: &str) -> bool {
    output.contains(FS_DISABLED) && output.contains(KEXT_DISABLED)
}

/// What the gate concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Abort,
    /// The status could not be classified and the policy did not ask.
    Undetermined,
}

/// Queries the protection status, prompting the operator when needed.
pub async fn query(session: &mut Session) -> Result<GateDecision> {
    let policy = session.config().protection.on_unknown;
    loop {
        let status_command = session.config().protection.status_command.clone();
        let batch = session
            .run(&[CommandSpec::argv(status_command).streamed()], false)
            .await?;
        let output = batch.single().map(|r| r.stdout.clone()).unwrap_or_default();
        let state = ProtectionState::classify(&output);
        info!("Protection state: {:?}", state);

        let (title, message) = match state {
            ProtectionState::Disabled => return Ok(GateDecision::Proceed),
            ProtectionState::PartiallyDisabled if required_protections_disabled(&output) => {
                return Ok(GateDecision::Proceed)
            }
            ProtectionState::PartiallyDisabled => (
                "Partially Disabled",
                "SIP is only partially disabled!\nKext signing and/or fs protection are enabled!\n",
            ),
            ProtectionState::Enabled => (
                "Enabled",
                "System Integrity Protection is completely enabled!\n",
            ),
            ProtectionState::Unknown => match policy {
                UnknownProtectionPolicy::Prompt => ("Unknown", "Unknown SIP Configuration!\n"),
                UnknownProtectionPolicy::Proceed | UnknownProtectionPolicy::Abort => {
                    return Ok(GateDecision::Undetermined)
                }
            },
        };

        session.header(&format!("SIP Is {}", title))?;
        session.say(" ")?;
        session.say(message)?;
        session.say("This may prevent this tool's changes.")?;
        session.say(" ")?;
        let answer = session.prompt("Would you like to continue? (y/n):  ")?;
        match answer.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('y') => return Ok(GateDecision::Proceed),
            Some('n') => return Ok(GateDecision::Abort),
            _ => debug!("Unrecognized answer {:?}; checking status again.", answer),
        }
    }
}

/// True if mutations may go ahead, asking at most once per session.
pub async fn ensure_cleared(session: &mut Session) -> Result<bool> {
    if session.protection_cleared() {
        return Ok(true);
    }
    let proceed = match query(session).await? {
        GateDecision::Proceed => true,
        GateDecision::Abort => false,
        GateDecision::Undetermined => {
            session.config().protection.on_unknown != UnknownProtectionPolicy::Abort
        }
    };
    if proceed {
        session.mark_protection_cleared();
    }
    Ok(proceed)
}
