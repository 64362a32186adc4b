//! # cpuname System Utilities (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//!
//! ## Overview
//!
//! Host checks and queries:
//!
//! - `ensure_supported_platform`: the strings resource only exists on macOS, so
//!   every command refuses to run elsewhere.
//! - `hardware_cpu_name`: the processor brand string the hardware reports
//!   (`sysctl -n machdep.cpu.brand_string` by default).
//!
use crate::common::process::{CommandResult, CommandSpec};
use crate::core::error::{CpuNameError, Result};
use crate::core::session::Session;
use tracing::debug;

/// Fails with `UnsupportedPlatform` unless running on macOS.
pub fn ensure_supported_platform() -> Result<()> {
    check_platform(std::env::consts::OS)
}

fn check_platform(os: &str) -> Result<()> {
    if os == "macos" {
        Ok(())
    } else {
        Err(CpuNameError::UnsupportedPlatform { os: os.to_string() }.into())
    }
}

/// Asks the host for its processor brand string, with newlines removed.
///
/// A failing lookup is returned as `CpuNameError::ExternalCommand`.
pub async fn hardware_cpu_name(session: &mut Session) -> Result<String> {
    let command = session.config().hardware.brand_command.clone();
    let batch = session.run(&[CommandSpec::argv(command.clone())], false).await?;
    let result = batch
        .single()
        .cloned()
        .unwrap_or_else(CommandResult::spawn_failure);

    if !result.success() {
        return Err(CpuNameError::ExternalCommand {
            cmd: command.join(" "),
            status: result.exit_code,
            output: result.stderr,
        }
        .into());
    }
    let name = result.stdout.replace('\n', "");
    debug!("Hardware CPU name: {}", name);
    Ok(name)
}
