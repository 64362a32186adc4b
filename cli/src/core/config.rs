//! # cpuname Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for cpuname: loading,
//! path expansion, validation, and typed access to configuration data.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. An explicit file passed with `--config <PATH>`
//! 2. User-specific `config.toml` in the platform config directory
//!    (`~/Library/Application Support/com.CPUName.cpuname/` on macOS)
//! 3. Default values defined in the code
//!
//! The first source found is used as a whole; missing fields fall back to
//! their defaults through serde.
//!
//! ## Examples
//!
//! ```toml
//! [resources]
//! language = "German"
//!
//! [protection]
//! on_unknown = "prompt"
//!
//! [escalation]
//! enabled = false
//! ```
//!
//! The configuration is loaded once per run and handed to the `Session`.
//!
use crate::core::error::{CpuNameError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub resources: ResourcesConfig,
    #[serde(default)]
    pub protection: ProtectionConfig,
    #[serde(default)]
    pub escalation: EscalationConfig,
    #[serde(default)]
    pub runner: RunnerConfig,
    #[serde(default)]
    pub hardware: HardwareConfig,
    #[serde(default)]
    pub menu: MenuConfig,
}

/// Where the localized strings resource lives and which key holds the CPU name.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ResourcesConfig {
    /// Directory containing the `<Language>.lproj` folders (can use ~).
    #[serde(default = "default_resource_dir")]
    pub directory: String,
    /// Language name, with or without the `.lproj` suffix.
    #[serde(default = "default_language")]
    pub language: String,
    /// Name of the strings file inside the `.lproj` directory.
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Property-list key that holds the displayed CPU name.
    #[serde(default = "default_key")]
    pub key: String,
}

/// What to do when the protection status line cannot be classified.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UnknownProtectionPolicy {
    /// Treat an unrecognized status as permission to continue.
    #[default]
    Proceed,
    /// Ask the operator, exactly as for an enabled posture.
    Prompt,
    /// Refuse to mutate anything.
    Abort,
}

/// System Integrity Protection query settings.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProtectionConfig {
    /// Command whose first output line reports the protection status.
    #[serde(default = "default_status_command")]
    pub status_command: Vec<String>,
    #[serde(default)]
    pub on_unknown: UnknownProtectionPolicy,
}

/// Privilege escalation for commands that touch system files.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EscalationConfig {
    /// When false, elevated commands run as the current user.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Program prepended to elevated commands.
    #[serde(default = "default_helper")]
    pub helper: String,
    /// Lookup command; the helper is used only if its stdout names the helper.
    #[serde(default = "default_probe")]
    pub probe: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// Sleep between idle iterations of the live-output loop.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HardwareConfig {
    /// Command printing the processor brand string.
    #[serde(default = "default_brand_command")]
    pub brand_command: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MenuConfig {
    /// Pause after each menu action so the operator can read the output.
    #[serde(default = "default_pause_secs")]
    pub pause_secs: u64,
    #[serde(default = "default_header_width")]
    pub header_width: usize,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            directory: default_resource_dir(),
            language: default_language(),
            file_name: default_file_name(),
            key: default_key(),
        }
    }
}

impl Default for ProtectionConfig {
    fn default() -> Self {
        Self {
            status_command: default_status_command(),
            on_unknown: UnknownProtectionPolicy::default(),
        }
    }
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            helper: default_helper(),
            probe: default_probe(),
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            brand_command: default_brand_command(),
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            pause_secs: default_pause_secs(),
            header_width: default_header_width(),
        }
    }
}

impl RunnerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl MenuConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs)
    }
}

fn default_resource_dir() -> String {
    "/System/Library/PrivateFrameworks/AppleSystemInfo.framework/Versions/A/Resources/".to_string()
}
fn default_language() -> String {
    "English".to_string()
}
fn default_file_name() -> String {
    "AppleSystemInfo.strings".to_string()
}
fn default_key() -> String {
    "UnknownCPUKind".to_string()
}
fn default_status_command() -> Vec<String> {
    vec!["csrutil".to_string(), "status".to_string()]
}
fn default_true() -> bool {
    true
}
fn default_helper() -> String {
    "sudo".to_string()
}
fn default_probe() -> Vec<String> {
    vec!["which".to_string(), "sudo".to_string()]
}
fn default_poll_interval_ms() -> u64 {
    1
}
fn default_brand_command() -> Vec<String> {
    ["sysctl", "-n", "machdep.cpu.brand_string"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_pause_secs() -> u64 {
    5
}
fn default_header_width() -> usize {
    50
}

/// Loads the configuration, preferring `explicit` when given.
///
/// An explicit path that does not exist is an error; a missing user config
/// silently falls back to defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?
        }
        None => load_user_config()?.unwrap_or_default(),
    };
    expand_config_paths(&mut config);
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "CPUName", "cpuname").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn load_user_config() -> Result<Option<Config>> {
    match user_config_path() {
        Some(path) if path.is_file() => {
            info!("Loading user configuration from: {}", path.display());
            load_config_from_path(&path).map(Some)
        }
        Some(path) => {
            debug!("User configuration file not found at {}", path.display());
            Ok(None)
        }
        None => {
            debug!("Could not determine user config directory.");
            Ok(None)
        }
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn expand_config_paths(config: &mut Config) {
    config.resources.directory = shellexpand::tilde(&config.resources.directory).into_owned();
    debug!("Expanded resource directory: {}", config.resources.directory);
}

fn validate_config(config: &Config) -> Result<()> {
    let non_empty = |cmd: &[String], name: &str| -> Result<()> {
        if cmd.iter().all(|token| token.trim().is_empty()) {
            return Err(anyhow!(CpuNameError::Config(format!(
                "'{}' must name a command.",
                name
            ))));
        }
        Ok(())
    };
    non_empty(&config.protection.status_command, "protection.status_command")?;
    non_empty(&config.hardware.brand_command, "hardware.brand_command")?;
    if config.escalation.enabled {
        non_empty(&config.escalation.probe, "escalation.probe")?;
        if config.escalation.helper.trim().is_empty() {
            return Err(anyhow!(CpuNameError::Config(
                "'escalation.helper' cannot be empty while escalation is enabled.".to_string()
            )));
        }
    }
    if config.resources.file_name.trim().is_empty() {
        return Err(anyhow!(CpuNameError::Config(
            "'resources.file_name' cannot be empty.".to_string()
        )));
    }
    if config.resources.key.trim().is_empty() {
        return Err(anyhow!(CpuNameError::Config(
            "'resources.key' cannot be empty.".to_string()
        )));
    }
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_partial_toml() {
        let toml_content = r#"
            [resources]
            language = "German"

            [protection]
            on_unknown = "prompt"

            [escalation]
            enabled = false
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.resources.language, "German");
        assert_eq!(config.resources.key, "UnknownCPUKind"); // Default
        assert_eq!(config.protection.on_unknown, UnknownProtectionPolicy::Prompt);
        assert_eq!(config.protection.status_command, vec!["csrutil", "status"]);
        assert!(!config.escalation.enabled);
        assert_eq!(config.escalation.helper, "sudo");
        assert_eq!(config.menu.header_width, 50);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[runner]\nthreads = 4\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config {
            resources: ResourcesConfig {
                directory: "~/strings".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        expand_config_paths(&mut config);
        let home_dir = dirs::home_dir().unwrap();
        assert_eq!(
            config.resources.directory,
            home_dir.join("strings").to_string_lossy()
        );
    }

    #[test]
    fn test_validate_rejects_empty_status_command() {
        let config = Config {
            protection: ProtectionConfig {
                status_command: vec![" ".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.unwrap_err().to_string().contains("protection.status_command"));
    }

    #[test]
    fn test_validate_allows_empty_helper_when_disabled() {
        let config = Config {
            escalation: EscalationConfig {
                enabled: false,
                helper: String::new(),
                probe: Vec::new(),
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_config_from_explicit_path() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("cpuname.toml");
        fs::write(&path, "[menu]\npause_secs = 0\n")?;
        let config = load_config(Some(&path))?;
        assert_eq!(config.menu.pause(), Duration::ZERO);
        assert_eq!(config.runner.poll_interval(), Duration::from_millis(1));
        Ok(())
    }

    #[test]
    fn test_load_config_missing_explicit_path_fails() {
        let dir = tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("absent.toml")));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read configuration file"));
    }
}
