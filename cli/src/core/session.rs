//! # cpuname Session
//!
//! File: cli/src/core/session.rs
//!
//! ## Overview
//!
//! A `Session` carries everything one run of the tool shares between
//! operations: the loaded configuration, the current language, the batch
//! executor (with its cached escalation probe), the console, the operator
//! prompter, and whether System Integrity Protection has already been cleared.
//!
//! The protection flag starts `false` for every process and only ever flips to
//! `true`, so the operator is asked at most once per session.
//!
use crate::common::process::{BatchExecutor, BatchResult, CommandSpec, StreamingRunner};
use crate::common::resource::ResourceLocator;
use crate::common::ui::{self, Prompter};
use crate::core::config::Config;
use crate::core::error::Result;
use std::io::Write;
use std::path::PathBuf;

pub struct Session {
    config: Config,
    language: String,
    executor: BatchExecutor,
    console: Box<dyn Write + Send>,
    prompter: Box<dyn Prompter>,
    protection_cleared: bool,
    clear_screen: bool,
}

impl Session {
    pub fn new(config: Config, console: Box<dyn Write + Send>, prompter: Box<dyn Prompter>) -> Self {
        let runner = StreamingRunner::new(config.runner.poll_interval());
        let executor = BatchExecutor::new(runner, config.escalation.clone());
        let language = config.resources.language.clone();
        Self {
            config,
            language,
            executor,
            console,
            prompter,
            protection_cleared: false,
            clear_screen: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// Clear the screen before each header (interactive menu only).
    pub fn set_clear_screen(&mut self, clear: bool) {
        self.clear_screen = clear;
    }

    pub fn locator(&self) -> ResourceLocator {
        ResourceLocator::from_config(&self.config.resources)
    }

    /// Strings resource path for the current language.
    pub fn strings_path(&self) -> Option<PathBuf> {
        self.locator().strings_path(&self.language)
    }

    pub fn protection_cleared(&self) -> bool {
        self.protection_cleared
    }

    pub(crate) fn mark_protection_cleared(&mut self) {
        self.protection_cleared = true;
    }

    /// Runs a batch through the session's executor, echoing to the console.
    pub async fn run(&mut self, specs: &[CommandSpec], fail_fast: bool) -> Result<BatchResult> {
        self.executor.run(specs, fail_fast, &mut *self.console).await
    }

    /// Prints one line to the console.
    pub fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.console, "{}", text.as_ref())?;
        Ok(())
    }

    pub fn header(&mut self, title: &str) -> Result<()> {
        let width = self.config.menu.header_width;
        ui::draw_header(&mut *self.console, title, width, self.clear_screen)?;
        Ok(())
    }

    pub fn prompt(&mut self, message: &str) -> Result<String> {
        self.prompter.prompt(&mut *self.console, message)
    }
}
