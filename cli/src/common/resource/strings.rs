//! # Strings Property List (`common::resource::strings`)
//!
//! File: cli/src/common/resource/strings.rs
//!
//! ## Overview
//!
//! Wraps the top-level dictionary of a `.strings` property list. Reading
//! accepts any format the `plist` crate understands (XML or binary); writing
//! always produces XML.
//!
use crate::core::error::{CpuNameError, Result};
use plist::{Dictionary, Value};
use std::path::Path;
use tracing::debug;

/// In-memory copy of a strings resource.
#[derive(Debug, Clone, Default)]
pub struct StringsFile {
    entries: Dictionary,
}

impl StringsFile {
    /// Reads `path`, failing with `UnreadableResource` if it is missing, malformed,
    /// or not a dictionary.
    pub fn load(path: &Path) -> Result<Self> {
        let unreadable = |reason: String| CpuNameError::UnreadableResource {
            path: path.to_path_buf(),
            reason,
        };
        let value = Value::from_file(path).map_err(|e| unreadable(e.to_string()))?;
        let entries = value
            .into_dictionary()
            .ok_or_else(|| unreadable("top level is not a dictionary".to_string()))?;
        debug!("Loaded {} entries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    /// String value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_string)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.entries
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    /// Writes the dictionary to `path` as an XML property list.
    pub fn save(&self, path: &Path) -> Result<()> {
        Value::Dictionary(self.entries.clone())
            .to_file_xml(path)
            .map_err(|e| {
                CpuNameError::ResourceWrite(format!("{}: {}", path.display(), e)).into()
            })
    }
}
