//! # Language Directory Lookup (`common::resource::lproj`)
//!
//! File: cli/src/common/resource/lproj.rs
//!
//! Resolves a language name such as `English`, `German.lproj` or
//! `some/path/French` to its `.lproj` directory inside the resource directory.
//! Only the final path component of the name is used.
//!
use crate::core::config::ResourcesConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Knows where the strings resource lives for any language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator {
    directory: PathBuf,
    file_name: String,
}

impl ResourceLocator {
    pub fn new(directory: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_name: file_name.into(),
        }
    }

    pub fn from_config(config: &ResourcesConfig) -> Self {
        Self::new(&config.directory, &config.file_name)
    }

    /// The language directory, trying `<name>` first and then `<name>.lproj`.
    pub fn lproj_dir(&self, language: &str) -> Option<PathBuf> {
        let name = Path::new(language.trim()).file_name()?.to_string_lossy().into_owned();

        let exact = self.directory.join(&name);
        if exact.is_dir() {
            return Some(exact);
        }
        let suffixed = self.directory.join(format!("{}.lproj", name));
        if suffixed.is_dir() {
            return Some(suffixed);
        }
        debug!("No lproj directory for '{}' in {}", language, self.directory.display());
        None
    }

    /// Full path of the strings resource for `language`.
    pub fn strings_path(&self, language: &str) -> Option<PathBuf> {
        self.lproj_dir(language).map(|dir| dir.join(&self.file_name))
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_resolves_with_and_without_suffix() -> crate::core::error::Result<()> {
        let root = tempdir()?;
        fs::create_dir(root.path().join("English.lproj"))?;
        fs::create_dir(root.path().join("Base"))?;
        let locator = ResourceLocator::new(root.path(), "AppleSystemInfo.strings");

        let english = root.path().join("English.lproj");
        assert_eq!(locator.lproj_dir("English"), Some(english.clone()));
        assert_eq!(locator.lproj_dir("English.lproj"), Some(english.clone()));
        assert_eq!(locator.lproj_dir("/elsewhere/English/"), Some(english.clone()));
        assert_eq!(locator.lproj_dir("Base"), Some(root.path().join("Base")));
        assert_eq!(
            locator.strings_path("English"),
            Some(english.join("AppleSystemInfo.strings"))
        );
        Ok(())
    }

    #[test]
    fn test_missing_language_is_none() -> crate::core::error::Result<()> {
        let root = tempdir()?;
        // A plain file with the right name is not a language directory.
        fs::write(root.path().join("German.lproj"), "")?;
        let locator = ResourceLocator::new(root.path(), "AppleSystemInfo.strings");
        assert_eq!(locator.lproj_dir("German"), None);
        assert_eq!(locator.strings_path("Klingon"), None);
        assert_eq!(locator.lproj_dir(".."), None);
        Ok(())
    }
}
