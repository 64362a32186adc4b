//! # cpuname Resource Files (`common::resource`)
//!
//! File: cli/src/common/resource/mod.rs
//!
//! ## Overview
//!
//! The localized strings resource is a property list stored at
//! `<directory>/<Language>.lproj/<file_name>`. This module finds it for a given
//! language (`lproj`) and reads, patches and writes it (`strings`).
//!
//! The backup lives next to the resource at `<resource>.bak`. It is created at
//! most once per edit cycle and is the only source for restore and delete.
//!
pub mod lproj;
pub mod strings;

pub use lproj::ResourceLocator;
pub use strings::StringsFile;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Sibling backup path: the resource path with `.bak` appended.
pub fn backup_path(resource: &Path) -> PathBuf {
    let mut name = OsString::from(resource.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path(Path::new("/R/English.lproj/AppleSystemInfo.strings")),
            PathBuf::from("/R/English.lproj/AppleSystemInfo.strings.bak")
        );
    }
}
