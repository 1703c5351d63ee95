//! Platform-specific operation traits
//!
//! These traits define the interface for platform-specific operations,
//! allowing for clean abstraction and easier testing.

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Read-only filesystem access used by color resolution
pub trait FilesystemOps: Send + Sync {
    /// Check if a regular file exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Read the whole file as UTF-8 text
    fn read_text(&self, path: &Path) -> Result<String>;
}

/// Platform-specific path operations
pub trait PathOps: Send + Sync {
    /// Get configuration directory (where `tintbar/config.toml` lives)
    fn config_dir(&self) -> Result<PathBuf>;

    /// Get the editor's user settings directory (`.../Code/User`)
    fn host_settings_dir(&self) -> Result<PathBuf>;
}
