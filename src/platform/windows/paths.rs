//! Windows path operations

use crate::error::{Error, Result};
use crate::platform::traits::PathOps;
use std::path::PathBuf;

pub struct WindowsPaths;

impl WindowsPaths {
    pub fn new() -> Self {
        Self
    }
}

impl PathOps for WindowsPaths {
    fn config_dir(&self) -> Result<PathBuf> {
        // Use AppData\Roaming on Windows
        dirs::config_dir().ok_or_else(|| Error::DirectoryNotFound {
            kind: "config".to_string(),
        })
    }

    fn host_settings_dir(&self) -> Result<PathBuf> {
        Ok(self.config_dir()?.join("Code").join("User"))
    }
}
