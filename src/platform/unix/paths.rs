//! Unix path operations

use crate::error::{Error, Result};
use crate::platform::traits::PathOps;
use std::path::PathBuf;

pub struct UnixPaths;

impl UnixPaths {
    pub fn new() -> Self {
        Self
    }
}

impl PathOps for UnixPaths {
    fn config_dir(&self) -> Result<PathBuf> {
        // Use XDG_CONFIG_HOME if set, otherwise ~/.config
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            Ok(PathBuf::from(xdg_config))
        } else if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir)
        } else if let Some(home) = dirs::home_dir() {
            Ok(home.join(".config"))
        } else {
            Err(Error::DirectoryNotFound {
                kind: "config".to_string(),
            })
        }
    }

    fn host_settings_dir(&self) -> Result<PathBuf> {
        // The editor ignores XDG on macOS and keeps settings under Application Support
        #[cfg(target_os = "macos")]
        let base = dirs::config_dir();
        #[cfg(not(target_os = "macos"))]
        let base = self.config_dir().ok();

        base.map(|dir| dir.join("Code").join("User"))
            .ok_or_else(|| Error::DirectoryNotFound {
                kind: "editor settings".to_string(),
            })
    }
}
