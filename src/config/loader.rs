//! Configuration File Loading
//!
//! Handles loading and saving the user-level configuration file. The file is
//! always global: rules added from any workspace land in the same place.

use super::Config;
use crate::error::{Error, Result};
use crate::pattern::MatchStrategy;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file loader
pub struct ConfigLoader {
    /// Search paths for configuration files (without extension)
    search_paths: Vec<PathBuf>,
    /// Supported configuration file formats
    supported_formats: Vec<ConfigFormat>,
    /// Explicit file given on the command line
    explicit_path: Option<PathBuf>,
    /// Current configuration file path (if loaded)
    current_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }

    fn name(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }

    /// Format implied by a file extension, TOML when unknown
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether to fall back to defaults if no file exists
    pub create_default: bool,
    /// Whether to validate configuration after loading
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            create_default: true,
            validate: true,
        }
    }
}

impl ConfigLoader {
    /// Create a loader that searches the default locations
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
            supported_formats: vec![ConfigFormat::Toml, ConfigFormat::Json],
            explicit_path: None,
            current_path: None,
        }
    }

    /// Create a loader bound to one file
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: Vec::new(),
            supported_formats: vec![ConfigFormat::from_path(&path)],
            explicit_path: Some(path),
            current_path: None,
        }
    }

    /// Load configuration with default options
    pub fn load(&mut self) -> Result<Config> {
        self.load_with_options(LoadOptions::default())
    }

    /// Load configuration with custom options
    pub fn load_with_options(&mut self, options: LoadOptions) -> Result<Config> {
        if let Some((path, config)) = self.find_and_load_config()? {
            debug!("Loaded configuration from {}", path.display());
            self.current_path = Some(path);

            if options.validate {
                self.validate_config(&config)?;
            }

            return Ok(config);
        }

        if options.create_default {
            debug!("No configuration file found, using defaults");
            Ok(Config::default())
        } else {
            Err(Error::ConfigLoadFailed {
                path: self.config_path(),
                reason: "Configuration file does not exist".to_string(),
            })
        }
    }

    /// Save configuration to the current path or default location
    ///
    /// An existing file that no longer parses is left alone and reported as
    /// [`Error::ConfigSaveFailed`].
    pub fn save(&self, config: &Config) -> Result<PathBuf> {
        let path = self.config_path();
        if path.exists() {
            if let Err(e) = self.load_config_file(&path, ConfigFormat::from_path(&path)) {
                return Err(Error::ConfigSaveFailed {
                    path,
                    reason: format!("existing file is not a valid configuration ({})", e),
                });
            }
        }
        self.save_to_path(config, &path)?;
        info!("Saved configuration to {}", path.display());
        Ok(path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::ConfigSaveFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let format = ConfigFormat::from_path(path);
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                }
            })?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| Error::ConfigSerializationFailed {
                    format: format.name().to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        fs::write(path, content).map_err(|e| Error::ConfigSaveFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Path the configuration was loaded from, or where it would be saved
    pub fn config_path(&self) -> PathBuf {
        self.current_path
            .clone()
            .or_else(|| self.explicit_path.clone())
            .unwrap_or_else(Self::get_default_config_path)
    }

    /// Find and load configuration from search paths
    fn find_and_load_config(&self) -> Result<Option<(PathBuf, Config)>> {
        if let Some(path) = &self.explicit_path {
            if !path.exists() {
                return Ok(None);
            }
            let config = self.load_config_file(path, ConfigFormat::from_path(path))?;
            return Ok(Some((path.clone(), config)));
        }

        for path in &self.search_paths {
            for format in &self.supported_formats {
                let config_path = path.with_extension(format.extension());

                if config_path.exists() {
                    // An existing file that fails to parse is an error, never defaults
                    let config = self.load_config_file(&config_path, *format)?;
                    return Ok(Some((config_path, config)));
                }
            }
        }

        Ok(None)
    }

    /// Load a specific configuration file
    fn load_config_file(&self, path: &Path, format: ConfigFormat) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let parse_failed = |reason: String| Error::ConfigParseFailed {
            format: format.name().to_string(),
            reason: format!("{}: {}", path.display(), reason),
        };

        match format {
            ConfigFormat::Toml => toml::from_str(&content).map_err(|e| parse_failed(e.to_string())),
            ConfigFormat::Json => {
                serde_json::from_str(&content).map_err(|e| parse_failed(e.to_string()))
            }
        }
    }

    /// Get default search paths for configuration files
    fn get_search_paths() -> Vec<PathBuf> {
        use crate::platform::Platform;

        let mut paths = Vec::new();
        let path_ops = Platform::paths();

        if let Ok(config_dir) = path_ops.config_dir() {
            paths.push(config_dir.join("tintbar").join("config"));
        }

        // XDG config home fallback (for platforms that might set it)
        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_config).join("tintbar").join("config"));
        }

        // Home directory fallbacks
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("tintbar").join("config"));
            paths.push(home.join(".tintbar").join("config"));
        }

        paths.dedup();
        paths
    }

    /// Get the default configuration path
    fn get_default_config_path() -> PathBuf {
        use crate::platform::Platform;

        Platform::paths()
            .config_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("tintbar")
            .join("config.toml")
    }

    /// Validate configuration
    ///
    /// Nothing here is fatal: resolution already tolerates every bad value.
    fn validate_config(&self, config: &Config) -> Result<()> {
        if let MatchStrategy::Unknown(value) = &config.match_type {
            warn!(
                "match_type '{}' is not one of contains, exact, endsWith; path rules will not match",
                value
            );
        }

        for (pattern, _) in config.path_colors.iter() {
            if pattern.trim().is_empty() {
                warn!("path_colors contains an empty pattern");
            }
        }

        Ok(())
    }

    /// Get the current configuration file path
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// List all search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
