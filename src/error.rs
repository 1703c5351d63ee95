//! Error types and Result aliases for tintbar
//!
//! Only the outer layers (configuration, settings files, watching, interactive
//! rule entry) produce errors. Color resolution itself never fails: unreadable
//! or malformed inputs are folded into an absent result and reported through
//! [`crate::diagnostics`].

use std::fmt;
use std::path::PathBuf;

use crate::rules::RuleError;

/// Result type alias for tintbar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tintbar
#[derive(Debug)]
pub enum Error {
    // === Configuration errors ===
    /// Failed to load configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to save configuration file
    ConfigSaveFailed {
        path: PathBuf,
        reason: String,
    },

    /// Configuration serialization failed
    ConfigSerializationFailed {
        format: String,
        reason: String,
    },

    /// Configuration parsing failed
    ConfigParseFailed {
        format: String,
        reason: String,
    },

    // === Host settings errors ===
    /// Settings file exists but is not a JSON object we can edit
    SettingsParseFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to write the settings file
    SettingsWriteFailed {
        path: PathBuf,
        reason: String,
    },

    /// A well-known directory could not be determined
    DirectoryNotFound {
        kind: String,
    },

    // === Watcher errors ===
    /// Failed to set up file watching
    WatchFailed {
        reason: String,
    },

    // === Rule entry ===
    /// A rule was rejected before anything was stored
    RuleRejected(RuleError),

    // === I/O and serialization errors ===
    /// I/O errors
    Io(std::io::Error),

    /// JSON serialization errors
    Serde(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Configuration errors
            Error::ConfigLoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path.display(), reason)
            }
            Error::ConfigSaveFailed { path, reason } => {
                write!(f, "Failed to save config to '{}': {}", path.display(), reason)
            }
            Error::ConfigSerializationFailed { format, reason } => {
                write!(f, "Failed to serialize config as {}: {}", format, reason)
            }
            Error::ConfigParseFailed { format, reason } => {
                write!(f, "Failed to parse {} config: {}", format, reason)
            }

            // Settings errors
            Error::SettingsParseFailed { path, reason } => {
                write!(f, "Cannot edit settings file '{}': {}", path.display(), reason)
            }
            Error::SettingsWriteFailed { path, reason } => {
                write!(f, "Failed to write settings file '{}': {}", path.display(), reason)
            }
            Error::DirectoryNotFound { kind } => {
                write!(f, "Could not determine {} directory", kind)
            }

            // Watcher errors
            Error::WatchFailed { reason } => write!(f, "File watching failed: {}", reason),

            Error::RuleRejected(err) => write!(f, "Rule rejected: {}", err),

            // I/O and serialization errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Serde(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::RuleRejected(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Serde(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err)
    }
}

impl From<RuleError> for Error {
    fn from(err: RuleError) -> Self {
        Error::RuleRejected(err)
    }
}
