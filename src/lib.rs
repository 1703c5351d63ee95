//! tintbar - per-workspace title bar identity colors
//!
//! Gives every workspace window a recognizable title bar color. The color is
//! read from a marker file in the workspace root or picked from a table of
//! path patterns, then written into the editor's settings.
//!
//! ## Module Organization
//!
//! ### Resolution
//!
//! - [`color`] - Validated hex color values
//! - [`marker`] - Marker file lookup (`.project-color`, `.iterm-color`)
//! - [`pattern`] - Path rules and match strategies
//! - [`resolver`] - Marker-over-rule precedence and provenance
//! - [`rules`] - Adding path rules with validation
//! - [`diagnostics`] - Reporting of skipped inputs
//!
//! ### Plumbing
//!
//! - [`config`] - Configuration loading, saving and watching
//! - [`settings`] - Writing colors into editor settings
//! - [`service`] - Refresh / reset / add-rule actions
//! - [`platform`] - Filesystem and directory abstraction
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//! use tintbar::{ConfigLoader, TintService, Trigger};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = TintService::new(ConfigLoader::new())?;
//! let outcome = service.refresh(Trigger::Manual, &[PathBuf::from(".")])?;
//! println!("{}", outcome.status_message());
//! # Ok(())
//! # }
//! ```
//!
//! ## Precedence
//!
//! 1. The first marker file, in priority order, holding a valid color
//! 2. The first path rule, in declaration order, whose pattern matches
//! 3. Nothing: the current appearance is left unchanged

#[macro_use]
extern crate tracing;

pub mod color;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod marker;
pub mod pattern;
pub mod platform;
pub mod resolver;
pub mod rules;
pub mod service;
pub mod settings;

// Re-exports for core functionality
pub use color::HexColor;
pub use config::loader::ConfigLoader;
pub use config::watcher::WorkspaceWatcher;
pub use config::Config;
pub use error::{Error, Result};
pub use marker::{read_marker_color, MarkerFileSet};
pub use pattern::{match_path, MatchStrategy, PathColorRule, RuleSet};
pub use resolver::{ColorResolution, ColorResolver, ColorSource};
pub use rules::{add_rule, RuleError};
pub use service::{RefreshOutcome, TintService, Trigger};
pub use settings::{ApplyScope, SettingsFileWriter, SettingsSink};

/// The current version of tintbar from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The application name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");
