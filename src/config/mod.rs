//! Configuration management for tintbar
//!
//! Holds the user's path rules and matching preferences, loads and saves them,
//! and watches the files that should cause a re-resolve.

pub mod loader;
pub mod watcher;

use serde::{Deserialize, Serialize};

use crate::marker::MarkerFileSet;
use crate::pattern::{MatchStrategy, RuleSet};
use crate::settings::ApplyScope;

/// Main configuration structure for tintbar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How patterns are compared against the workspace path
    pub match_type: MatchStrategy,

    /// Compare paths verbatim instead of lowercased
    pub case_sensitive: bool,

    /// Re-apply automatically on startup, file and config changes
    pub auto_apply: bool,

    /// Marker files to look for, in priority order
    pub marker_files: MarkerFileSet,

    /// Settings file that receives the color
    pub apply_scope: ApplyScope,

    /// Pattern → color, in precedence order
    pub path_colors: RuleSet,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            match_type: MatchStrategy::Contains,
            case_sensitive: false,
            auto_apply: true,
            marker_files: MarkerFileSet::ProjectAndIterm,
            apply_scope: ApplyScope::Workspace,
            path_colors: RuleSet::new(),
        }
    }
}
