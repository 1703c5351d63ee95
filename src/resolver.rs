//! Color resolution
//!
//! Decides which single color applies to a workspace. Marker files win over
//! path rules; when neither yields a color the result is [`ColorResolution::Absent`].
//!
//! Nothing here is cached. Every call reads the marker files again and works
//! from the rule set and strategy it is given, so repeated calls with the same
//! inputs and unchanged files give the same answer.

use std::fmt;
use std::path::Path;

use crate::color::HexColor;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::marker::{read_marker_color, MarkerFileSet};
use crate::pattern::{match_path, MatchStrategy, RuleSet};
use crate::platform::FilesystemOps;

/// Where a resolved color came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorSource {
    /// A marker file in the workspace root
    MarkerFile { file_name: String },
    /// A configured path rule
    PatternRule { pattern: String },
}

impl ColorSource {
    pub fn is_marker_file(&self) -> bool {
        matches!(self, ColorSource::MarkerFile { .. })
    }

    pub fn is_pattern_rule(&self) -> bool {
        matches!(self, ColorSource::PatternRule { .. })
    }
}

impl fmt::Display for ColorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSource::MarkerFile { file_name } => write!(f, "marker file {}", file_name),
            ColorSource::PatternRule { pattern } => write!(f, "path rule '{}'", pattern),
        }
    }
}

/// Outcome of resolving a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorResolution {
    Absent,
    Present { color: HexColor, source: ColorSource },
}

impl ColorResolution {
    pub fn color(&self) -> Option<&HexColor> {
        match self {
            ColorResolution::Absent => None,
            ColorResolution::Present { color, .. } => Some(color),
        }
    }

    pub fn source(&self) -> Option<&ColorSource> {
        match self {
            ColorResolution::Absent => None,
            ColorResolution::Present { source, .. } => Some(source),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, ColorResolution::Absent)
    }

    /// One-line, user-facing description including provenance
    pub fn status_message(&self) -> String {
        match self {
            ColorResolution::Absent => "No title bar color applies".to_string(),
            ColorResolution::Present { color, source } => {
                format!("Title bar color {} from {}", color, source)
            }
        }
    }
}

/// Resolves workspace colors against an injected filesystem and diagnostic sink
pub struct ColorResolver<'a> {
    filesystem: &'a dyn FilesystemOps,
    diagnostics: &'a dyn DiagnosticSink,
}

impl<'a> ColorResolver<'a> {
    pub fn new(filesystem: &'a dyn FilesystemOps, diagnostics: &'a dyn DiagnosticSink) -> Self {
        Self {
            filesystem,
            diagnostics,
        }
    }

    /// Resolve the color for `workspace`.
    ///
    /// Every marker file is tried before any rule is looked at. A marker file
    /// with bad content does not block the rules.
    pub fn resolve(
        &self,
        workspace: &Path,
        markers: MarkerFileSet,
        rules: &RuleSet,
        strategy: &MatchStrategy,
        case_sensitive: bool,
    ) -> ColorResolution {
        if let Some(found) = read_marker_color(self.filesystem, workspace, markers, self.diagnostics)
        {
            debug!("{} resolved from {}", found.color, found.file_name);
            return ColorResolution::Present {
                color: found.color,
                source: ColorSource::MarkerFile {
                    file_name: found.file_name.to_string(),
                },
            };
        }

        if rules.is_empty() {
            return ColorResolution::Absent;
        }

        if let MatchStrategy::Unknown(value) = strategy {
            self.diagnostics.report(Diagnostic::UnknownMatchType {
                value: value.clone(),
            });
            return ColorResolution::Absent;
        }

        let validated = rules.rules(self.diagnostics);
        let path = workspace.to_string_lossy();
        match match_path(&path, &validated, strategy, case_sensitive) {
            Some(rule) => {
                debug!("{} resolved from path rule '{}'", rule.color, rule.pattern);
                ColorResolution::Present {
                    color: rule.color.clone(),
                    source: ColorSource::PatternRule {
                        pattern: rule.pattern.clone(),
                    },
                }
            }
            None => ColorResolution::Absent,
        }
    }
}
