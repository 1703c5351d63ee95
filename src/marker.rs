//! Marker file lookup
//!
//! A marker file is a file in the workspace root whose only content is a hex
//! color. Marker files are checked in priority order and the first one that
//! holds a valid color wins.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::HexColor;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::platform::FilesystemOps;

/// Project-level marker file
pub const PROJECT_COLOR_FILE: &str = ".project-color";

/// Marker file shared with iTerm tab coloring setups
pub const ITERM_COLOR_FILE: &str = ".iterm-color";

const PROJECT_AND_ITERM: &[&str] = &[PROJECT_COLOR_FILE, ITERM_COLOR_FILE];
const ITERM_ONLY: &[&str] = &[ITERM_COLOR_FILE];

/// Which marker files to look for, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerFileSet {
    /// `.project-color`, then `.iterm-color`
    #[default]
    ProjectAndIterm,
    /// `.iterm-color` only
    ItermOnly,
}

impl MarkerFileSet {
    /// File names in priority order
    pub fn file_names(self) -> &'static [&'static str] {
        match self {
            MarkerFileSet::ProjectAndIterm => PROJECT_AND_ITERM,
            MarkerFileSet::ItermOnly => ITERM_ONLY,
        }
    }

    pub fn contains(self, file_name: &str) -> bool {
        self.file_names().contains(&file_name)
    }
}

/// A color read from a marker file, with the file it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerColor {
    pub color: HexColor,
    pub file_name: &'static str,
}

/// Return the color of the first marker file in `markers` that exists in
/// `workspace` and contains a valid hex color.
///
/// Missing, unreadable and malformed files are all skipped; none of them stop
/// the search.
pub fn read_marker_color(
    filesystem: &dyn FilesystemOps,
    workspace: &Path,
    markers: MarkerFileSet,
    diagnostics: &dyn DiagnosticSink,
) -> Option<MarkerColor> {
    for &file_name in markers.file_names() {
        let path = workspace.join(file_name);
        if !filesystem.exists(&path) {
            continue;
        }

        let content = match filesystem.read_text(&path) {
            Ok(content) => content,
            Err(e) => {
                diagnostics.report(Diagnostic::MarkerUnreadable {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let trimmed = content.trim();
        match HexColor::parse(trimmed) {
            Some(color) => return Some(MarkerColor { color, file_name }),
            None => diagnostics.report(Diagnostic::InvalidMarkerColor {
                path,
                content: trimmed.to_string(),
            }),
        }
    }

    None
}
