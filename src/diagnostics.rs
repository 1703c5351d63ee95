//! Diagnostic reporting for recoverable input problems
//!
//! Resolution swallows bad marker files and malformed rule colors. Instead of
//! printing, it hands a [`Diagnostic`] to an injected [`DiagnosticSink`].

use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Something resolution skipped over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A marker file exists but its content is not a hex color
    InvalidMarkerColor { path: PathBuf, content: String },

    /// A marker file was reported present but could not be read
    MarkerUnreadable { path: PathBuf, reason: String },

    /// A configured rule maps to something that is not a hex color
    InvalidRuleColor { pattern: String, color: String },

    /// `match_type` holds a value no strategy recognizes
    UnknownMatchType { value: String },
}

/// Receiver for [`Diagnostic`]s
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::InvalidMarkerColor { path, content } => {
                warn!(
                    "Ignoring {}: '{}' is not a valid hex color",
                    path.display(),
                    content
                );
            }
            Diagnostic::MarkerUnreadable { path, reason } => {
                debug!("Could not read {}: {}", path.display(), reason);
            }
            Diagnostic::InvalidRuleColor { pattern, color } => {
                warn!(
                    "Ignoring path rule '{}': '{}' is not a valid hex color",
                    pattern, color
                );
            }
            Diagnostic::UnknownMatchType { value } => {
                warn!("Unknown match type '{}', no path rule will match", value);
            }
        }
    }
}

/// Keeps every diagnostic in memory
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl DiagnosticSink for CollectingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(diagnostic);
        }
    }
}

/// Drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnostics;

impl DiagnosticSink for NullDiagnostics {
    fn report(&self, _diagnostic: Diagnostic) {}
}
