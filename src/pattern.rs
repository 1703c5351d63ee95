//! Path pattern rules
//!
//! Users map path fragments to colors. The first rule, in declaration order,
//! whose pattern matches the workspace path decides the color.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::color::HexColor;
use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// How a pattern is compared against the workspace path
///
/// Applies to every rule in a resolution pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchStrategy {
    /// Pattern appears anywhere in the path
    #[default]
    Contains,
    /// Pattern equals the whole path
    Exact,
    /// Path ends with the pattern
    EndsWith,
    /// Unrecognized configuration value; never matches
    Unknown(String),
}

impl MatchStrategy {
    fn test(&self, path: &str, pattern: &str) -> bool {
        match self {
            MatchStrategy::Contains => path.contains(pattern),
            MatchStrategy::Exact => path == pattern,
            MatchStrategy::EndsWith => path.ends_with(pattern),
            MatchStrategy::Unknown(_) => false,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, MatchStrategy::Unknown(_))
    }
}

impl From<String> for MatchStrategy {
    fn from(value: String) -> Self {
        match value.as_str() {
            "contains" => MatchStrategy::Contains,
            "exact" => MatchStrategy::Exact,
            "endsWith" | "ends_with" | "ends-with" => MatchStrategy::EndsWith,
            _ => MatchStrategy::Unknown(value),
        }
    }
}

impl From<&str> for MatchStrategy {
    fn from(value: &str) -> Self {
        MatchStrategy::from(value.to_string())
    }
}

impl From<MatchStrategy> for String {
    fn from(strategy: MatchStrategy) -> Self {
        match strategy {
            MatchStrategy::Contains => "contains".to_string(),
            MatchStrategy::Exact => "exact".to_string(),
            MatchStrategy::EndsWith => "endsWith".to_string(),
            MatchStrategy::Unknown(value) => value,
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from(self.clone()))
    }
}

/// A single pattern → color association with a validated color
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathColorRule {
    pub pattern: String,
    pub color: HexColor,
}

impl PathColorRule {
    pub fn new(pattern: impl Into<String>, color: HexColor) -> Self {
        Self {
            pattern: pattern.into(),
            color,
        }
    }
}

/// The persisted `path_colors` table
///
/// Keys are unique and keep their declaration order; re-inserting an existing
/// key replaces the color in place. Colors are stored as the text the
/// configuration holds, so hand-edited entries survive a rewrite even when
/// they are not valid colors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    entries: IndexMap<String, String>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw color text stored for `pattern`
    pub fn get(&self, pattern: &str) -> Option<&str> {
        self.entries.get(pattern).map(String::as_str)
    }

    /// Insert or overwrite. Only [`HexColor`]s go in through this path.
    pub fn insert(&mut self, pattern: impl Into<String>, color: &HexColor) {
        self.entries.insert(pattern.into(), color.as_str().to_string());
    }

    /// Raw entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Validated rules in declaration order. Entries whose color is not a hex
    /// color are reported and left out.
    pub fn rules(&self, diagnostics: &dyn DiagnosticSink) -> Vec<PathColorRule> {
        self.entries
            .iter()
            .filter_map(|(pattern, color)| match HexColor::parse(color.trim()) {
                Some(color) => Some(PathColorRule::new(pattern.clone(), color)),
                None => {
                    diagnostics.report(Diagnostic::InvalidRuleColor {
                        pattern: pattern.clone(),
                        color: color.clone(),
                    });
                    None
                }
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RuleSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Return the color of the first rule whose pattern matches `workspace_path`.
///
/// With `case_sensitive == false` both sides are lowercased before comparing.
pub fn match_path<'r>(
    workspace_path: &str,
    rules: &'r [PathColorRule],
    strategy: &MatchStrategy,
    case_sensitive: bool,
) -> Option<&'r PathColorRule> {
    if !strategy.is_known() {
        return None;
    }

    let path = normalize(workspace_path, case_sensitive);
    rules
        .iter()
        .find(|rule| strategy.test(&path, &normalize(&rule.pattern, case_sensitive)))
}

fn normalize(text: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    }
}
