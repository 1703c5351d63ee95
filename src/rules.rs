//! Adding path rules

use thiserror::Error;

use crate::color::HexColor;
use crate::pattern::RuleSet;

/// Why a rule was not added
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("pattern cannot be empty")]
    EmptyPattern,

    #[error("'{0}' is not a valid color, expected #RGB or #RRGGBB")]
    InvalidColorFormat(String),
}

/// Return a copy of `existing` with `pattern` mapped to the color in
/// `candidate_color`.
///
/// An existing entry for the same pattern is overwritten and keeps its
/// position. On error `existing` is untouched. Surrounding whitespace in
/// either input is ignored.
pub fn add_rule(
    existing: &RuleSet,
    pattern: &str,
    candidate_color: &str,
) -> std::result::Result<RuleSet, RuleError> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return Err(RuleError::EmptyPattern);
    }

    let candidate = candidate_color.trim();
    let color = HexColor::parse(candidate)
        .ok_or_else(|| RuleError::InvalidColorFormat(candidate.to_string()))?;

    let mut updated = existing.clone();
    updated.insert(pattern, &color);
    Ok(updated)
}
