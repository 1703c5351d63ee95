//! Hex color values
//!
//! A [`HexColor`] can only be obtained through [`HexColor::parse`], so holding
//! one means the text already matched `#RGB` or `#RRGGBB`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static HEX_COLOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#([0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$").expect("hex color pattern compiles")
});

/// A syntactically valid `#RGB` / `#RRGGBB` color string.
///
/// The original spelling is kept verbatim (no case folding, no expansion of
/// the short form) so that what the user wrote is what ends up in settings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Validate `candidate` exactly as given. Callers trim first if needed.
    pub fn parse(candidate: &str) -> Option<Self> {
        if Self::is_valid(candidate) {
            Some(Self(candidate.to_string()))
        } else {
            None
        }
    }

    /// Whether `candidate` matches the hex color syntax.
    pub fn is_valid(candidate: &str) -> bool {
        HEX_COLOR_PATTERN.is_match(candidate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(format!("'{}' is not a #RGB or #RRGGBB color", value))
        }
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}
