//! Validated tool name identifiers.
//!
//! Tool names travel from model output into registry lookups, so they are
//! validated once at the boundary and carried as a [`ToolName`] newtype from
//! then on (parse-don't-validate). Registry keys, transcript turns, and
//! parsed actions all share this type, which makes it impossible to dispatch
//! on an unvalidated string.
//!
//! # Validation Rules
//!
//! - Non-empty
//! - Maximum 64 characters
//! - Only alphanumeric characters, hyphens (`-`), underscores (`_`), and dots (`.`)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length for a tool name.
pub const MAX_TOOL_NAME_LEN: usize = 64;

/// Error produced when a string fails tool-name validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// The name string is empty.
    #[error("tool name cannot be empty")]
    Empty,

    /// The name exceeds [`MAX_TOOL_NAME_LEN`].
    #[error("tool name too long ({length} chars, max {max})")]
    TooLong { length: usize, max: usize },

    /// The name contains a character outside the allowed set.
    #[error(
        "tool name contains invalid character '{found}' \
         (allowed: alphanumerics, '-', '_', '.')"
    )]
    InvalidCharacter { found: char },
}

/// Unique, validated identifier for a tool.
///
/// # Examples
///
/// ```rust
/// use reagent_core::ToolName;
///
/// let name = ToolName::parse("text_uppercase").unwrap();
/// assert_eq!(name.as_str(), "text_uppercase");
///
/// assert!(ToolName::parse("").is_err());
/// assert!(ToolName::parse("web search").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolName(String);

impl ToolName {
    /// Parse and validate a tool name from a string.
    pub fn parse(name: impl AsRef<str>) -> Result<Self, NameError> {
        let name = name.as_ref();
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.len() > MAX_TOOL_NAME_LEN {
            return Err(NameError::TooLong {
                length: name.len(),
                max: MAX_TOOL_NAME_LEN,
            });
        }
        if let Some(found) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        {
            return Err(NameError::InvalidCharacter { found });
        }
        Ok(Self(name.to_string()))
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create a tool name without validation.
    ///
    /// Only use this when the input is guaranteed valid, e.g. string
    /// literals in tests. For anything model- or user-provided, use
    /// [`ToolName::parse`].
    #[doc(hidden)]
    pub fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ToolName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ToolName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ToolName> for String {
    fn from(name: ToolName) -> Self {
        name.0
    }
}

impl AsRef<str> for ToolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
