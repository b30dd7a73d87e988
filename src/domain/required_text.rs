use std::fmt;
use std::str::FromStr;

/// A user supplied form value that must be present.
///
/// Only emptiness is checked; the content itself is stored as given.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RequiredText(String);

impl RequiredText {
    /// Parse an optional form value, `None` when absent or empty
    pub fn from_optional(value: Option<String>) -> Option<Self> {
        value.filter(|v| !v.is_empty()).map(Self)
    }
}

impl FromStr for RequiredText {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err("Value cannot be empty".into());
        }
        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequiredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
