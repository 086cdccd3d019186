//! Validated menu identifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::slug::is_slug;

/// A non-empty token of `[a-z0-9-]`, safe to embed in a resource path.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,
    #[error("identifier {0:?} is not a lowercase slug")]
    NotSlug(String),
}

impl Identifier {
    /// Accepts `s` as-is (after trimming); does not normalize.
    pub fn parse(s: &str) -> Result<Self, IdentifierError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if !is_slug(s) {
            return Err(IdentifierError::NotSlug(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.0
    }
}
