//! Identifier state derived from one URL snapshot.

use crate::url_model::{normalize, Identifier};

use super::KnownIdentifierSet;

/// (raw value, normalized value, validity) for the identifier parameter.
/// Always recomputed from a URL, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlSyncState {
    /// Parameter value, trimmed; empty when absent or blank.
    pub raw: String,
    /// `normalize(raw)`; may be empty for all-punctuation input.
    pub normalized: String,
    /// True iff `normalized` is a member of the known set.
    pub valid: bool,
}

impl UrlSyncState {
    pub fn derive(param: Option<&str>, known: &KnownIdentifierSet) -> Self {
        let raw = param.unwrap_or_default().trim().to_string();
        if raw.is_empty() {
            return Self::default();
        }
        let normalized = normalize(&raw);
        let valid = !normalized.is_empty() && known.contains(&normalized);
        Self {
            raw,
            normalized,
            valid,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn is_invalid(&self) -> bool {
        !self.is_missing() && !self.valid
    }

    pub fn identifier(&self) -> Option<Identifier> {
        if !self.valid {
            return None;
        }
        Identifier::parse(&self.normalized).ok()
    }
}
