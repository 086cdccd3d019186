//! The deployment's list of menu identifiers.

use std::collections::BTreeSet;

use crate::url_model::normalize;

/// Immutable set of identifiers for which a menu document is expected to exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownIdentifierSet {
    ids: BTreeSet<String>,
}

impl KnownIdentifierSet {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Normalizes `raw` and returns it if known, else `fallback`.
    pub fn coerce<'a>(&self, raw: &str, fallback: &'a str) -> std::borrow::Cow<'a, str> {
        let id = normalize(raw);
        if self.contains(&id) {
            id.into()
        } else {
            fallback.into()
        }
    }
}

impl<S: Into<String>> FromIterator<S> for KnownIdentifierSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
