//! URL modeling: query parameter access and menu resource locations.
//!
//! Only the named parameter is ever read or rewritten; every other query
//! pair, the path and the fragment are preserved in their original order.

mod identifier;
mod slug;

pub use identifier::{Identifier, IdentifierError};
pub use slug::{is_slug, normalize};

use url::Url;

/// Returns the first value of `key` in the query string, if present.
pub fn get_query_param(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Sets `key` to `value`, replacing the first occurrence in place and dropping
/// any duplicates. Appends the pair when the key is absent.
pub fn set_query_param(url: &mut Url, key: &str, value: &str) {
    rewrite_query(url, key, Some(value));
}

/// Removes every occurrence of `key`. Leaves no dangling `?` behind.
pub fn remove_query_param(url: &mut Url, key: &str) {
    rewrite_query(url, key, None);
}

fn rewrite_query(url: &mut Url, key: &str, value: Option<&str>) {
    let mut pairs: Vec<(String, String)> = Vec::new();
    let mut written = false;
    for (k, v) in url.query_pairs() {
        if k != key {
            pairs.push((k.into_owned(), v.into_owned()));
            continue;
        }
        if let (Some(value), false) = (value, written) {
            pairs.push((key.to_string(), value.to_string()));
            written = true;
        }
    }
    if let (Some(value), false) = (value, written) {
        pairs.push((key.to_string(), value.to_string()));
    }

    if pairs.is_empty() {
        url.set_query(None);
        return;
    }
    url.query_pairs_mut().clear().extend_pairs(pairs);
}

/// Location of the document for `id`: `<base>menus/<id>.json`.
///
/// `base` is expected to end with `/` (see `MenuConfig::base`); otherwise its
/// last path segment is replaced, per relative URL resolution.
pub fn menu_resource_url(base: &Url, id: &str) -> Result<Url, url::ParseError> {
    base.join(&format!("menus/{id}.json"))
}
