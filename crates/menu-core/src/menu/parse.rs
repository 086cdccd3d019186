//! Decode and shape-check a fetched menu document.

use super::MenuResource;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("body is not a valid menu document: {0}")]
    Decode(String),
    #[error("restaurant name is empty")]
    EmptyName,
}

/// Parses `body` as a menu document. Rejects anything that does not carry a
/// non-empty `restaurant.name` and a `menus` array.
pub fn parse_menu_document(body: &[u8]) -> Result<MenuResource, DocumentError> {
    let menu: MenuResource =
        serde_json::from_slice(body).map_err(|e| DocumentError::Decode(e.to_string()))?;
    if menu.display_name().is_empty() {
        return Err(DocumentError::EmptyName);
    }
    Ok(menu)
}
