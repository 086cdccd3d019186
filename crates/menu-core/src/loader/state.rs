//! Observable loader state and user-visible failure kinds.

use std::sync::Arc;

use crate::menu::MenuResource;
use crate::url_model::Identifier;

/// Why a load ended without a menu. Superseded attempts never produce one.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("no menu selected")]
    MissingIdentifier,
    #[error("{0:?} is not a valid menu identifier")]
    InvalidIdentifier(String),
    #[error("menu \"{id}\" not found (HTTP {status})")]
    NotFound { id: Identifier, status: u32 },
    #[error("menu \"{id}\" is not a valid menu document: {reason}")]
    MalformedDocument { id: Identifier, reason: String },
    #[error("menu \"{id}\" could not be fetched: {reason}")]
    Unreachable { id: Identifier, reason: String },
}

impl LoadError {
    /// Short message for the page, distinct per situation.
    pub fn user_message(&self) -> &'static str {
        match self {
            LoadError::MissingIdentifier => "Pick a menu to get started.",
            LoadError::InvalidIdentifier(_) | LoadError::NotFound { .. } => {
                "This menu doesn't exist."
            }
            LoadError::MalformedDocument { .. } => {
                "This menu couldn't be displayed. Please try again later."
            }
            LoadError::Unreachable { .. } => {
                "The menu couldn't be reached. Check your connection and retry."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading {
        id: Identifier,
    },
    Loaded {
        id: Identifier,
        menu: Arc<MenuResource>,
    },
    Failed(LoadError),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadState::Failed(_))
    }

    pub fn menu(&self) -> Option<&Arc<MenuResource>> {
        match self {
            LoadState::Loaded { menu, .. } => Some(menu),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            LoadState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Identifier the state refers to, when it refers to one.
    pub fn identifier(&self) -> Option<&Identifier> {
        match self {
            LoadState::Loading { id } | LoadState::Loaded { id, .. } => Some(id),
            LoadState::Failed(LoadError::NotFound { id, .. })
            | LoadState::Failed(LoadError::MalformedDocument { id, .. })
            | LoadState::Failed(LoadError::Unreachable { id, .. }) => Some(id),
            _ => None,
        }
    }
}
