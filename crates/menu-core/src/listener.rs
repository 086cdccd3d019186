//! One-way notifications emitted after a menu loads successfully.
//!
//! The loader calls every registered `LoadListener` once per applied `Loaded`
//! state and never reads anything back from them.

use std::sync::{Arc, Mutex};

use crate::menu::MenuResource;
use crate::url_model::Identifier;

pub trait LoadListener: Send + Sync {
    fn menu_loaded(&self, id: &Identifier, menu: &MenuResource);
}

/// Receives the visible page title.
pub trait TitleSink: Send + Sync {
    fn set_title(&self, title: &str);
}

/// In-memory title holder (what a browser's `document.title` would be).
#[derive(Debug, Clone, Default)]
pub struct DocumentTitle(Arc<Mutex<String>>);

impl DocumentTitle {
    pub fn new(initial: impl Into<String>) -> Self {
        Self(Arc::new(Mutex::new(initial.into())))
    }

    pub fn get(&self) -> String {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl TitleSink for DocumentTitle {
    fn set_title(&self, title: &str) {
        *self.0.lock().unwrap_or_else(|e| e.into_inner()) = title.to_string();
    }
}

/// Writes `"<restaurant name> | <suffix>"` to a `TitleSink`.
pub struct TitleListener<S> {
    sink: S,
    suffix: String,
}

impl<S: TitleSink> TitleListener<S> {
    pub fn new(sink: S, suffix: impl Into<String>) -> Self {
        Self {
            sink,
            suffix: suffix.into(),
        }
    }

    fn title_for(&self, menu: &MenuResource) -> String {
        if self.suffix.is_empty() {
            menu.display_name().to_string()
        } else {
            format!("{} | {}", menu.display_name(), self.suffix)
        }
    }
}

impl<S: TitleSink> LoadListener for TitleListener<S> {
    fn menu_loaded(&self, _id: &Identifier, menu: &MenuResource) {
        self.sink.set_title(&self.title_for(menu));
    }
}

/// Emits a `menu_rendered` analytics event as a structured tracing record.
#[derive(Debug, Clone)]
pub struct AnalyticsListener {
    source: String,
}

impl AnalyticsListener {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl LoadListener for AnalyticsListener {
    fn menu_loaded(&self, id: &Identifier, menu: &MenuResource) {
        tracing::info!(
            target: "menu::analytics",
            event = "menu_rendered",
            menu_id = %id,
            restaurant_id = menu.restaurant.id.as_deref().unwrap_or(""),
            source = %self.source,
            "menu_rendered"
        );
    }
}
